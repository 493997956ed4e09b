//! Whole-URL operations: canonicalize, resolve and replace, each dispatching
//! on the scheme to the matching parser and canonicalizer.
//!
//! Every operation has a `_with` form taking an explicit [`SchemeRegistry`];
//! the plain form uses [`default_registry`].

use crate::canon::{
    self, Canonical, CharsetConverter, ComponentSource, canonicalize_file_url,
    canonicalize_filesystem_url, canonicalize_mailto_url, canonicalize_non_special_url,
    canonicalize_path_url, canonicalize_scheme, canonicalize_standard_url,
};
use crate::checkers::{does_begin_unc_path, does_begin_windows_drive_spec};
use crate::code_unit::CodeUnit;
use crate::compat::Cow;
use crate::component::Component;
use crate::error::{CanonError, Result};
use crate::helpers::{remove_url_whitespace, trim_url};
use crate::output::CanonOutput;
use crate::parsed::Parsed;
use crate::parser::{
    extract_scheme, parse_file_url, parse_filesystem_url, parse_mailto_url, parse_non_special_url,
    parse_standard_url,
};
use crate::replacements::{ComponentReplacements, NarrowedReplacements, Part, Replacement, Replacements};
use crate::scheme::{SchemeRegistry, default_registry};
use crate::types::{ComponentType, SchemeType};
use crate::unicode::percent_encode::{URI_COMPONENT_SET, percent_decode_lossy};
use percent_encoding::utf8_percent_encode;

pub use crate::scheme::{compare_scheme_component, default_port_for_scheme};

/// Canonicalize `spec`, appending the result to `output`.
///
/// Tab, LF and CR are removed first. Input without a scheme writes nothing
/// and fails with [`CanonError::MissingScheme`].
pub fn canonicalize<C: CodeUnit>(
    spec: &[C],
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    canonicalize_with(spec, default_registry(), converter, output)
}

pub fn canonicalize_with<C: CodeUnit>(
    spec: &[C],
    registry: &SchemeRegistry,
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    let clean = remove_url_whitespace(spec);
    let mut canonical = do_canonicalize(&clean.spec, registry, converter, output);
    canonical.parsed.potentially_dangling_markup |= clean.potentially_dangling_markup;
    log_failure("canonicalize", &canonical, output);
    canonical
}

fn do_canonicalize<C: CodeUnit>(
    spec: &[C],
    registry: &SchemeRegistry,
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    let source = ComponentSource::new(spec);

    if cfg!(windows) {
        // "c:\foo" and "\\server\share" become file URLs.
        let (begin, end) = trim_url(spec, true);
        if does_begin_unc_path(spec, begin, end, false) || does_begin_windows_drive_spec(spec, begin, end) {
            return canonicalize_file_url(&source, &parse_file_url(spec), converter, output);
        }
    }

    let Some(scheme) = extract_scheme(spec) else {
        return Canonical {
            parsed: Parsed::new(),
            error: Some(CanonError::MissingScheme),
        };
    };
    let name = scheme.slice(spec);

    if compare_scheme_component(name, "file") {
        canonicalize_file_url(&source, &parse_file_url(spec), converter, output)
    } else if compare_scheme_component(name, "filesystem") {
        let parsed = parse_filesystem_url(spec, registry);
        canonicalize_filesystem_url(&source, &parsed, registry, converter, output)
    } else if let Some(scheme_type) = registry.classify(spec, scheme) {
        let parsed = parse_standard_url(spec);
        canonicalize_standard_url(&source, &parsed, scheme_type, converter, output)
    } else if compare_scheme_component(name, "mailto") {
        canonicalize_mailto_url(&source, &parse_mailto_url(spec), output)
    } else {
        let parsed = parse_non_special_url(spec);
        if parsed.has_opaque_path {
            canonicalize_path_url(&source, &parsed, output)
        } else {
            canonicalize_non_special_url(&source, &parsed, converter, output)
        }
    }
}

/// Resolve `relative` against the canonical URL `base`, whose spans are
/// `base_parsed`, appending the result to `output`.
///
/// Absolute input is canonicalized on its own. A relative reference against
/// a base that cannot take one writes nothing and fails with
/// [`CanonError::NotHierarchical`].
pub fn resolve_relative<C: CodeUnit>(
    base: &str,
    base_parsed: &Parsed,
    relative: &[C],
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    resolve_relative_with(base, base_parsed, relative, default_registry(), converter, output)
}

pub fn resolve_relative_with<C: CodeUnit>(
    base: &str,
    base_parsed: &Parsed,
    relative: &[C],
    registry: &SchemeRegistry,
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    let clean = remove_url_whitespace(relative);
    let base_bytes = base.as_bytes();

    let hierarchical = is_hierarchical_base(base_bytes, base_parsed, registry);
    let mut canonical =
        match canon::is_relative_url(base_bytes, base_parsed, &clean.spec, hierarchical, registry) {
            Ok(Some(relative_component)) => {
                let base_is_file = compare_scheme_component(base_parsed.scheme.slice(base_bytes), "file");
                canon::resolve_relative_url(
                    base_bytes,
                    base_parsed,
                    base_is_file,
                    &clean.spec,
                    relative_component,
                    registry,
                    converter,
                    output,
                )
            }
            Ok(None) => do_canonicalize(&clean.spec, registry, converter, output),
            Err(error) => Canonical {
                parsed: Parsed::new(),
                error: Some(error),
            },
        };
    canonical.parsed.potentially_dangling_markup |= clean.potentially_dangling_markup;
    log_failure("resolve", &canonical, output);
    canonical
}

/// Whether `url` is relative to the canonical `base`.
///
/// `Ok(Some(span))` is the part of `url` to resolve, `Ok(None)` means `url`
/// is absolute. Spans index `url` after tab and newline removal, which only
/// differs from `url` when it held any.
pub fn is_relative_url<C: CodeUnit>(
    base: &str,
    base_parsed: &Parsed,
    url: &[C],
) -> Result<Option<Component>> {
    is_relative_url_with(base, base_parsed, url, default_registry())
}

pub fn is_relative_url_with<C: CodeUnit>(
    base: &str,
    base_parsed: &Parsed,
    url: &[C],
    registry: &SchemeRegistry,
) -> Result<Option<Component>> {
    let clean = remove_url_whitespace(url);
    let hierarchical = is_hierarchical_base(base.as_bytes(), base_parsed, registry);
    canon::is_relative_url(base.as_bytes(), base_parsed, &clean.spec, hierarchical, registry)
}

/// Registered schemes always take relative references; others only when
/// their path is not opaque. `mailto:` never does.
fn is_hierarchical_base(base: &[u8], base_parsed: &Parsed, registry: &SchemeRegistry) -> bool {
    if base_parsed.scheme.is_empty() {
        return false;
    }
    if registry.classify(base, base_parsed.scheme).is_some() {
        return true;
    }
    !base_parsed.has_opaque_path && !compare_scheme_component(base_parsed.scheme.slice(base), "mailto")
}

/// Apply `replacements` to the canonical URL `base`, appending the result to
/// `output`.
///
/// Every component is canonicalized again, so the result follows the rules of
/// its scheme: a userinfo set on a `file:` URL is dropped. A new scheme
/// re-parses the whole URL under the new scheme first.
pub fn replace_components<C: CodeUnit>(
    base: &str,
    base_parsed: &Parsed,
    replacements: &Replacements<'_, C>,
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    replace_components_with(base, base_parsed, replacements, default_registry(), converter, output)
}

pub fn replace_components_with<C: CodeUnit>(
    base: &str,
    base_parsed: &Parsed,
    replacements: &Replacements<'_, C>,
    registry: &SchemeRegistry,
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    let narrowed = NarrowedReplacements::new(replacements);
    let components = narrowed.components();

    let canonical = match narrowed.scheme.as_deref() {
        Some(scheme) => replace_scheme(
            base.as_bytes(),
            base_parsed,
            scheme,
            &components,
            registry,
            converter,
            output,
        ),
        None => replace_keeping_scheme(
            base.as_bytes(),
            base_parsed,
            &components,
            registry,
            converter,
            output,
        ),
    };
    log_failure("replace", &canonical, output);
    canonical
}

/// Substitute the scheme textually, re-canonicalize under the new scheme and
/// then apply the remaining replacements. The second step takes no scheme, so
/// this never recurses.
fn replace_scheme(
    base: &[u8],
    base_parsed: &Parsed,
    scheme: &[u8],
    components: &ComponentReplacements<'_, u8>,
    registry: &SchemeRegistry,
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    let mut scheme_replaced = CanonOutput::with_capacity(scheme.len() + base.len());
    let mut scheme_span = Component::ABSENT;
    let scheme_result = canonicalize_scheme(
        scheme,
        Component::new(0, scheme.len()),
        &mut scheme_replaced,
        &mut scheme_span,
    );

    // A canonical base always has a ':' after its scheme.
    let after_colon = if base_parsed.scheme.is_valid() {
        base_parsed.scheme.end() + 1
    } else {
        0
    };
    scheme_replaced.append(base.get(after_colon..).unwrap_or_default());

    // Components that fail here may still be replaced below, so only the
    // final pass decides validity.
    let mut recanonicalized = CanonOutput::with_capacity(scheme_replaced.len());
    let reparsed = do_canonicalize(scheme_replaced.as_bytes(), registry, converter, &mut recanonicalized);

    let mut canonical = replace_keeping_scheme(
        recanonicalized.as_bytes(),
        &reparsed.parsed,
        components,
        registry,
        converter,
        output,
    );
    if let Err(error) = scheme_result {
        canonical.error.get_or_insert(error);
    }
    canonical.parsed.potentially_dangling_markup |= base_parsed.potentially_dangling_markup;
    canonical
}

/// Apply component replacements to `base` under the rules of its own scheme.
pub(crate) fn replace_keeping_scheme(
    base: &[u8],
    base_parsed: &Parsed,
    components: &ComponentReplacements<'_, u8>,
    registry: &SchemeRegistry,
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    let mut source = ComponentSource::new(base);
    let mut parsed = base_parsed.clone();
    for part in Part::ALL {
        match components.get(part) {
            Replacement::Keep => {}
            Replacement::Set { source: text, span } => {
                *source_for(&mut source, part) = text;
                *parsed.component_mut(part.component_type()) = span;
            }
            Replacement::Clear => parsed.component_mut(part.component_type()).reset(),
        }
    }

    output.reserve_size_if_needed(base.len());
    let name = base_parsed.scheme.slice(base);
    if compare_scheme_component(name, "file") {
        canonicalize_file_url(&source, &parsed, converter, output)
    } else if compare_scheme_component(name, "filesystem") {
        canonicalize_filesystem_url(&source, &parsed, registry, converter, output)
    } else if let Some(scheme_type) = registry.classify(base, base_parsed.scheme) {
        canonicalize_standard_url(&source, &parsed, scheme_type, converter, output)
    } else if compare_scheme_component(name, "mailto") {
        canonicalize_mailto_url(&source, &parsed, output)
    } else if base_parsed.has_opaque_path {
        canonicalize_path_url(&source, &parsed, output)
    } else {
        canonicalize_non_special_url(&source, &parsed, converter, output)
    }
}

fn source_for<'s, 'a>(source: &'s mut ComponentSource<'a, u8>, part: Part) -> &'s mut &'a [u8] {
    match part {
        Part::Username => &mut source.username,
        Part::Password => &mut source.password,
        Part::Host => &mut source.host,
        Part::Port => &mut source.port,
        Part::Path => &mut source.path,
        Part::Query => &mut source.query,
        Part::Fragment => &mut source.fragment,
    }
}

fn log_failure(operation: &str, canonical: &Canonical, output: &CanonOutput) {
    if let Some(error) = canonical.error {
        let scheme = canonical.parsed.scheme.as_str_on(output.as_str()).unwrap_or_default();
        tracing::trace!(operation, error = %error, scheme, "URL is not valid");
    }
}

/// Whether the scheme of `spec` is a registered standard scheme.
pub fn is_standard<C: CodeUnit>(spec: &[C], scheme: Component) -> bool {
    default_registry().classify(spec, scheme).is_some()
}

/// The type of a registered standard scheme.
pub fn get_standard_scheme_type<C: CodeUnit>(spec: &[C], scheme: Component) -> Option<SchemeType> {
    default_registry().classify(spec, scheme)
}

/// Find the scheme of `spec` and compare it with the lower-case `compare`.
///
/// The scheme span is returned whether or not it matched. Like the parsers,
/// this ignores tab and newline characters, and the span indexes `spec`
/// with them removed.
pub fn find_and_compare_scheme<C: CodeUnit>(spec: &[C], compare: &str) -> (bool, Option<Component>) {
    let clean = remove_url_whitespace(spec);
    let scheme = extract_scheme(&clean.spec);
    let matches = scheme.is_some_and(|scheme| compare_scheme_component(scheme.slice(&clean.spec), compare));
    (matches, scheme)
}

pub fn is_secure(scheme: &str) -> bool {
    default_registry().is_secure(scheme)
}

pub fn is_local(scheme: &str) -> bool {
    default_registry().is_local(scheme)
}

pub fn is_no_access(scheme: &str) -> bool {
    default_registry().is_no_access(scheme)
}

pub fn is_cors_enabled(scheme: &str) -> bool {
    default_registry().is_cors_enabled(scheme)
}

pub fn is_referrer(scheme: &str) -> bool {
    default_registry().is_referrer(scheme)
}

pub fn is_web_storage(scheme: &str) -> bool {
    default_registry().is_web_storage(scheme)
}

pub fn is_csp_bypassing(scheme: &str) -> bool {
    default_registry().is_csp_bypassing(scheme)
}

pub fn is_empty_document(scheme: &str) -> bool {
    default_registry().is_empty_document(scheme)
}

/// Escape `input` the way JavaScript's `encodeURIComponent` does.
pub fn encode_uri_component(input: &str, output: &mut CanonOutput) {
    output.extend_encoded(utf8_percent_encode(input, URI_COMPONENT_SET));
}

/// Unescape every `%XX` in `input` and read the result as UTF-8. Malformed
/// sequences become U+FFFD; malformed escapes stay as they are.
pub fn decode_url_escape_sequences(input: &str) -> Cow<'_, str> {
    percent_decode_lossy(input.as_bytes())
}

/// Whether the canonical host `canonical_host` is `canonical_domain` or one
/// of its subdomains. A trailing dot on the host is ignored unless the domain
/// has one too.
pub fn domain_is(canonical_host: &str, canonical_domain: &str) -> bool {
    let (Some(&host_last), Some(&domain_last)) =
        (canonical_host.as_bytes().last(), canonical_domain.as_bytes().last())
    else {
        return false;
    };

    let host = if host_last == b'.' && domain_last != b'.' {
        &canonical_host[..canonical_host.len() - 1]
    } else {
        canonical_host
    };
    let Some(prefix) = host.strip_suffix(canonical_domain) else {
        return false;
    };
    prefix.is_empty() || canonical_domain.starts_with('.') || prefix.ends_with('.')
}

/// The text of `ty` in a canonical URL, `None` when it is absent.
pub fn component_str<'a>(spec: &'a str, parsed: &Parsed, ty: ComponentType) -> Option<&'a str> {
    parsed.component(ty).as_str_on(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::String;

    fn canon(spec: &str) -> (String, Canonical) {
        let mut output = CanonOutput::new();
        let canonical = canonicalize(spec.as_bytes(), None, &mut output);
        (output.into_string(), canonical)
    }

    #[test]
    fn test_dispatch() {
        assert_eq!(canon("HTTP://Example.COM:80/a/../b").0, "http://example.com/b");
        assert_eq!(canon("file:///c|/x").0, "file:///C:/x");
        assert_eq!(canon("filesystem:http://h/temporary/a").0, "filesystem:http://h/temporary/a");
        assert_eq!(canon("mailto:A B@x.com#f").0, "mailto:A%20B@x.com#f");
        assert_eq!(canon("data:text/plain,a b").0, "data:text/plain,a b");
        assert_eq!(canon("git://h/a/./b").0, "git://h/a/b");
    }

    #[test]
    fn test_missing_scheme() {
        let (text, canonical) = canon("example.com/a");
        assert_eq!(text, "");
        assert_eq!(canonical.error, Some(CanonError::MissingScheme));
    }

    #[test]
    fn test_whitespace_and_markup() {
        let (text, canonical) = canon("http://h/a\n<b");
        assert_eq!(text, "http://h/a%3Cb");
        assert!(canonical.parsed.potentially_dangling_markup);
    }

    #[test]
    fn test_resolve() {
        let (base, canonical) = canon("http://h/a/b?q");
        let mut output = CanonOutput::new();
        let resolved = resolve_relative(&base, &canonical.parsed, "c\td".as_bytes(), None, &mut output);
        assert!(resolved.is_valid());
        assert_eq!(output.as_str(), "http://h/a/cd");

        let mut output = CanonOutput::new();
        resolve_relative(&base, &canonical.parsed, "https://x/".as_bytes(), None, &mut output);
        assert_eq!(output.as_str(), "https://x/");
    }

    #[test]
    fn test_resolve_against_opaque_base() {
        let (base, canonical) = canon("data:text/plain,x");
        let mut output = CanonOutput::new();
        let resolved = resolve_relative(&base, &canonical.parsed, "y".as_bytes(), None, &mut output);
        assert_eq!(resolved.error, Some(CanonError::NotHierarchical));
        assert_eq!(output.as_str(), "");

        let mut output = CanonOutput::new();
        let resolved = resolve_relative(&base, &canonical.parsed, "#y".as_bytes(), None, &mut output);
        assert!(resolved.is_valid());
        assert_eq!(output.as_str(), "data:text/plain,x#y");
    }

    #[test]
    fn test_replace_components() {
        let (base, canonical) = canon("http://u:p@h/a?q#f");
        let mut replacements = Replacements::new();
        replacements
            .set_str(Part::Host, "Other.com")
            .set_str(Part::Port, "8080")
            .clear(Part::Query);
        let mut output = CanonOutput::new();
        let replaced = replace_components(&base, &canonical.parsed, &replacements, None, &mut output);
        assert!(replaced.is_valid());
        assert_eq!(output.as_str(), "http://u:p@other.com:8080/a#f");
    }

    #[test]
    fn test_replace_scheme_reparses() {
        let (base, canonical) = canon("http://u:p@h/");
        let mut replacements = Replacements::new();
        replacements.set_scheme_str("file");
        let mut output = CanonOutput::new();
        let replaced = replace_components(&base, &canonical.parsed, &replacements, None, &mut output);
        assert!(replaced.is_valid());
        assert_eq!(output.as_str(), "file://h/");
    }

    #[test]
    fn test_replace_with_bad_scheme() {
        let (base, canonical) = canon("http://h/");
        let mut replacements = Replacements::new();
        replacements.set_scheme_str("");
        let mut output = CanonOutput::new();
        let replaced = replace_components(&base, &canonical.parsed, &replacements, None, &mut output);
        assert_eq!(replaced.error, Some(CanonError::InvalidScheme));
    }

    #[test]
    fn test_find_and_compare_scheme() {
        assert_eq!(find_and_compare_scheme(b"  HTTP:x".as_slice(), "http"), (true, Some(Component::new(2, 4))));
        assert_eq!(find_and_compare_scheme(b"ftp:x".as_slice(), "http"), (false, Some(Component::new(0, 3))));
        assert_eq!(find_and_compare_scheme(b"x".as_slice(), "http"), (false, None));
    }

    #[test]
    fn test_domain_is() {
        assert!(domain_is("www.google.com", "google.com"));
        assert!(domain_is("google.com.", "google.com"));
        assert!(domain_is("google.com", "google.com"));
        assert!(!domain_is("www.iamnotgoogle.com", "google.com"));
        assert!(!domain_is("google.com", "google.com."));
        assert!(!domain_is("", "google.com"));
        assert!(domain_is("www.google.com", ".com"));
    }

    #[test]
    fn test_escape_helpers() {
        let mut output = CanonOutput::new();
        encode_uri_component("a b/\u{e9}~", &mut output);
        assert_eq!(output.as_str(), "a%20b%2F%C3%A9~");
        assert_eq!(decode_url_escape_sequences("%41%zz%FF"), "A%zz\u{FFFD}");
    }

    #[test]
    fn test_scheme_queries() {
        assert!(is_standard(b"https".as_slice(), Component::new(0, 5)));
        assert!(!is_standard(b"git".as_slice(), Component::new(0, 3)));
        assert_eq!(get_standard_scheme_type(b"file".as_slice(), Component::new(0, 4)), Some(SchemeType::WithHost));
        assert!(is_secure("https"));
        assert!(!is_secure("http"));
        assert_eq!(default_port_for_scheme("wss"), Some(443));
    }

    #[test]
    fn test_component_str() {
        let (text, canonical) = canon("http://h:81/p?q");
        assert_eq!(component_str(&text, &canonical.parsed, ComponentType::Port), Some("81"));
        assert_eq!(component_str(&text, &canonical.parsed, ComponentType::Fragment), None);
    }
}
