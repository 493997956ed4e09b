use super::{
    Canonical, CharsetConverter, ComponentSource, canonicalize_file_path, canonicalize_file_url,
    canonicalize_partial_path,
    canonicalize_path, canonicalize_query, canonicalize_ref,
};
use crate::character_sets::canonical_scheme_char;
use crate::checkers::{does_begin_slash_windows_drive_spec, does_begin_unc_path, does_begin_windows_drive_spec};
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::error::{CanonError, Result, Validity};
use crate::helpers::{count_consecutive_slashes, trim_url};
use crate::output::CanonOutput;
use crate::parsed::Parsed;
use crate::parser::{extract_scheme_in, parse_after_non_special_scheme, parse_after_special_scheme, parse_file_url, parse_path};
use crate::replacements::{ComponentReplacements, Part};
use crate::scheme::{SchemeRegistry, compare_scheme_component};
use crate::types::{CanonMode, ComponentType};
use crate::url_util::replace_keeping_scheme;

/// Decide whether `url` is relative to the canonical `base`.
///
/// Returns the span of `url` to resolve when it is relative and `None` when
/// it is absolute. A non-hierarchical base only accepts bare fragments;
/// anything else relative to it is [`CanonError::NotHierarchical`].
pub(crate) fn is_relative_url<C: CodeUnit>(
    base: &[u8],
    base_parsed: &Parsed,
    url: &[C],
    is_base_hierarchical: bool,
    registry: &SchemeRegistry,
) -> Result<Option<Component>> {
    let (begin, end) = trim_url(url, true);
    if begin >= end {
        return if is_base_hierarchical {
            Ok(Some(Component::new(begin, 0)))
        } else {
            Err(CanonError::NotHierarchical)
        };
    }

    // "c:\foo" and "\\server\share" link straight to files on Windows.
    if cfg!(windows)
        && (does_begin_windows_drive_spec(url, begin, end) || does_begin_unc_path(url, begin, end, true))
    {
        return Ok(None);
    }

    let relative_whole = || {
        if url[begin].is(b'#') || is_base_hierarchical {
            Ok(Some(Component::from_range(begin, end)))
        } else {
            Err(CanonError::NotHierarchical)
        }
    };

    // No scheme, an empty one (":foo") or an invalid one: all relative.
    let Some(scheme) = extract_scheme_in(url, begin, end).filter(|scheme| scheme.is_nonempty()) else {
        return relative_whole();
    };
    if !is_valid_scheme(scheme.slice(url)) {
        return relative_whole();
    }

    let base_scheme = core::str::from_utf8(base_parsed.scheme.slice(base)).unwrap_or_default();
    if !compare_scheme_component(scheme.slice(url), base_scheme) || !is_base_hierarchical {
        return Ok(None);
    }

    // "filesystem:" and non-special schemes are relative only without a
    // scheme; "http:foo" is relative, "git:foo" is not.
    if compare_scheme_component(scheme.slice(url), "filesystem") || registry.classify(url, scheme).is_none() {
        return Ok(None);
    }

    let after_colon = scheme.end() + 1;
    let num_slashes = count_consecutive_slashes(url, after_colon, end, CanonMode::Special);
    if num_slashes < 2 {
        // "http:foo.html" is a relative path, "http:/foo" an absolute one.
        return Ok(Some(Component::from_range(after_colon, end)));
    }
    Ok(None)
}

fn is_valid_scheme<C: CodeUnit>(scheme: &[C]) -> bool {
    scheme.first().is_some_and(|unit| unit.ascii().is_some_and(|b| b.is_ascii_alphabetic()))
        && scheme
            .iter()
            .all(|unit| unit.ascii().and_then(canonical_scheme_char).is_some())
}

/// Resolve `relative[relative_component]` against the canonical `base`.
///
/// The base is copied up to wherever the relative reference starts to
/// differ, then the rest is canonicalized from the relative input. A base
/// with neither a path nor a host cannot be resolved against: it is echoed
/// and the result is [`CanonError::NotHierarchical`]. A base with a host and
/// an empty path (`git://h`) resolves as if its path were `/`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn resolve_relative_url<C: CodeUnit>(
    base: &[u8],
    base_parsed: &Parsed,
    base_is_file: bool,
    relative: &[C],
    relative_component: Component,
    registry: &SchemeRegistry,
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    if base_parsed.path.is_empty() && !base_parsed.host.is_valid() {
        output.append(base.get(..base_parsed.length()).unwrap_or(base));
        return Canonical {
            parsed: base_parsed.clone(),
            error: Some(CanonError::NotHierarchical),
        };
    }

    if relative_component.is_empty() {
        // Only the fragment goes away.
        let mut parsed = base_parsed.clone();
        parsed.fragment.reset();
        output.append(base.get(..parsed.length()).unwrap_or(base));
        return Canonical {
            parsed,
            error: None,
        };
    }

    let mode = if base_is_file {
        CanonMode::File
    } else if registry.classify(base, base_parsed.scheme).is_some() {
        CanonMode::Special
    } else {
        CanonMode::NonSpecial
    };
    let num_slashes = count_consecutive_slashes(
        relative,
        relative_component.begin,
        relative_component.end(),
        mode,
    );

    if cfg!(windows) {
        let after_slashes = relative_component.begin + num_slashes;
        let drive = does_begin_windows_drive_spec(relative, after_slashes, relative_component.end());
        if (drive && num_slashes == 0)
            || (!drive
                && does_begin_unc_path(
                    relative,
                    relative_component.begin,
                    relative_component.end(),
                    !base_is_file,
                ))
        {
            return resolve_absolute_file(relative, relative_component, converter, output);
        }
    } else if base_is_file && num_slashes >= 2 {
        // A file URL only has a host with exactly two slashes; let the file
        // parser decide.
        return resolve_absolute_file(relative, relative_component, converter, output);
    }

    if num_slashes >= 2 {
        return resolve_relative_host(
            base,
            base_parsed,
            relative,
            relative_component,
            mode,
            registry,
            converter,
            output,
        );
    }

    resolve_relative_path(
        base,
        base_parsed,
        base_is_file,
        relative,
        relative_component,
        mode,
        converter,
        output,
    )
}

/// Path, query and fragment from `relative`, everything before the path from
/// `base`.
#[allow(clippy::too_many_arguments)]
fn resolve_relative_path<C: CodeUnit>(
    base: &[u8],
    base_parsed: &Parsed,
    base_is_file: bool,
    relative: &[C],
    relative_component: Component,
    mode: CanonMode,
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    let mut validity = Validity::default();
    let mut parsed = base_parsed.clone();
    let (path, query, fragment) = parse_path(relative, relative_component);
    let special = mode != CanonMode::NonSpecial;

    // An absent base path has no begin of its own.
    let base_path_begin = base_parsed.count_characters_before(ComponentType::Path, false);
    output.append(&base[..base_path_begin]);

    if path.is_nonempty() {
        let true_path_begin = output.len();
        let mut base_path_begin = base_path_begin;
        if base_is_file {
            base_path_begin = copy_base_drive_spec(base, base_parsed.path, relative, relative_component, output);
        }

        if mode.is_slash(relative[path.begin]) {
            let mut out_path = Component::ABSENT;
            if base_is_file {
                validity.record(canonicalize_file_path(relative, path, output, &mut out_path));
            } else {
                validity.record(canonicalize_path(relative, path, mode, output, &mut out_path));
            }
        } else {
            // Relative to the directory of the base path; ".." stops there.
            let path_begin = output.len();
            if base_parsed.path.is_empty() {
                output.push(b'/');
            } else {
                copy_to_last_slash(base, base_path_begin, base_parsed.path.end(), output);
            }
            validity.record(canonicalize_partial_path(relative, path, path_begin, mode, output));
        }
        parsed.path = Component::from_range(true_path_begin, output.len());

        if mode == CanonMode::NonSpecial
            && !base_parsed.host.is_valid()
            && parsed.path.len() >= 2
            && output.at(parsed.path.begin) == b'/'
            && output.at(parsed.path.begin + 1) == b'/'
        {
            output.insert(parsed.path.begin, b"/.");
            parsed.path.len += 2;
        }

        canonicalize_query(relative, query, converter, special, output, &mut parsed.query);
        canonicalize_ref(relative, fragment, output, &mut parsed.fragment);
        return Canonical {
            parsed,
            error: validity.error(),
        };
    }

    // Same path as the base.
    output.append(base_parsed.path.slice(base));

    if query.is_valid() {
        canonicalize_query(relative, query, converter, special, output, &mut parsed.query);
        canonicalize_ref(relative, fragment, output, &mut parsed.fragment);
        return Canonical {
            parsed,
            error: None,
        };
    }

    // Same query as the base.
    parsed.query = copy_delimited(base, base_parsed.query, b'?', output);
    debug_assert!(fragment.is_valid(), "relative reference without a path, query or fragment");
    canonicalize_ref(relative, fragment, output, &mut parsed.fragment);
    Canonical {
        parsed,
        error: None,
    }
}

/// Everything from the authority on comes from `relative`, parsed as if it
/// followed the base scheme.
#[allow(clippy::too_many_arguments)]
fn resolve_relative_host<C: CodeUnit>(
    base: &[u8],
    base_parsed: &Parsed,
    relative: &[C],
    relative_component: Component,
    mode: CanonMode,
    registry: &SchemeRegistry,
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    let mut relative_parsed = Parsed::new();
    if mode == CanonMode::NonSpecial {
        parse_after_non_special_scheme(
            relative,
            relative_component.end(),
            relative_component.begin,
            &mut relative_parsed,
        );
    } else {
        parse_after_special_scheme(
            relative,
            relative_component.end(),
            relative_component.begin,
            &mut relative_parsed,
        );
    }

    // Replacements only carry UTF-8; narrow each part of the relative input.
    let narrowed: [_; 7] = Part::ALL.map(|part| {
        let span = relative_parsed.component(part.component_type());
        span.is_valid().then(|| C::narrow(span.slice(relative)))
    });
    let mut components = ComponentReplacements::new();
    for (part, text) in Part::ALL.into_iter().zip(&narrowed) {
        match text {
            Some(text) => {
                components.set(part, &text[..], Component::new(0, text.len()));
            }
            None => {
                components.clear(part);
            }
        }
    }

    replace_keeping_scheme(base, base_parsed, &components, registry, converter, output)
}

/// `relative` is a complete file URL, without a scheme.
fn resolve_absolute_file<C: CodeUnit>(
    relative: &[C],
    relative_component: Component,
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    let spec = relative_component.slice(relative);
    let parsed = parse_file_url(spec);
    canonicalize_file_url(&ComponentSource::new(spec), &parsed, converter, output)
}

/// Copy the drive spec of a file base path (`/C:`) unless the relative
/// reference brings its own. Returns where the rest of the base path starts.
fn copy_base_drive_spec<C: CodeUnit>(
    base: &[u8],
    base_path: Component,
    relative: &[C],
    relative_component: Component,
    output: &mut CanonOutput,
) -> usize {
    let (rel_begin, rel_end) = (relative_component.begin, relative_component.end());
    if base_path.is_empty()
        || does_begin_slash_windows_drive_spec(relative, rel_begin, rel_end)
        || does_begin_windows_drive_spec(relative, rel_begin, rel_end)
        || !does_begin_slash_windows_drive_spec(base, base_path.begin, base_path.end())
    {
        return base_path.begin;
    }
    output.append(&base[base_path.begin..base_path.begin + 3]);
    base_path.begin + 3
}

/// Copy `base[begin..end]` up to and including its last `/`.
fn copy_to_last_slash(base: &[u8], begin: usize, end: usize, output: &mut CanonOutput) {
    if let Some(last_slash) = base.get(begin..end).and_then(|path| memchr::memrchr(b'/', path)) {
        output.append(&base[begin..=begin + last_slash]);
    }
}

/// Copy a base component with the delimiter that precedes it.
fn copy_delimited(base: &[u8], component: Component, delimiter: u8, output: &mut CanonOutput) -> Component {
    if !component.is_valid() {
        return Component::ABSENT;
    }
    output.push(delimiter);
    let begin = output.len();
    output.append(component.slice(base));
    Component::from_range(begin, output.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url_util::canonicalize;

    fn base(spec: &str) -> (String, Parsed) {
        let mut output = CanonOutput::new();
        let canonical = canonicalize(spec.as_bytes(), None, &mut output);
        (output.into_string(), canonical.parsed)
    }

    fn relative(base_spec: &str, url: &str, hierarchical: bool) -> Result<Option<String>> {
        let (base_text, base_parsed) = base(base_spec);
        let registry = SchemeRegistry::builtin();
        is_relative_url(base_text.as_bytes(), &base_parsed, url.as_bytes(), hierarchical, &registry)
            .map(|span| span.and_then(|span| span.as_str_on(url)).map(str::to_owned))
    }

    fn resolve(base_spec: &str, url: &str) -> (String, Canonical) {
        let (base_text, base_parsed) = base(base_spec);
        let registry = SchemeRegistry::builtin();
        let span = is_relative_url(base_text.as_bytes(), &base_parsed, url.as_bytes(), true, &registry)
            .ok()
            .flatten()
            .unwrap_or(Component::from_range(0, url.len()));
        let is_file = compare_scheme_component(base_parsed.scheme.slice(base_text.as_bytes()), "file");
        let mut output = CanonOutput::new();
        let canonical = resolve_relative_url(
            base_text.as_bytes(),
            &base_parsed,
            is_file,
            url.as_bytes(),
            span,
            &registry,
            None,
            &mut output,
        );
        (output.into_string(), canonical)
    }

    #[test]
    fn test_classification() {
        assert_eq!(relative("http://a/b", "c", true), Ok(Some("c".into())));
        assert_eq!(relative("http://a/b", "  http:c  ", true), Ok(Some("c".into())));
        assert_eq!(relative("http://a/b", "https:c", true), Ok(None));
        assert_eq!(relative("http://a/b", "http://c", true), Ok(None));
        assert_eq!(relative("http://a/b", "1http:c", true), Ok(Some("1http:c".into())));
        assert_eq!(relative("git://a/b", "git:c", true), Ok(None));
        assert_eq!(relative("http://a/b", "", true), Ok(Some(String::new())));
    }

    #[test]
    fn test_non_hierarchical_base() {
        assert_eq!(relative("data:,x", "#f", false), Ok(Some("#f".into())));
        assert_eq!(relative("data:,x", "y", false), Err(CanonError::NotHierarchical));
        assert_eq!(relative("data:,x", "data:y", false), Ok(None));
    }

    #[test]
    fn test_resolve_paths() {
        assert_eq!(resolve("http://a/b/c", "../d").0, "http://a/d");
        assert_eq!(resolve("http://a/b/c", "d?x#y").0, "http://a/b/d?x#y");
        assert_eq!(resolve("http://a/b/c", "/../x").0, "http://a/x");
        assert_eq!(resolve("http://a/b/c", "..\\..\\..\\x").0, "http://a/x");
        assert_eq!(resolve("http://a/b/c?q#f", "?n").0, "http://a/b/c?n");
        assert_eq!(resolve("http://a/b/c?q#f", "#g").0, "http://a/b/c?q#g");
        assert_eq!(resolve("http://a/b/c?q#f", "").0, "http://a/b/c?q");
    }

    #[test]
    fn test_resolve_hosts() {
        let (text, canonical) = resolve("http://a/b", "//h/p");
        assert_eq!(text, "http://h/p");
        assert!(canonical.is_valid());
        assert_eq!(resolve("https://u@a:1/b", "//h").0, "https://h/");
        assert_eq!(resolve("git://a/b", "//h/p").0, "git://h/p");
    }

    #[test]
    fn test_resolve_file() {
        assert_eq!(resolve("file:///C:/a/b", "c").0, "file:///C:/a/c");
        assert_eq!(resolve("file:///C:/a/b", "/c").0, "file:///C:/c");
        assert_eq!(resolve("file:///C:/a/b", "../../../x").0, "file:///C:/x");
        assert_eq!(resolve("file:///a/b", "//server/x").0, "file://server/x");
    }

    #[test]
    fn test_resolve_non_special() {
        assert_eq!(resolve("git:/a/b", "c").0, "git:/a/c");
        assert_eq!(resolve("git:/a/b", "..//x").0, "git:/.//x");
        assert_eq!(resolve("git://h/a\\b/c", "d").0, "git://h/a\\b/d");
    }

    #[test]
    fn test_empty_base_path() {
        let (text, canonical) = resolve("mailto:?x", "y");
        assert_eq!(text, "mailto:?x");
        assert_eq!(canonical.error, Some(CanonError::NotHierarchical));
    }

    #[test]
    fn test_empty_base_path_with_host() {
        let (text, canonical) = resolve("git://h", "x");
        assert_eq!(text, "git://h/x");
        assert!(canonical.is_valid());
        assert_eq!(canonical.parsed.path.as_str_on(&text), Some("/x"));
        assert_eq!(resolve("git://h", "/x").0, "git://h/x");
        assert_eq!(resolve("git://h", "a/../b").0, "git://h/b");
        assert_eq!(resolve("git://h?q", "?r").0, "git://h?r");
        assert_eq!(resolve("git://h?q", "#f").0, "git://h?q#f");
    }
}
