use super::{Canonical, ComponentSource, canonicalize_query, canonicalize_ref, canonicalize_scheme};
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::error::Validity;
use crate::output::CanonOutput;
use crate::parsed::Parsed;
use crate::unicode::percent_encode::C0_CONTROL_SET;
use percent_encoding::utf8_percent_encode;

/// Canonicalize a URL with an opaque path, such as `data:` or `javascript:`.
///
/// There is never an authority. The path only has controls and non-ASCII
/// escaped; nothing is collapsed.
pub fn canonicalize_path_url<C: CodeUnit>(
    source: &ComponentSource<'_, C>,
    parsed: &Parsed,
    output: &mut CanonOutput,
) -> Canonical {
    let mut validity = Validity::default();
    let mut new_parsed = Parsed::new();

    validity.record(canonicalize_scheme(
        source.scheme,
        parsed.scheme,
        output,
        &mut new_parsed.scheme,
    ));
    canonicalize_path_url_path(source.path, parsed.path, output, &mut new_parsed.path);
    canonicalize_query(
        source.query,
        parsed.query,
        None,
        false,
        output,
        &mut new_parsed.query,
    );
    canonicalize_ref(source.fragment, parsed.fragment, output, &mut new_parsed.fragment);

    new_parsed.has_opaque_path = true;
    new_parsed.potentially_dangling_markup = parsed.potentially_dangling_markup;
    Canonical {
        parsed: new_parsed,
        error: validity.error(),
    }
}

/// Escape C0 controls, DEL and non-ASCII in an opaque path.
pub fn canonicalize_path_url_path<C: CodeUnit>(
    spec: &[C],
    path: Component,
    output: &mut CanonOutput,
    out_path: &mut Component,
) {
    if !path.is_valid() {
        out_path.reset();
        return;
    }

    let begin = output.len();
    let lossy = C::to_str_lossy(path.slice(spec));
    output.extend_encoded(utf8_percent_encode(&lossy.text, C0_CONTROL_SET));
    *out_path = Component::from_range(begin, output.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_path_url;

    fn canon(input: &str) -> (String, Canonical) {
        let parsed = parse_path_url(input.as_bytes(), true);
        let mut output = CanonOutput::new();
        let canonical = canonicalize_path_url(&ComponentSource::new(input.as_bytes()), &parsed, &mut output);
        (output.into_string(), canonical)
    }

    #[test]
    fn test_opaque_paths() {
        let (text, canonical) = canon("JavaScript:alert(1) /* x */");
        assert_eq!(text, "javascript:alert(1) /* x */");
        assert!(canonical.is_valid());
        assert!(canonical.parsed.has_opaque_path);
        assert_eq!(canonical.parsed.host, Component::ABSENT);

        assert_eq!(canon("data:text/plain,\u{e9}\u{7f}").0, "data:text/plain,%C3%A9%7F");
        assert_eq!(canon("about:blank?q r#f g").0, "about:blank?q%20r#f%20g");
    }

    #[test]
    fn test_path_only() {
        let mut output = CanonOutput::new();
        let mut out_path = Component::ABSENT;
        canonicalize_path_url_path(&b"/../a b"[..], Component::new(0, 7), &mut output, &mut out_path);
        assert_eq!(output.as_str(), "/../a b");
        assert_eq!(out_path, Component::new(0, 7));
    }
}
