use super::{Canonical, ComponentSource, append_string_of_type, canonicalize_query};
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::error::Validity;
use crate::output::CanonOutput;
use crate::parsed::Parsed;
use crate::unicode::percent_encode::MAILBOX_SET;

/// Canonicalize a `mailto:` URL: scheme, recipient path and query.
///
/// The scheme is always written lower-case. A fragment is never kept.
pub fn canonicalize_mailto_url<C: CodeUnit>(
    source: &ComponentSource<'_, C>,
    parsed: &Parsed,
    output: &mut CanonOutput,
) -> Canonical {
    let mut validity = Validity::default();
    let mut new_parsed = Parsed::new();

    new_parsed.scheme = Component::new(output.len(), 6);
    output.push_str("mailto:");

    if parsed.path.is_valid() {
        let begin = output.len();
        validity.record(append_string_of_type(
            parsed.path.slice(source.path),
            MAILBOX_SET,
            output,
        ));
        new_parsed.path = Component::from_range(begin, output.len());
    }

    canonicalize_query(
        source.query,
        parsed.query,
        None,
        false,
        output,
        &mut new_parsed.query,
    );

    new_parsed.potentially_dangling_markup = parsed.potentially_dangling_markup;
    Canonical {
        parsed: new_parsed,
        error: validity.error(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_mailto_url;

    fn canon(input: &str) -> (String, Canonical) {
        let parsed = parse_mailto_url(input.as_bytes());
        let mut output = CanonOutput::new();
        let canonical = canonicalize_mailto_url(&ComponentSource::new(input.as_bytes()), &parsed, &mut output);
        (output.into_string(), canonical)
    }

    #[test]
    fn test_mailto() {
        let (text, canonical) = canon("MailTo:Addr1@Foo.com?Subject=Hi There");
        assert_eq!(text, "mailto:Addr1@Foo.com?Subject=Hi%20There");
        assert!(canonical.is_valid());
        assert_eq!(canonical.parsed.path, Component::new(7, 13));
        assert_eq!(canonical.parsed.host, Component::ABSENT);
    }

    #[test]
    fn test_mailbox_escaping() {
        assert_eq!(canon("mailto:\"a b\"<c>@d").0, "mailto:%22a%20b%22%3Cc%3E@d");
        assert_eq!(canon("mailto:\u{e9}@x").0, "mailto:%C3%A9@x");
        assert_eq!(canon("mailto:").0, "mailto:");
    }

    #[test]
    fn test_hash_is_not_a_fragment() {
        let (text, canonical) = canon("mailto:a#b?x#z");
        assert_eq!(text, "mailto:a#b?x%23z");
        assert_eq!(canonical.parsed.fragment, Component::ABSENT);
        assert_eq!(canonical.parsed.path.as_str_on(&text), Some("a#b"));
    }
}
