use super::{apply_path, find_next_authority_terminator, parse_authority, trim_and_extract_scheme};
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::helpers::count_consecutive_slashes;
use crate::parsed::Parsed;
use crate::types::CanonMode;

/// Parse a URL of an unregistered scheme (`git://host/repo`, `git:/x`,
/// `data:,x`).
///
/// Only `/` separates components. Exactly `//` introduces an authority, which
/// may be empty (`git:///x` has an empty host, `git:/x` has none). Without a
/// leading slash the path is opaque.
pub fn parse_non_special_url<C: CodeUnit>(spec: &[C]) -> Parsed {
    let (begin, end, scheme) = trim_and_extract_scheme(spec, true);
    let mut parsed = Parsed::new();
    let after_scheme = match scheme {
        Some(scheme) => {
            parsed.scheme = scheme;
            scheme.end() + 1
        }
        None => begin,
    };
    parse_after_non_special_scheme(spec, end, after_scheme, &mut parsed);
    parsed
}

pub(crate) fn parse_after_non_special_scheme<C: CodeUnit>(
    spec: &[C],
    end: usize,
    after_scheme: usize,
    parsed: &mut Parsed,
) {
    let num_slashes = count_consecutive_slashes(spec, after_scheme, end, CanonMode::NonSpecial);

    if num_slashes >= 2 {
        // "git:///foo" has an empty authority, the third slash starts the path.
        parsed.has_opaque_path = false;
        let after_slashes = after_scheme + 2;
        let end_auth =
            find_next_authority_terminator(spec, after_slashes, end, CanonMode::NonSpecial);
        let authority = Component::from_range(after_slashes, end_auth);
        parse_authority(spec, authority, CanonMode::NonSpecial).apply(parsed);
        apply_path(spec, Component::from_range(end_auth, end), parsed);
        return;
    }

    parsed.username.reset();
    parsed.password.reset();
    parsed.host.reset();
    parsed.port.reset();
    // One slash: a hierarchical path without authority. None: opaque.
    parsed.has_opaque_path = num_slashes == 0;
    apply_path(spec, Component::from_range(after_scheme, end), parsed);
}
