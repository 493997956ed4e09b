use super::{apply_path, find_next_authority_terminator, parse_authority, trim_and_extract_scheme};
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::helpers::count_consecutive_slashes;
use crate::parsed::Parsed;
use crate::types::CanonMode;

/// Parse a URL of a registered standard scheme (`http://user@host:1/p?q#f`).
///
/// Any number of slashes, forward or backward, may follow the scheme. A
/// missing scheme is tolerated and leaves `scheme` absent.
pub fn parse_standard_url<C: CodeUnit>(spec: &[C]) -> Parsed {
    let (begin, end, scheme) = trim_and_extract_scheme(spec, true);
    let mut parsed = Parsed::new();
    let after_scheme = match scheme {
        Some(scheme) => {
            parsed.scheme = scheme;
            scheme.end() + 1
        }
        None => begin,
    };
    parse_after_special_scheme(spec, end, after_scheme, &mut parsed);
    parsed
}

/// Authority and path of a standard URL starting at `after_scheme`.
pub(crate) fn parse_after_special_scheme<C: CodeUnit>(
    spec: &[C],
    end: usize,
    after_scheme: usize,
    parsed: &mut Parsed,
) {
    let num_slashes = count_consecutive_slashes(spec, after_scheme, end, CanonMode::Special);
    let after_slashes = after_scheme + num_slashes;

    // Everything up to the next separator is the authority, however many
    // slashes preceded it.
    let end_auth = find_next_authority_terminator(spec, after_slashes, end, CanonMode::Special);
    let authority = Component::from_range(after_slashes, end_auth);
    let full_path = if end_auth == end {
        Component::ABSENT
    } else {
        Component::from_range(end_auth, end)
    };

    parse_authority(spec, authority, CanonMode::Special).apply(parsed);
    apply_path(spec, full_path, parsed);
    parsed.has_opaque_path = false;
}
