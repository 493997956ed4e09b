use super::{apply_path, extract_scheme_in, find_next_authority_terminator};
use crate::checkers::{does_begin_unc_path, does_begin_windows_drive_spec};
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::helpers::{count_consecutive_slashes, trim_url};
use crate::parsed::Parsed;
use crate::types::CanonMode;

/// Parse a `file:` URL.
///
/// `file://host/p` names a host; any other number of slashes is a local
/// path. On Windows raw paths without a scheme (`c:\x`, `\\server\x`) are
/// accepted too.
pub fn parse_file_url<C: CodeUnit>(spec: &[C]) -> Parsed {
    let (begin, end) = trim_url(spec, true);
    let mut parsed = Parsed::new();

    let num_slashes = count_consecutive_slashes(spec, begin, end, CanonMode::File);
    let after_scheme = if cfg!(windows) && does_begin_windows_drive_spec(spec, begin + num_slashes, end) {
        // "c:\foo" has no scheme, the colon belongs to the drive.
        begin + num_slashes
    } else if cfg!(windows) && does_begin_unc_path(spec, begin, end, false) {
        // UNC path: no scheme, keep the slashes.
        begin
    } else {
        // "/foo.c:5" is a path, but "foo.c:5" has the scheme "foo.c".
        match extract_scheme_in(spec, begin, end).filter(|_| num_slashes == 0) {
            Some(scheme) => {
                parsed.scheme = scheme;
                scheme.end() + 1
            }
            None => begin,
        }
    };

    // Nothing after the scheme ("file:")
    if after_scheme == end {
        return parsed;
    }

    let num_slashes = count_consecutive_slashes(spec, after_scheme, end, CanonMode::File);
    let after_slashes = after_scheme + num_slashes;

    let has_host = if cfg!(windows) {
        // Everything without a drive is UNC, except that three slashes always
        // mean a local file.
        !does_begin_windows_drive_spec(spec, after_slashes, end) && num_slashes != 3
    } else {
        num_slashes == 2
    };

    if has_host {
        parse_unc(spec, after_slashes, end, &mut parsed);
    } else {
        // Keep the last slash as part of the path; the host is present but
        // empty.
        let path_begin = after_slashes.saturating_sub(1).max(after_scheme);
        parse_local_file(spec, path_begin, end, &mut parsed);
    }
    parsed
}

/// `//server/path`: the host runs up to the next separator. Userinfo before
/// an `@` is dropped.
fn parse_unc<C: CodeUnit>(spec: &[C], after_slashes: usize, end: usize, parsed: &mut Parsed) {
    let next_slash = find_next_authority_terminator(spec, after_slashes, end, CanonMode::File);

    if cfg!(windows) && does_begin_windows_drive_spec(spec, after_slashes, end) {
        // "file://c:/foo" is a drive, not a host named "c".
        parse_local_file(spec, after_slashes, end, parsed);
        return;
    }

    let authority = Component::from_range(after_slashes, next_slash);
    let host_begin = authority
        .slice(spec)
        .iter()
        .rposition(|unit| unit.is(b'@'))
        .map_or(after_slashes, |at| after_slashes + at + 1);
    parsed.host = Component::from_range(host_begin, next_slash);

    if next_slash < end {
        apply_path(spec, Component::from_range(next_slash, end), parsed);
    }
}

fn parse_local_file<C: CodeUnit>(spec: &[C], path_begin: usize, end: usize, parsed: &mut Parsed) {
    parsed.host = Component::new(path_begin, 0);
    apply_path(spec, Component::from_range(path_begin, end), parsed);
}
