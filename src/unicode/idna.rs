use crate::compat::Cow;
use crate::error::{CanonError, Result};
use idna::AsciiDenyList;

/// Check if 4 bytes match "xn--" (case insensitive)
fn is_punycode_prefix(slice: &[u8]) -> bool {
    slice.len() >= 4
        && matches!(slice[0], b'x' | b'X')
        && matches!(slice[1], b'n' | b'N')
        && slice[2] == b'-'
        && slice[3] == b'-'
}

/// Check if a host has a label starting with `xn--` (case insensitive)
pub fn has_punycode(host: &[u8]) -> bool {
    if host.len() < 4 {
        return false;
    }

    if is_punycode_prefix(host) {
        return true;
    }

    // Check for .xn-- patterns using memchr for faster scanning
    memchr::memchr_iter(b'.', host).any(|pos| is_punycode_prefix(&host[pos + 1..]))
}

/// UTS #46 non-transitional `ToASCII` of a percent-decoded host.
///
/// Forbidden domain code points are rejected. Empty output is an error, since a
/// special URL cannot have an empty host after mapping.
pub fn idn_to_ascii(host: &str) -> Result<Cow<'_, str>> {
    let ascii = idna::domain_to_ascii_cow(host.as_bytes(), AsciiDenyList::URL)
        .map_err(|_| CanonError::Idna)?;
    if ascii.is_empty() {
        return Err(CanonError::InvalidHost);
    }
    Ok(ascii)
}
