/// IPv6 address parsing and serialization
/// Serialization compresses the leftmost longest run of zero pieces
use crate::compat::Vec;
use crate::error::{CanonError, Result};
use crate::output::CanonOutput;

/// Parse an IPv6 address, with or without its brackets (e.g. "[`::1`]").
/// Returns the 8 u16 pieces if valid.
pub fn parse_ipv6(input: &str) -> Result<[u16; 8]> {
    let input = input
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(input);

    if input.is_empty() {
        return Err(CanonError::InvalidIpv6);
    }

    // Embedded IPv4 (e.g. "::127.0.0.1") sits after the last colon
    let embedded_ipv4 = input
        .rfind(':')
        .filter(|&pos| input[pos + 1..].contains('.'));

    match embedded_ipv4 {
        Some(last_colon) => {
            let ipv4 = parse_embedded_ipv4(&input[last_colon + 1..])?;
            // Keep a "::" that ends right before the IPv4 part.
            let head = if input[..=last_colon].ends_with("::") {
                &input[..=last_colon]
            } else {
                &input[..last_colon]
            };
            let mut pieces = expand(head, 6)?;
            pieces[6] = (ipv4 >> 16) as u16;
            pieces[7] = ipv4 as u16;
            Ok(pieces)
        }
        None => expand(input, 8),
    }
}

/// Expand `input` into `width` leading pieces of an address, filling a
/// "::" with zeros.
fn expand(input: &str, width: usize) -> Result<[u16; 8]> {
    let mut pieces = [0u16; 8];

    let Some(compress) = input.find("::") else {
        let parsed = parse_pieces(input)?;
        if parsed.len() != width {
            return Err(CanonError::InvalidIpv6);
        }
        pieces[..width].copy_from_slice(&parsed);
        return Ok(pieces);
    };

    let before = parse_pieces(&input[..compress])?;
    let after = parse_pieces(&input[compress + 2..])?;

    // "::" stands for at least one zero piece
    let total = before.len() + after.len();
    if total >= width {
        return Err(CanonError::InvalidIpv6);
    }

    pieces[..before.len()].copy_from_slice(&before);
    let after_start = width - after.len();
    pieces[after_start..width].copy_from_slice(&after);
    Ok(pieces)
}

/// Parse colon-separated hex pieces. An empty string has none.
fn parse_pieces(s: &str) -> Result<Vec<u16>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(':').map(parse_hex_piece).collect()
}

fn parse_hex_piece(s: &str) -> Result<u16> {
    if s.is_empty() || s.len() > 4 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CanonError::InvalidIpv6);
    }
    u16::from_str_radix(s, 16).map_err(|_| CanonError::InvalidIpv6)
}

/// Dotted-decimal IPv4 inside an IPv6 address: exactly four decimal parts,
/// no leading zeros.
fn parse_embedded_ipv4(s: &str) -> Result<u32> {
    let mut count = 0;
    let address = s.split('.').try_fold(0u32, |acc, part| {
        count += 1;
        let digits_only = !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits_only || (part.len() > 1 && part.starts_with('0')) {
            return Err(CanonError::InvalidIpv6);
        }
        let byte: u8 = part.parse().map_err(|_| CanonError::InvalidIpv6)?;
        Ok((acc << 8) | u32::from(byte))
    })?;
    if count == 4 {
        Ok(address)
    } else {
        Err(CanonError::InvalidIpv6)
    }
}

/// Write `pieces` in brackets, the longest run of two or more zero pieces
/// contracted to "::". The leftmost run wins a tie.
pub fn append_ipv6(output: &mut CanonOutput, pieces: &[u16; 8]) {
    let compress = find_longest_zero_sequence(pieces);

    output.push(b'[');
    let mut i = 0;
    while i < 8 {
        if let Some(ref range) = compress
            && range.start == i
        {
            output.push_str("::");
            i = range.end;
            continue;
        }

        if i > 0 && output.as_bytes().last() != Some(&b':') {
            output.push(b':');
        }
        output.append_hex(pieces[i]);
        i += 1;
    }
    output.push(b']');
}

/// Find the longest sequence of at least two consecutive zero pieces.
fn find_longest_zero_sequence(pieces: &[u16; 8]) -> Option<core::ops::Range<usize>> {
    let mut best: Option<core::ops::Range<usize>> = None;
    let mut current_start: Option<usize> = None;

    for (i, &piece) in pieces.iter().enumerate() {
        if piece == 0 {
            let start = *current_start.get_or_insert(i);
            let len = i + 1 - start;
            if len >= 2 && best.as_ref().is_none_or(|range| len > range.len()) {
                best = Some(start..i + 1);
            }
        } else {
            current_start = None;
        }
    }

    best
}

/// The address as 16 network-order bytes.
pub fn ipv6_to_bytes(pieces: &[u16; 8]) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    for (chunk, piece) in bytes.chunks_exact_mut(2).zip(pieces) {
        chunk.copy_from_slice(&piece.to_be_bytes());
    }
    bytes
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn serialize(pieces: &[u16; 8]) -> String {
        let mut output = CanonOutput::new();
        append_ipv6(&mut output, pieces);
        output.into_string()
    }

    #[test]
    fn test_parse_ipv6_loopback() {
        assert_eq!(parse_ipv6("[::1]").unwrap(), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(parse_ipv6("::").unwrap(), [0; 8]);
    }

    #[test]
    fn test_parse_ipv6_full() {
        let result = parse_ipv6("[2001:db8:0:0:1:0:0:1]").unwrap();
        assert_eq!(result, [0x2001, 0xdb8, 0, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_parse_ipv6_compressed() {
        let result = parse_ipv6("[2001:db8::1]").unwrap();
        assert_eq!(result, [0x2001, 0xdb8, 0, 0, 0, 0, 0, 1]);
        let result = parse_ipv6("1:2:3:4:5:6:7::").unwrap();
        assert_eq!(result, [1, 2, 3, 4, 5, 6, 7, 0]);
    }

    #[test]
    fn test_parse_ipv6_with_ipv4() {
        let result = parse_ipv6("[::127.0.0.1]").unwrap();
        assert_eq!(result, [0, 0, 0, 0, 0, 0, 0x7f00, 0x0001]);

        let result = parse_ipv6("[::ffff:192.168.1.1]").unwrap();
        assert_eq!(result, [0, 0, 0, 0, 0, 0xffff, 0xc0a8, 0x0101]);

        let result = parse_ipv6("1:2:3:4:5:6:1.2.3.4").unwrap();
        assert_eq!(result, [1, 2, 3, 4, 5, 6, 0x0102, 0x0304]);
    }

    #[test]
    fn test_parse_ipv6_invalid() {
        assert!(parse_ipv6("[]").is_err());
        assert!(parse_ipv6("[1:2]").is_err());
        assert!(parse_ipv6("[::1::]").is_err());
        assert!(parse_ipv6("[:1]").is_err());
        assert!(parse_ipv6("[1:2:3:4:5:6:7:8:9]").is_err());
        assert!(parse_ipv6("[12345::]").is_err());
        assert!(parse_ipv6("[::1%eth0]").is_err());
        assert!(parse_ipv6("[::01.2.3.4]").is_err());
        assert!(parse_ipv6("[::1.2.3]").is_err());
        assert!(parse_ipv6("[1:2:3:4:5:6:7::1.2.3.4]").is_err());
    }

    #[test]
    fn test_serialize_ipv6() {
        assert_eq!(serialize(&[0, 0, 0, 0, 0, 0, 0, 1]), "[::1]");
        assert_eq!(serialize(&[0x2001, 0xdb8, 0, 0, 0, 0, 0, 1]), "[2001:db8::1]");
        assert_eq!(serialize(&[0, 0, 0, 0, 0, 0, 0x7f00, 0x0001]), "[::7f00:1]");
        assert_eq!(serialize(&[1, 0, 2, 3, 4, 5, 6, 7]), "[1:0:2:3:4:5:6:7]");
        assert_eq!(serialize(&[0; 8]), "[::]");
    }

    #[test]
    fn test_leftmost_longest_run_wins() {
        assert_eq!(serialize(&[0, 0, 0, 1, 0, 0, 0, 1]), "[::1:0:0:0:1]");
        assert_eq!(serialize(&[1, 0, 0, 1, 0, 0, 0, 1]), "[1:0:0:1::1]");
    }

    #[test]
    fn test_ipv6_to_bytes() {
        let bytes = ipv6_to_bytes(&[0x2001, 0xdb8, 0, 0, 0, 0, 0, 1]);
        assert_eq!(&bytes[..4], &[0x20, 0x01, 0x0d, 0xb8]);
        assert_eq!(bytes[15], 1);
    }
}
