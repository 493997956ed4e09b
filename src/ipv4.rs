/// IPv4 address parser supporting decimal, octal, and hexadecimal notation
/// Follows the WHATWG URL Standard host parser
use crate::compat::Vec;
use crate::error::{CanonError, Result};
use crate::output::CanonOutput;

/// A parsed IPv4 address and how many dotted parts it was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Address {
    pub octets: [u8; 4],
    pub num_components: usize,
}

/// Parse an IPv4 address.
/// Supports:
/// - Decimal: 192.168.1.1
/// - Hex: 0xC0A80101
/// - Octal: 0300.0250.01.01
/// - Mixed and short forms: 192.0x00A80001, 127.1
pub fn parse_ipv4(input: &str) -> Result<Ipv4Address> {
    if input.is_empty() {
        return Err(CanonError::InvalidIpv4);
    }

    // A single trailing dot is allowed and ignored
    let input = input.strip_suffix('.').unwrap_or(input);

    let parts: Vec<&str> = input.split('.').collect();
    let part_count = parts.len();

    if part_count == 0 || part_count > 4 {
        return Err(CanonError::InvalidIpv4);
    }

    let numbers: Vec<u64> = parts
        .iter()
        .map(|part| {
            if part.is_empty() {
                Err(CanonError::InvalidIpv4)
            } else {
                parse_ipv4_number(part)
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let Some((&last, leading)) = numbers.split_last() else {
        return Err(CanonError::InvalidIpv4);
    };

    // The last number fills all remaining bytes: < 256^(5-n)
    if last >= 256u64.pow((5 - part_count) as u32) {
        return Err(CanonError::InvalidIpv4);
    }
    if leading.iter().any(|&number| number >= 256) {
        return Err(CanonError::InvalidIpv4);
    }

    let mut ipv4: u32 = 0;
    for (i, &number) in leading.iter().enumerate() {
        ipv4 |= (number as u32) << ((3 - i) * 8);
    }
    ipv4 |= last as u32;

    Ok(Ipv4Address {
        octets: ipv4.to_be_bytes(),
        num_components: part_count,
    })
}

/// Parse a single IPv4 number component (supports decimal, hex, octal).
fn parse_ipv4_number(input: &str) -> Result<u64> {
    let (digits, radix) = if let Some(hex_part) = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        // Bare "0x" is zero
        if hex_part.is_empty() {
            return Ok(0);
        }
        (hex_part, 16)
    } else if input.len() >= 2 && input.starts_with('0') {
        (&input[1..], 8)
    } else {
        (input, 10)
    };

    // `from_str_radix` accepts a leading '+', which is not a digit here
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CanonError::InvalidIpv4);
    }
    u64::from_str_radix(digits, radix).map_err(|_| CanonError::InvalidIpv4)
}

/// Write `octets` in dotted decimal notation.
pub fn append_ipv4(output: &mut CanonOutput, octets: [u8; 4]) {
    for (i, octet) in octets.into_iter().enumerate() {
        if i > 0 {
            output.push(b'.');
        }
        output.append_decimal(u32::from(octet));
    }
}
