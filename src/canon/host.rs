use super::{append_escaped_byte, append_invalid_narrow_string, append_utf8_escaped_char};
use crate::character_sets::{canonical_host_char, is_forbidden_opaque_host_char};
use crate::checkers::is_ipv4;
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::error::{CanonError, Result};
use crate::ipv4::{append_ipv4, parse_ipv4};
use crate::ipv6::{append_ipv6, ipv6_to_bytes, parse_ipv6};
use crate::output::CanonOutput;
use crate::types::HostFamily;
use crate::unicode::idna::{has_punycode, idn_to_ascii};
use crate::unicode::percent_encode::percent_decode_bytes;

/// What canonicalizing a host produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostInfo {
    pub family: HostFamily,
    /// Span of the host in the output
    pub out_host: Component,
    /// Dotted parts the IPv4 input was written with, 0 for other families
    pub num_ipv4_components: usize,
    address: [u8; 16],
    address_len: usize,
}

impl HostInfo {
    /// Network-order address bytes: 4 for IPv4, 16 for IPv6, empty otherwise.
    pub fn address(&self) -> &[u8] {
        &self.address[..self.address_len]
    }

    pub fn is_ip_address(&self) -> bool {
        matches!(self.family, HostFamily::Ipv4 | HostFamily::Ipv6)
    }

    fn set_ipv4(&mut self, octets: [u8; 4], num_components: usize) {
        self.family = HostFamily::Ipv4;
        self.num_ipv4_components = num_components;
        self.address[..4].copy_from_slice(&octets);
        self.address_len = 4;
    }

    fn set_ipv6(&mut self, pieces: &[u16; 8]) {
        self.family = HostFamily::Ipv6;
        self.address = ipv6_to_bytes(pieces);
        self.address_len = 16;
    }
}

/// Canonicalize the host of a special URL.
pub fn canonicalize_host<C: CodeUnit>(
    spec: &[C],
    host: Component,
    output: &mut CanonOutput,
    out_host: &mut Component,
) -> Result<()> {
    let mut info = HostInfo::default();
    let result = canonicalize_host_verbose(spec, host, output, &mut info);
    *out_host = info.out_host;
    result
}

/// Canonicalize the host of a special URL, reporting what kind of host it
/// turned out to be.
///
/// Domains are lower-cased, percent-decoded and run through IDNA; hosts that
/// end in a number are rewritten as dotted-decimal IPv4 and bracketed hosts as
/// compressed IPv6. On failure the input is echoed, escaped, and the family is
/// [`HostFamily::Broken`].
pub fn canonicalize_host_verbose<C: CodeUnit>(
    spec: &[C],
    host: Component,
    output: &mut CanonOutput,
    info: &mut HostInfo,
) -> Result<()> {
    *info = HostInfo::default();
    let begin = output.len();
    let units = host.slice(spec);

    let result = if units.is_empty() {
        Ok(())
    } else if units[0].is(b'[') {
        canonicalize_bracketed(units, output, info)
    } else {
        canonicalize_domain(units, output).and_then(|()| rewrite_ipv4(begin, output, info))
    };

    if result.is_err() {
        info.family = HostFamily::Broken;
    }
    info.out_host = Component::from_range(begin, output.len());
    result
}

/// Write `host` in canonical numeric form if it is an IP address literal.
///
/// Nothing is written and the family stays [`HostFamily::Neutral`] when the
/// host does not look like an address. A host that looks like one but does not
/// parse is [`HostFamily::Broken`], again without output.
pub fn canonicalize_ip_address<C: CodeUnit>(
    spec: &[C],
    host: Component,
    output: &mut CanonOutput,
    info: &mut HostInfo,
) -> Result<()> {
    *info = HostInfo::default();
    let units = host.slice(spec);
    let begin = output.len();
    let narrowed = C::narrow(units);

    if units.first().is_some_and(|unit| unit.is(b'[')) {
        let parsed = core::str::from_utf8(&narrowed)
            .map_err(|_| CanonError::InvalidIpv6)
            .and_then(parse_ipv6);
        match parsed {
            Ok(pieces) => {
                append_ipv6(output, &pieces);
                info.set_ipv6(&pieces);
            }
            Err(error) => {
                info.family = HostFamily::Broken;
                return Err(error);
            }
        }
    } else if is_ipv4(&narrowed) {
        let parsed = core::str::from_utf8(&narrowed)
            .map_err(|_| CanonError::InvalidIpv4)
            .and_then(parse_ipv4);
        match parsed {
            Ok(address) => {
                append_ipv4(output, address.octets);
                info.set_ipv4(address.octets, address.num_components);
            }
            Err(error) => {
                info.family = HostFamily::Broken;
                return Err(error);
            }
        }
    } else {
        return Ok(());
    }

    info.out_host = Component::from_range(begin, output.len());
    Ok(())
}

/// Canonicalize the opaque host of a non-special URL.
pub fn canonicalize_non_special_host<C: CodeUnit>(
    spec: &[C],
    host: Component,
    output: &mut CanonOutput,
    out_host: &mut Component,
) -> Result<()> {
    let mut info = HostInfo::default();
    let result = canonicalize_non_special_host_verbose(spec, host, output, &mut info);
    *out_host = info.out_host;
    result
}

/// Canonicalize an opaque host.
///
/// Case is kept and nothing is decoded. Forbidden code points fail, C0
/// controls and non-ASCII are escaped. Bracketed hosts are still parsed as
/// IPv6.
pub fn canonicalize_non_special_host_verbose<C: CodeUnit>(
    spec: &[C],
    host: Component,
    output: &mut CanonOutput,
    info: &mut HostInfo,
) -> Result<()> {
    *info = HostInfo::default();
    let begin = output.len();
    let units = host.slice(spec);

    let result = if units.first().is_some_and(|unit| unit.is(b'[')) {
        canonicalize_bracketed(units, output, info)
    } else {
        canonicalize_opaque(units, output)
    };

    if result.is_err() {
        info.family = HostFamily::Broken;
    }
    info.out_host = Component::from_range(begin, output.len());
    result
}

fn canonicalize_opaque<C: CodeUnit>(units: &[C], output: &mut CanonOutput) -> Result<()> {
    let mut result = Ok(());
    let mut i = 0;
    while i < units.len() {
        match units[i].ascii() {
            Some(byte) if is_forbidden_opaque_host_char(byte) => {
                result = Err(CanonError::ForbiddenHostCodePoint);
                append_escaped_byte(byte, output);
            }
            Some(0x7F) => append_escaped_byte(0x7F, output),
            Some(byte) => output.push(byte),
            None => {
                let decoded = C::decode_at(units, i);
                if !decoded.valid && result.is_ok() {
                    result = Err(CanonError::InvalidUnicode);
                }
                append_utf8_escaped_char(decoded.ch, output);
                i += decoded.len;
                continue;
            }
        }
        i += 1;
    }
    result
}

fn canonicalize_bracketed<C: CodeUnit>(
    units: &[C],
    output: &mut CanonOutput,
    info: &mut HostInfo,
) -> Result<()> {
    let closed = units.last().is_some_and(|unit| unit.is(b']'));
    let parsed = if closed && units.iter().all(|unit| unit.is_ascii()) {
        let narrowed = C::narrow(units);
        core::str::from_utf8(&narrowed)
            .map_err(|_| CanonError::InvalidIpv6)
            .and_then(parse_ipv6)
    } else {
        Err(CanonError::InvalidIpv6)
    };

    match parsed {
        Ok(pieces) => {
            append_ipv6(output, &pieces);
            info.set_ipv6(&pieces);
            Ok(())
        }
        Err(error) => {
            append_invalid_narrow_string(units, output);
            Err(error)
        }
    }
}

/// Write a domain: the fast path when the input is plain ASCII, otherwise
/// percent-decode and map through IDNA first.
fn canonicalize_domain<C: CodeUnit>(units: &[C], output: &mut CanonOutput) -> Result<()> {
    let narrowed = C::narrow(units);
    let plain = units.iter().all(|unit| unit.is_ascii() && !unit.is(b'%'));
    if plain && !has_punycode(&narrowed) {
        return write_ascii_host(&narrowed, output);
    }

    let lossy = C::to_str_lossy(units);
    if !lossy.valid {
        append_invalid_narrow_string(units, output);
        return Err(CanonError::InvalidUnicode);
    }

    let decoded = percent_decode_bytes(lossy.text.as_bytes());
    let Ok(decoded) = core::str::from_utf8(&decoded) else {
        append_invalid_narrow_string(lossy.text.as_bytes(), output);
        return Err(CanonError::InvalidPercentEncoding);
    };

    if decoded.is_ascii() && !has_punycode(decoded.as_bytes()) {
        return write_ascii_host(decoded.as_bytes(), output);
    }

    match idn_to_ascii(decoded) {
        Ok(ascii) => write_ascii_host(ascii.as_bytes(), output),
        Err(error) => {
            append_invalid_narrow_string(decoded.as_bytes(), output);
            Err(error)
        }
    }
}

/// Lower-case an ASCII host, escaping forbidden code points.
fn write_ascii_host(host: &[u8], output: &mut CanonOutput) -> Result<()> {
    let mut result = Ok(());
    for &byte in host {
        match canonical_host_char(byte) {
            Some(canonical) => output.push(canonical),
            None => {
                result = Err(CanonError::ForbiddenHostCodePoint);
                append_escaped_byte(byte, output);
            }
        }
    }
    result
}

/// Replace a just-written host that ends in a number with its dotted-decimal
/// form.
fn rewrite_ipv4(begin: usize, output: &mut CanonOutput, info: &mut HostInfo) -> Result<()> {
    let written = output.as_bytes().get(begin..).unwrap_or(&[]);
    if !is_ipv4(written) {
        return Ok(());
    }

    let address = core::str::from_utf8(written)
        .map_err(|_| CanonError::InvalidIpv4)
        .and_then(parse_ipv4)?;
    output.set_length(begin);
    append_ipv4(output, address.octets);
    info.set_ipv4(address.octets, address.num_components);
    Ok(())
}
