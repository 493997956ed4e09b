//! Canonicalizers: each appends the canonical form of its input to a
//! [`CanonOutput`] and records where it went.
//!
//! Component canonicalizers write something displayable even when they fail,
//! then report the failure. Whole-URL canonicalizers keep going after a
//! failure and return the first error in [`Canonical`].

mod charset;
mod file;
mod filesystem;
mod fragment;
mod host;
mod mailto;
mod non_special;
mod path;
mod path_url;
mod port;
mod query;
mod relative;
mod scheme;
mod standard;
mod userinfo;

#[cfg(feature = "encoding")]
pub use charset::EncodingConverter;
pub use charset::CharsetConverter;
pub use file::{canonicalize_file_path, canonicalize_file_url};
pub use filesystem::canonicalize_filesystem_url;
pub use fragment::canonicalize_ref;
pub use host::{
    HostInfo, canonicalize_host, canonicalize_host_verbose, canonicalize_ip_address,
    canonicalize_non_special_host, canonicalize_non_special_host_verbose,
};
pub use mailto::canonicalize_mailto_url;
pub use non_special::canonicalize_non_special_url;
pub use path::{canonicalize_partial_path, canonicalize_path};
pub use path_url::{canonicalize_path_url, canonicalize_path_url_path};
pub use port::canonicalize_port;
pub use query::canonicalize_query;
pub(crate) use relative::{is_relative_url, resolve_relative_url};
pub use scheme::canonicalize_scheme;
pub use standard::canonicalize_standard_url;
pub use userinfo::canonicalize_user_info;

use crate::code_unit::CodeUnit;
use crate::error::{CanonError, Result};
use crate::output::CanonOutput;
use crate::parsed::Parsed;
use percent_encoding::{AsciiSet, percent_encode_byte, utf8_percent_encode};

/// Result of canonicalizing a whole URL.
///
/// `parsed` indexes the output buffer and is always complete, even when
/// `error` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Canonical {
    pub parsed: Parsed,
    pub error: Option<CanonError>,
}

impl Canonical {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn result(&self) -> Result<()> {
        self.error.map_or(Ok(()), Err)
    }
}

/// The buffer each component is read from.
///
/// Canonicalizing a spec reads everything from one buffer. Replacing
/// components reads some of them from the base URL and the rest from the
/// replacement strings.
#[derive(Debug, Clone, Copy)]
pub struct ComponentSource<'a, C> {
    pub scheme: &'a [C],
    pub username: &'a [C],
    pub password: &'a [C],
    pub host: &'a [C],
    pub port: &'a [C],
    pub path: &'a [C],
    pub query: &'a [C],
    pub fragment: &'a [C],
}

impl<'a, C> ComponentSource<'a, C> {
    /// Read every component from `spec`.
    pub fn new(spec: &'a [C]) -> Self {
        Self {
            scheme: spec,
            username: spec,
            password: spec,
            host: spec,
            port: spec,
            path: spec,
            query: spec,
            fragment: spec,
        }
    }
}

pub(crate) fn append_escaped_byte(byte: u8, output: &mut CanonOutput) {
    output.push_str(percent_encode_byte(byte));
}

/// Append `ch` as percent-escaped UTF-8.
pub(crate) fn append_utf8_escaped_char(ch: char, output: &mut CanonOutput) {
    let mut utf8 = [0u8; 4];
    for &byte in ch.encode_utf8(&mut utf8).as_bytes() {
        append_escaped_byte(byte, output);
    }
}

/// Append the UTF-8 form of `input`, escaping everything in `set` and all
/// non-ASCII. Malformed input becomes an escaped U+FFFD and is reported.
pub(crate) fn append_string_of_type<C: CodeUnit>(
    input: &[C],
    set: &'static AsciiSet,
    output: &mut CanonOutput,
) -> Result<()> {
    let lossy = C::to_str_lossy(input);
    output.extend_encoded(utf8_percent_encode(&lossy.text, set));
    if lossy.valid {
        Ok(())
    } else {
        Err(CanonError::InvalidUnicode)
    }
}

/// Echo input that failed to canonicalize: ASCII is copied, everything else
/// escaped as UTF-8.
pub(crate) fn append_invalid_narrow_string<C: CodeUnit>(input: &[C], output: &mut CanonOutput) {
    let mut i = 0;
    while i < input.len() {
        if let Some(byte) = input[i].ascii() {
            output.push(byte);
            i += 1;
        } else {
            let decoded = C::decode_at(input, i);
            append_utf8_escaped_char(decoded.ch, output);
            i += decoded.len;
        }
    }
}
