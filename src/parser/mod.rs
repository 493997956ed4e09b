//! Splitting a spec into component spans.
//!
//! Parsers never fail. They record where each component is so the
//! canonicalizers can validate and rewrite it.

mod file;
mod filesystem;
mod mailto;
mod non_special;
mod path_url;
mod standard;

pub use file::parse_file_url;
pub use filesystem::parse_filesystem_url;
pub use mailto::parse_mailto_url;
pub use non_special::parse_non_special_url;
pub(crate) use non_special::parse_after_non_special_scheme;
pub use path_url::parse_path_url;
pub(crate) use standard::parse_after_special_scheme;
pub use standard::parse_standard_url;

use crate::checkers::is_url_slash;
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::error::{CanonError, Result};
use crate::helpers::{find_from, trim_url};
use crate::parsed::Parsed;
use crate::types::CanonMode;

/// Find the scheme of `spec`: everything from the first non-whitespace
/// character up to the first `:`. The scheme is not validated here.
pub fn extract_scheme<C: CodeUnit>(spec: &[C]) -> Option<Component> {
    let (begin, _) = trim_url(spec, false);
    if begin == spec.len() {
        return None;
    }
    spec[begin..]
        .iter()
        .position(|unit| unit.is(b':'))
        .map(|colon| Component::new(begin, colon))
}

/// [`extract_scheme`] on `spec[begin..end]`, with the result in `spec`
/// coordinates.
pub(crate) fn extract_scheme_in<C: CodeUnit>(
    spec: &[C],
    begin: usize,
    end: usize,
) -> Option<Component> {
    let mut scheme = extract_scheme(spec.get(begin..end)?)?;
    scheme.shift(begin);
    Some(scheme)
}

/// Trimmed bounds of `spec` and the scheme found inside them.
pub(crate) fn trim_and_extract_scheme<C: CodeUnit>(
    spec: &[C],
    trim_path_end: bool,
) -> (usize, usize, Option<Component>) {
    let (begin, end) = trim_url(spec, trim_path_end);
    (begin, end, extract_scheme_in(spec, begin, end))
}

/// End of an authority starting at `begin`.
pub(crate) fn find_next_authority_terminator<C: CodeUnit>(
    spec: &[C],
    begin: usize,
    end: usize,
    mode: CanonMode,
) -> usize {
    find_from(spec, begin, end, |unit| {
        mode.is_slash(unit) || unit.is(b'?') || unit.is(b'#')
    })
}

/// Authority spans: username, password, host, port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Authority {
    pub username: Component,
    pub password: Component,
    pub host: Component,
    pub port: Component,
}

impl Authority {
    pub(crate) fn apply(self, parsed: &mut Parsed) {
        parsed.username = self.username;
        parsed.password = self.password;
        parsed.host = self.host;
        parsed.port = self.port;
    }
}

/// Split an authority into userinfo and server info on its last `@`.
///
/// An empty authority has no host for special URLs, and an empty host for
/// non-special ones (`git:///x`).
pub(crate) fn parse_authority<C: CodeUnit>(
    spec: &[C],
    auth: Component,
    mode: CanonMode,
) -> Authority {
    if auth.is_empty() {
        let host = if mode == CanonMode::NonSpecial {
            Component::new(auth.begin, 0)
        } else {
            Component::ABSENT
        };
        return Authority {
            host,
            ..Authority::default()
        };
    }

    let at = auth.slice(spec).iter().rposition(|unit| unit.is(b'@'));
    match at {
        Some(offset) => {
            let at = auth.begin + offset;
            let (username, password) = parse_user_info(spec, Component::from_range(auth.begin, at));
            let (host, port) = parse_server_info(spec, Component::from_range(at + 1, auth.end()), mode);
            Authority {
                username,
                password,
                host,
                port,
            }
        }
        None => {
            let (host, port) = parse_server_info(spec, auth, mode);
            Authority {
                host,
                port,
                ..Authority::default()
            }
        }
    }
}

/// Username up to the first `:`, password after it.
fn parse_user_info<C: CodeUnit>(spec: &[C], user: Component) -> (Component, Component) {
    match user.slice(spec).iter().position(|unit| unit.is(b':')) {
        Some(colon) => (
            Component::new(user.begin, colon),
            Component::from_range(user.begin + colon + 1, user.end()),
        ),
        None => (user, Component::ABSENT),
    }
}

/// Host and port. The port follows the last `:` that is not inside a
/// bracketed IPv6 literal.
fn parse_server_info<C: CodeUnit>(
    spec: &[C],
    server: Component,
    mode: CanonMode,
) -> (Component, Component) {
    if server.is_empty() {
        let host = if mode == CanonMode::NonSpecial {
            Component::new(server.begin, 0)
        } else {
            Component::ABSENT
        };
        return (host, Component::ABSENT);
    }

    let units = server.slice(spec);
    let mut ipv6_terminator = if units[0].is(b'[') {
        Some(units.len())
    } else {
        None
    };
    let mut colon = None;
    for (i, unit) in units.iter().enumerate() {
        if unit.is(b']') {
            ipv6_terminator = Some(i);
        } else if unit.is(b':') {
            colon = Some(i);
        }
    }

    match colon {
        Some(colon) if ipv6_terminator.is_none_or(|end| colon > end) => {
            let mut host = Component::new(server.begin, colon);
            if host.is_empty() && mode != CanonMode::NonSpecial {
                host.reset();
            }
            let port = Component::from_range(server.begin + colon + 1, server.end());
            (host, port)
        }
        _ => (server, Component::ABSENT),
    }
}

/// Split `path` into path, query and fragment. The first `?` starts the
/// query; the first `#` ends everything, even inside the query.
pub(crate) fn parse_path<C: CodeUnit>(
    spec: &[C],
    path: Component,
) -> (Component, Component, Component) {
    if !path.is_valid() {
        return (Component::ABSENT, Component::ABSENT, Component::ABSENT);
    }

    let end = path.end();
    let mut query_separator = None;
    let mut ref_separator = None;
    for (i, unit) in path.slice(spec).iter().enumerate() {
        if unit.is(b'?') && query_separator.is_none() {
            query_separator = Some(path.begin + i);
        } else if unit.is(b'#') {
            ref_separator = Some(path.begin + i);
            break;
        }
    }

    let (mut file_end, query_end, fragment) = match ref_separator {
        Some(hash) => (hash, hash, Component::from_range(hash + 1, end)),
        None => (end, end, Component::ABSENT),
    };

    let query = match query_separator {
        Some(question) => {
            file_end = question;
            Component::from_range(question + 1, query_end)
        }
        None => Component::ABSENT,
    };

    let file_path = if file_end == path.begin {
        Component::ABSENT
    } else {
        Component::from_range(path.begin, file_end)
    };

    (file_path, query, fragment)
}

pub(crate) fn apply_path<C: CodeUnit>(spec: &[C], full_path: Component, parsed: &mut Parsed) {
    let (path, query, fragment) = parse_path(spec, full_path);
    parsed.path = path;
    parsed.query = query;
    parsed.fragment = fragment;
}

/// Parse the port in `port` of `spec`.
///
/// `Ok(None)` means no port was given. Leading zeros are skipped; more than
/// five remaining digits, a non-digit or a value above 65535 is an error.
pub fn parse_port<C: CodeUnit>(spec: &[C], port: Component) -> Result<Option<u16>> {
    const MAX_DIGITS: usize = 5;

    if port.is_empty() {
        return Ok(None);
    }

    let units = port.slice(spec);
    let Some(first_significant) = units.iter().position(|unit| !unit.is(b'0')) else {
        // All digits were 0
        return Ok(Some(0));
    };
    let digits = &units[first_significant..];
    if digits.len() > MAX_DIGITS {
        return Err(CanonError::InvalidPort);
    }

    let mut value: u32 = 0;
    for unit in digits {
        let digit = unit
            .ascii()
            .filter(u8::is_ascii_digit)
            .ok_or(CanonError::InvalidPort)?;
        value = value * 10 + u32::from(digit - b'0');
    }
    u16::try_from(value)
        .map(Some)
        .map_err(|_| CanonError::InvalidPort)
}

/// The file name of `path`: the last segment, without any `;` parameters.
pub fn extract_file_name<C: CodeUnit>(spec: &[C], path: Component) -> Component {
    if path.is_empty() {
        return Component::ABSENT;
    }

    let mut file_end = path.end();
    for i in (path.begin..path.end()).rev() {
        if spec[i].is(b';') {
            file_end = i;
        } else if is_url_slash(spec[i]) {
            return Component::from_range(i + 1, file_end);
        }
    }

    // No slash: everything is the file name
    Component::from_range(path.begin, file_end)
}
