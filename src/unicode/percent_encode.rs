use crate::compat::Cow;
use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC};

// Encode sets from the WHATWG URL Standard
// https://url.spec.whatwg.org/#percent-encoded-bytes

/// C0 control percent-encode set (controls and DEL)
pub const C0_CONTROL_SET: &AsciiSet = CONTROLS;

/// Fragment percent-encode set
/// C0 control + space, ", <, >, \`
pub const FRAGMENT_SET: &AsciiSet = &C0_CONTROL_SET
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// Mailbox (mailto path) set: the same printable characters as the fragment
/// set. Non-ASCII is always escaped.
pub const MAILBOX_SET: &AsciiSet = FRAGMENT_SET;

/// Userinfo percent-encode set
/// Fragment + #, ?, {, }, /, :, ;, =, @, [, \, ], ^, |
pub const USERINFO_SET: &AsciiSet = &FRAGMENT_SET
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|');

/// Special query percent-encode set (for special URLs like http, https, etc.)
/// C0 control + space, ", #, <, >, '
pub const SPECIAL_QUERY_SET: &AsciiSet = &C0_CONTROL_SET
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'\'');

/// Query percent-encode set (for non-special URLs)
/// C0 control + space, ", #, <, >
pub const QUERY_SET: &AsciiSet = &C0_CONTROL_SET
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>');

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, as JavaScript's
/// `encodeURIComponent` escapes
pub const URI_COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Decode `%XX` escapes to raw bytes. Malformed escapes are kept as they are.
pub fn percent_decode_bytes(input: &[u8]) -> Cow<'_, [u8]> {
    percent_encoding::percent_decode(input).into()
}

/// Decode `%XX` escapes and read the result as UTF-8, replacing malformed
/// sequences with U+FFFD
pub fn percent_decode_lossy(input: &[u8]) -> Cow<'_, str> {
    percent_encoding::percent_decode(input).decode_utf8_lossy()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use percent_encoding::utf8_percent_encode;

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode_lossy(b"hello%20world"), "hello world");
        assert_eq!(percent_decode_lossy(b"%2F"), "/");
        assert_eq!(percent_decode_lossy(b"%C3%A9"), "\u{e9}");
        assert_eq!(percent_decode_lossy(b"%ZZ%"), "%ZZ%");
        assert_eq!(percent_decode_lossy(b"%FF"), "\u{FFFD}");
        assert_eq!(&*percent_decode_bytes(b"a%FFb"), b"a\xFFb");
    }

    #[test]
    fn test_sets() {
        assert_eq!(utf8_percent_encode("a b'", SPECIAL_QUERY_SET).to_string(), "a%20b%27");
        assert_eq!(utf8_percent_encode("a b'", QUERY_SET).to_string(), "a%20b'");
        assert_eq!(utf8_percent_encode("u:@", USERINFO_SET).to_string(), "u%3A%40");
        assert_eq!(utf8_percent_encode("a`#", FRAGMENT_SET).to_string(), "a%60#");
        assert_eq!(
            utf8_percent_encode("a b&c=d/~", URI_COMPONENT_SET).to_string(),
            "a%20b%26c%3Dd%2F~"
        );
    }
}
