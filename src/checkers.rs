use crate::code_unit::CodeUnit;

/// Check if a host "ends in a number" and must therefore be parsed as IPv4.
/// The last non-empty label is all decimal digits, or `0x` followed by hex
/// digits. A single trailing dot is ignored.
pub fn is_ipv4(host: &[u8]) -> bool {
    let host = host.strip_suffix(b".").unwrap_or(host);

    // Must be non-empty with valid last character (digit, hex a-f/A-F, or x/X)
    let Some(&last) = host.last() else {
        return false;
    };
    if !last.is_ascii_hexdigit() && !matches!(last, b'x' | b'X') {
        return false;
    }

    let last_label = match memchr::memrchr(b'.', host) {
        Some(dot) => &host[dot + 1..],
        None => host,
    };

    if !last_label.is_empty() && last_label.iter().all(u8::is_ascii_digit) {
        return true;
    }

    if let Some(hex) = last_label
        .strip_prefix(b"0x")
        .or_else(|| last_label.strip_prefix(b"0X"))
    {
        return hex.iter().all(u8::is_ascii_hexdigit);
    }

    false
}

/// `/` or `\`. Backslashes are separators everywhere except in non-special
/// URLs, which check for `/` themselves.
pub fn is_url_slash<C: CodeUnit>(unit: C) -> bool {
    unit.is(b'/') || unit.is(b'\\')
}

fn is_slash_or_terminator<C: CodeUnit>(unit: C) -> bool {
    is_url_slash(unit) || unit.is(b'?') || unit.is(b'#')
}

/// True when `spec[begin..end]` starts with a drive letter and a `:` or `|`,
/// followed by the end of input or a separator.
pub fn does_begin_windows_drive_spec<C: CodeUnit>(spec: &[C], begin: usize, end: usize) -> bool {
    if begin + 2 > end || end > spec.len() {
        return false;
    }
    let letter = spec[begin].ascii().is_some_and(|b| b.is_ascii_alphabetic());
    let colon = spec[begin + 1].is(b':') || spec[begin + 1].is(b'|');
    letter && colon && (begin + 2 == end || is_slash_or_terminator(spec[begin + 2]))
}

/// True when `spec[begin..end]` starts with two slashes. With `strict_slashes`
/// only backslashes count, as in a raw Windows path.
pub fn does_begin_unc_path<C: CodeUnit>(
    spec: &[C],
    begin: usize,
    end: usize,
    strict_slashes: bool,
) -> bool {
    if begin + 2 > end || end > spec.len() {
        return false;
    }
    if strict_slashes {
        spec[begin].is(b'\\') && spec[begin + 1].is(b'\\')
    } else {
        is_url_slash(spec[begin]) && is_url_slash(spec[begin + 1])
    }
}

/// Like [`does_begin_windows_drive_spec`], after skipping any leading slashes.
pub fn does_begin_slash_windows_drive_spec<C: CodeUnit>(
    spec: &[C],
    begin: usize,
    end: usize,
) -> bool {
    let mut start = begin;
    while start < end && is_url_slash(spec[start]) {
        start += 1;
    }
    does_begin_windows_drive_spec(spec, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ipv4() {
        // Decimal
        assert!(is_ipv4(b"192.168.1.1"));
        assert!(is_ipv4(b"127.0.0.1"));
        assert!(is_ipv4(b"192.168.1.1.")); // Trailing dot
        assert!(is_ipv4(b"foo.09"));

        // Hexadecimal (requires 0x prefix)
        assert!(is_ipv4(b"0xC0A80101"));
        assert!(is_ipv4(b"192.0x00A80001"));
        assert!(is_ipv4(b"0x"));
        assert!(is_ipv4(b"0X"));

        // Not IPv4
        assert!(!is_ipv4(b""));
        assert!(!is_ipv4(b"."));
        assert!(!is_ipv4(b"example.com"));
        assert!(!is_ipv4(b"192.168.1.g"));
        assert!(!is_ipv4(b"ab"));
        assert!(!is_ipv4(b"1.2.3.4.."));
    }

    #[test]
    fn test_drive_spec() {
        let spec = b"c:/foo";
        assert!(does_begin_windows_drive_spec(&spec[..], 0, spec.len()));
        assert!(does_begin_windows_drive_spec(&b"Z|"[..], 0, 2));
        assert!(!does_begin_windows_drive_spec(&b"c:foo"[..], 0, 5));
        assert!(!does_begin_windows_drive_spec(&b"1:/"[..], 0, 3));
        assert!(!does_begin_windows_drive_spec(&b"c"[..], 0, 1));

        let wide: Vec<u16> = "//C:\\x".encode_utf16().collect();
        assert!(does_begin_slash_windows_drive_spec(&wide, 0, wide.len()));
    }

    #[test]
    fn test_unc_path() {
        assert!(does_begin_unc_path(&br"\\server"[..], 0, 8, true));
        assert!(!does_begin_unc_path(&b"//server"[..], 0, 8, true));
        assert!(does_begin_unc_path(&b"/\\server"[..], 0, 8, false));
        assert!(!does_begin_unc_path(&b"/"[..], 0, 1, false));
    }
}
