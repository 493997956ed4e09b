//! Per-byte lookup tables for the ASCII range.
//!
//! Bytes at or above 0x80 never hit a table; callers route them to the
//! Unicode escape path first.

/// Check if a code unit is an ASCII tab or newline, removed anywhere in a URL
pub fn is_ascii_tab_or_newline(unit: u32) -> bool {
    matches!(unit, 0x09 | 0x0A | 0x0D)
}

/// Leading and trailing characters trimmed from a spec: C0 controls and space
pub fn is_c0_control_or_space(unit: u32) -> bool {
    unit <= 0x20
}

/// Scheme characters mapped to their canonical (lower-case) form, 0 if invalid
const SCHEME_CHAR_TABLE: [u8; 128] = {
    let mut table = [0u8; 128];

    let mut i = b'a';
    while i <= b'z' {
        table[i as usize] = i;
        i += 1;
    }
    let mut i = b'A';
    while i <= b'Z' {
        table[i as usize] = i + 32;
        i += 1;
    }
    let mut i = b'0';
    while i <= b'9' {
        table[i as usize] = i;
        i += 1;
    }
    table[b'+' as usize] = b'+';
    table[b'-' as usize] = b'-';
    table[b'.' as usize] = b'.';

    table
};

/// Canonical form of a scheme byte, `None` if it may not appear in a scheme
pub fn canonical_scheme_char(b: u8) -> Option<u8> {
    match SCHEME_CHAR_TABLE.get(usize::from(b)) {
        Some(&0) | None => None,
        Some(&canonical) => Some(canonical),
    }
}

/// Host characters of special URLs mapped to their canonical form, 0 if
/// forbidden. Upper-case letters are lowered; everything else passes through.
const HOST_CHAR_TABLE: [u8; 128] = {
    let mut table = [0u8; 128];

    let mut i = 0x21u8;
    while i < 0x7F {
        table[i as usize] = i;
        i += 1;
    }
    let mut i = b'A';
    while i <= b'Z' {
        table[i as usize] = i + 32;
        i += 1;
    }

    // Forbidden domain code points. C0 controls, space and DEL stay 0.
    table[b'#' as usize] = 0;
    table[b'%' as usize] = 0;
    table[b'/' as usize] = 0;
    table[b':' as usize] = 0;
    table[b'<' as usize] = 0;
    table[b'>' as usize] = 0;
    table[b'?' as usize] = 0;
    table[b'@' as usize] = 0;
    table[b'[' as usize] = 0;
    table[b'\\' as usize] = 0;
    table[b']' as usize] = 0;
    table[b'^' as usize] = 0;
    table[b'|' as usize] = 0;

    table
};

/// Canonical form of a special-URL host byte, `None` if forbidden
pub fn canonical_host_char(b: u8) -> Option<u8> {
    match HOST_CHAR_TABLE.get(usize::from(b)) {
        Some(&0) | None => None,
        Some(&canonical) => Some(canonical),
    }
}

/// Forbidden host code points of opaque (non-special) hosts
pub fn is_forbidden_opaque_host_char(b: u8) -> bool {
    b < 0x20
        || matches!(
            b,
            b' ' | b'#' | b'/' | b':' | b'<' | b'>' | b'?' | b'@' | b'[' | b'\\' | b']' | b'^' | b'|'
        )
}

/// How the path canonicalizer treats an ASCII byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathChar {
    /// Copied as is
    Pass,
    /// Needs context: `%`, `.`, `/` and `\`
    Special,
    /// Percent-escaped
    Escape,
}

const PATH_CHAR_TABLE: [PathChar; 128] = {
    let mut table = [PathChar::Pass; 128];

    let mut i = 0u8;
    while i <= 0x20 {
        table[i as usize] = PathChar::Escape;
        i += 1;
    }
    table[0x7F] = PathChar::Escape;
    table[b'"' as usize] = PathChar::Escape;
    table[b'#' as usize] = PathChar::Escape;
    table[b'<' as usize] = PathChar::Escape;
    table[b'>' as usize] = PathChar::Escape;
    table[b'?' as usize] = PathChar::Escape;
    table[b'^' as usize] = PathChar::Escape;
    table[b'`' as usize] = PathChar::Escape;
    table[b'{' as usize] = PathChar::Escape;
    table[b'|' as usize] = PathChar::Escape;
    table[b'}' as usize] = PathChar::Escape;

    table[b'%' as usize] = PathChar::Special;
    table[b'.' as usize] = PathChar::Special;
    table[b'/' as usize] = PathChar::Special;
    table[b'\\' as usize] = PathChar::Special;

    table
};

/// Classify an ASCII byte for path canonicalization (direct table lookup)
pub fn classify_path_byte(b: u8) -> PathChar {
    PATH_CHAR_TABLE
        .get(usize::from(b))
        .copied()
        .unwrap_or(PathChar::Escape)
}
