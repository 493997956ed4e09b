use crate::compat::{Cow, String};

/// One scalar value decoded from an input spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// The decoded character, U+FFFD for malformed input
    pub ch: char,
    /// Code units consumed, at least one
    pub len: usize,
    /// False when `ch` is a replacement for malformed input
    pub valid: bool,
}

impl Decoded {
    const fn replacement(len: usize) -> Self {
        Self {
            ch: char::REPLACEMENT_CHARACTER,
            len,
            valid: false,
        }
    }
}

/// A text decoded lossily, with a flag telling whether anything was replaced.
#[derive(Debug, Clone)]
pub struct Lossy<'a> {
    pub text: Cow<'a, str>,
    pub valid: bool,
}

/// An input code unit: `u8` for UTF-8 specs, `u16` for UTF-16 specs.
///
/// Parsing and canonicalization are written once against this trait. ASCII
/// decisions look at single units; everything non-ASCII goes through
/// [`CodeUnit::decode_at`].
pub trait CodeUnit: Copy + Eq + Into<u32> + core::fmt::Debug + 'static {
    /// True when one character may span several units that must be decoded
    /// before escaping. Narrow input escapes its raw bytes instead.
    const WIDE: bool;

    /// Decode the scalar value starting at `pos`.
    fn decode_at(input: &[Self], pos: usize) -> Decoded;

    /// The input as UTF-8 bytes. Narrow input is borrowed untouched, even when
    /// it is not valid UTF-8.
    fn narrow(input: &[Self]) -> Cow<'_, [u8]>;

    /// The input as a string, malformed sequences replaced by U+FFFD.
    fn to_str_lossy(input: &[Self]) -> Lossy<'_>;

    /// The code unit as a number.
    fn value(self) -> u32 {
        self.into()
    }

    fn ascii(self) -> Option<u8> {
        let value = self.value();
        if value < 0x80 { Some(value as u8) } else { None }
    }

    fn is(self, byte: u8) -> bool {
        self.value() == u32::from(byte)
    }

    fn is_ascii(self) -> bool {
        self.value() < 0x80
    }

    /// True when `input` holds a tab, LF or CR.
    fn contains_tab_or_newline(input: &[Self]) -> bool {
        input.iter().any(|&unit| matches!(unit.value(), 0x09 | 0x0A | 0x0D))
    }
}

impl CodeUnit for u8 {
    const WIDE: bool = false;

    fn decode_at(input: &[u8], pos: usize) -> Decoded {
        let rest = input.get(pos..).unwrap_or(&[]);
        let Some(chunk) = rest.utf8_chunks().next() else {
            return Decoded::replacement(1);
        };
        match chunk.valid().chars().next() {
            Some(ch) => Decoded {
                ch,
                len: ch.len_utf8(),
                valid: true,
            },
            None => Decoded::replacement(chunk.invalid().len().max(1)),
        }
    }

    fn narrow(input: &[u8]) -> Cow<'_, [u8]> {
        Cow::Borrowed(input)
    }

    fn contains_tab_or_newline(input: &[u8]) -> bool {
        memchr::memchr3(b'\t', b'\n', b'\r', input).is_some()
    }

    fn to_str_lossy(input: &[u8]) -> Lossy<'_> {
        let text = String::from_utf8_lossy(input);
        let valid = matches!(text, Cow::Borrowed(_));
        Lossy { text, valid }
    }
}

impl CodeUnit for u16 {
    const WIDE: bool = true;

    fn decode_at(input: &[u16], pos: usize) -> Decoded {
        let rest = input.get(pos..).unwrap_or(&[]);
        match char::decode_utf16(rest.iter().copied()).next() {
            Some(Ok(ch)) => Decoded {
                ch,
                len: ch.len_utf16(),
                valid: true,
            },
            _ => Decoded::replacement(1),
        }
    }

    fn narrow(input: &[u16]) -> Cow<'_, [u8]> {
        Cow::Owned(String::from_utf16_lossy(input).into_bytes())
    }

    fn to_str_lossy(input: &[u16]) -> Lossy<'_> {
        let mut valid = true;
        let text: String = char::decode_utf16(input.iter().copied())
            .map(|unit| {
                unit.unwrap_or_else(|_| {
                    valid = false;
                    char::REPLACEMENT_CHARACTER
                })
            })
            .collect();
        Lossy {
            text: Cow::Owned(text),
            valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::Vec;

    fn utf16(text: &str) -> Vec<u16> {
        text.encode_utf16().collect()
    }

    #[test]
    fn test_decode_utf8() {
        let input = "aé€😀".as_bytes();
        let first = u8::decode_at(input, 0);
        assert_eq!((first.ch, first.len, first.valid), ('a', 1, true));
        let second = u8::decode_at(input, 1);
        assert_eq!((second.ch, second.len), ('é', 2));
        let fourth = u8::decode_at(input, 6);
        assert_eq!((fourth.ch, fourth.len), ('😀', 4));
    }

    #[test]
    fn test_decode_malformed_utf8() {
        let decoded = u8::decode_at(&[0xE2, 0x82, b'a'], 0);
        assert_eq!(decoded.ch, char::REPLACEMENT_CHARACTER);
        assert!(!decoded.valid);
        assert_eq!(decoded.len, 2);

        let lone = u8::decode_at(&[0xFF], 0);
        assert_eq!(lone.len, 1);
    }

    #[test]
    fn test_decode_utf16() {
        let input = utf16("a😀");
        let pair = u16::decode_at(&input, 1);
        assert_eq!((pair.ch, pair.len, pair.valid), ('😀', 2, true));

        let unpaired = u16::decode_at(&[0xD800, u16::from(b'a')], 0);
        assert!(!unpaired.valid);
        assert_eq!(unpaired.len, 1);
    }

    #[test]
    fn test_lossy_conversion() {
        let valid = u8::to_str_lossy(b"host");
        assert!(valid.valid);
        assert_eq!(valid.text, "host");

        let invalid = u8::to_str_lossy(&[b'a', 0xFF]);
        assert!(!invalid.valid);
        assert_eq!(invalid.text, "a\u{FFFD}");

        let lone_surrogate = [0xDC00, u16::from(b'b')];
        let wide = u16::to_str_lossy(&lone_surrogate);
        assert!(!wide.valid);
        assert_eq!(wide.text, "\u{FFFD}b");
    }

    #[test]
    fn test_narrow() {
        assert_eq!(&*u8::narrow(&[0xFF, b'a']), &[0xFF, b'a']);
        assert_eq!(&*u16::narrow(&utf16("é")), "é".as_bytes());
    }

    #[test]
    fn test_ascii_helpers() {
        assert_eq!(b'A'.ascii(), Some(b'A'));
        assert_eq!(0xE9u16.ascii(), None);
        assert!(u16::from(b':').is(b':'));
        assert!(!0x80u8.is_ascii());
    }
}
