use crate::compat::{String, Vec};

const MIN_CAPACITY: usize = 16;

/// Growable buffer that canonical URLs are written into.
///
/// Everything is ASCII except the fragment, which is written as UTF-8, so the
/// buffer is always valid UTF-8 at component boundaries. Capacity doubles on
/// growth, starting from 16 bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonOutput {
    buffer: Vec<u8>,
}

/// A fixed-width region reserved by [`CanonOutput::reserve_field`].
///
/// The token is consumed by [`CanonOutput::fill_field`], so a field can be
/// backfilled exactly once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a reserved field must be filled"]
pub struct FieldReservation {
    start: usize,
    width: usize,
}

impl CanonOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity.max(MIN_CAPACITY)),
        }
    }

    /// Write into a caller-provided string, reusing its allocation.
    pub fn with_buffer(buffer: String) -> Self {
        let mut buffer = buffer.into_bytes();
        buffer.clear();
        Self { buffer }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Byte at `index`. Indices past the end read as NUL.
    pub fn at(&self, index: usize) -> u8 {
        self.buffer.get(index).copied().unwrap_or(0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// The written text. Lossy only if a caller rewound into the middle of a
    /// multi-byte fragment character.
    pub fn as_str(&self) -> &str {
        match core::str::from_utf8(&self.buffer) {
            Ok(text) => text,
            Err(error) => {
                // Truncate the view to the valid prefix.
                let valid = error.valid_up_to();
                core::str::from_utf8(&self.buffer[..valid]).unwrap_or_default()
            }
        }
    }

    pub fn into_string(self) -> String {
        String::from_utf8(self.buffer)
            .unwrap_or_else(|error| String::from_utf8_lossy(error.as_bytes()).into_owned())
    }

    pub fn push(&mut self, byte: u8) {
        self.grow_for(1);
        self.buffer.push(byte);
    }

    pub fn push_str(&mut self, text: &str) {
        self.append(text.as_bytes());
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.grow_for(bytes.len());
        self.buffer.extend_from_slice(bytes);
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        let mut utf8 = [0u8; 4];
        self.push_str(ch.encode_utf8(&mut utf8));
    }

    /// Append the chunks produced by a percent-encoding iterator.
    pub(crate) fn extend_encoded<'a>(&mut self, chunks: impl Iterator<Item = &'a str>) {
        for chunk in chunks {
            self.push_str(chunk);
        }
    }

    /// Shrink to `length`, discarding speculative writes. Never grows.
    pub fn set_length(&mut self, length: usize) {
        debug_assert!(length <= self.buffer.len(), "set_length only shrinks");
        self.buffer.truncate(length);
    }

    /// Insert `bytes` at `position`, shifting everything after it.
    pub fn insert(&mut self, position: usize, bytes: &[u8]) {
        debug_assert!(position <= self.buffer.len());
        let position = position.min(self.buffer.len());
        self.grow_for(bytes.len());
        let tail = self.buffer.split_off(position);
        self.buffer.extend_from_slice(bytes);
        self.buffer.extend_from_slice(&tail);
    }

    /// Make sure at least `estimated` bytes fit without reallocating.
    pub fn reserve_size_if_needed(&mut self, estimated: usize) {
        if estimated > self.buffer.capacity() {
            self.buffer.reserve(estimated - self.buffer.len());
        }
    }

    /// Reserve `width` placeholder bytes to be written later.
    pub fn reserve_field(&mut self, width: usize) -> FieldReservation {
        let start = self.buffer.len();
        self.grow_for(width);
        self.buffer.resize(start + width, b'0');
        FieldReservation { start, width }
    }

    /// Overwrite a reserved field. `write` receives exactly the reserved bytes.
    ///
    /// A field that was rewound away by [`CanonOutput::set_length`] is
    /// silently dropped rather than resurrected.
    pub fn fill_field(&mut self, field: FieldReservation, write: impl FnOnce(&mut [u8])) {
        let end = field.start + field.width;
        debug_assert!(end <= self.buffer.len(), "reserved field was rewound");
        if let Some(bytes) = self.buffer.get_mut(field.start..end) {
            write(bytes);
        }
    }

    /// Append `value` in decimal, digits written right to left.
    pub(crate) fn append_decimal(&mut self, value: u32) {
        let width = decimal_width(value);
        let field = self.reserve_field(width);
        self.fill_field(field, |digits| {
            let mut value = value;
            for digit in digits.iter_mut().rev() {
                *digit = b'0' + (value % 10) as u8;
                value /= 10;
            }
        });
    }

    /// Append `value` in lower-case hex without leading zeros.
    pub(crate) fn append_hex(&mut self, value: u16) {
        let width = hex_width(value);
        let field = self.reserve_field(width);
        self.fill_field(field, |digits| {
            let mut value = value;
            for digit in digits.iter_mut().rev() {
                *digit = b"0123456789abcdef"[usize::from(value & 0xF)];
                value >>= 4;
            }
        });
    }

    fn grow_for(&mut self, additional: usize) {
        let needed = self.buffer.len() + additional;
        let capacity = self.buffer.capacity();
        if needed <= capacity {
            return;
        }
        let mut target = capacity.max(MIN_CAPACITY);
        while target < needed {
            target *= 2;
        }
        self.buffer.reserve_exact(target - self.buffer.len());
    }
}

impl core::fmt::Display for CanonOutput {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn decimal_width(mut value: u32) -> usize {
    let mut width = 1;
    while value >= 10 {
        value /= 10;
        width += 1;
    }
    width
}

fn hex_width(value: u16) -> usize {
    match value {
        0..=0xF => 1,
        0x10..=0xFF => 2,
        0x100..=0xFFF => 3,
        _ => 4,
    }
}
