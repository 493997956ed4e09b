use core::ops::Range;

/// A `(begin, len)` span into one specific buffer.
///
/// The buffer is either the input spec or a canonical output, never a mix of
/// the two. A negative `len` means the component is absent, which is
/// different from present-but-empty (`len == 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Component {
    pub begin: usize,
    pub len: isize,
}

impl Default for Component {
    fn default() -> Self {
        Self::ABSENT
    }
}

impl Component {
    pub const ABSENT: Self = Self { begin: 0, len: -1 };

    pub const fn new(begin: usize, len: usize) -> Self {
        Self {
            begin,
            len: len as isize,
        }
    }

    /// Span covering `begin..end`; an inverted range yields an empty span.
    pub const fn from_range(begin: usize, end: usize) -> Self {
        Self::new(begin, end.saturating_sub(begin))
    }

    pub const fn is_valid(self) -> bool {
        self.len >= 0
    }

    pub const fn is_nonempty(self) -> bool {
        self.len > 0
    }

    /// True for absent and for zero-length components.
    pub const fn is_empty(self) -> bool {
        self.len <= 0
    }

    /// Length in code units, zero when absent.
    pub const fn len(self) -> usize {
        if self.len < 0 { 0 } else { self.len as usize }
    }

    pub const fn end(self) -> usize {
        self.begin + self.len()
    }

    pub const fn range(self) -> Range<usize> {
        self.begin..self.end()
    }

    pub fn reset(&mut self) {
        *self = Self::ABSENT;
    }

    /// The code units this span covers in `buffer`, empty when absent.
    pub fn slice<T>(self, buffer: &[T]) -> &[T] {
        debug_assert!(
            !self.is_valid() || self.end() <= buffer.len(),
            "component {self:?} outside buffer of {}",
            buffer.len()
        );
        if self.is_valid() {
            buffer.get(self.range()).unwrap_or(&[])
        } else {
            &[]
        }
    }

    /// The text this span covers in `text`, `None` when absent.
    pub fn as_str_on(self, text: &str) -> Option<&str> {
        if self.is_valid() {
            text.get(self.range())
        } else {
            None
        }
    }

    pub(crate) fn shift(&mut self, delta: usize) {
        if self.is_valid() {
            self.begin += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_vs_empty() {
        let absent = Component::default();
        assert!(!absent.is_valid());
        assert!(absent.is_empty());
        assert_eq!(absent.len(), 0);

        let empty = Component::new(4, 0);
        assert!(empty.is_valid());
        assert!(empty.is_empty());
        assert!(!empty.is_nonempty());
        assert_eq!(empty.end(), 4);
    }

    #[test]
    fn test_from_range() {
        let comp = Component::from_range(2, 6);
        assert_eq!(comp, Component::new(2, 4));
        assert_eq!(comp.range(), 2..6);
        assert_eq!(Component::from_range(6, 2).len(), 0);
    }

    #[test]
    fn test_slice_and_str() {
        let text = "http://host/";
        let host = Component::new(7, 4);
        assert_eq!(host.slice(text.as_bytes()), b"host");
        assert_eq!(host.as_str_on(text), Some("host"));
        assert_eq!(Component::ABSENT.as_str_on(text), None);
    }

    #[test]
    fn test_shift_ignores_absent() {
        let mut absent = Component::ABSENT;
        absent.shift(3);
        assert_eq!(absent, Component::ABSENT);

        let mut comp = Component::new(1, 2);
        comp.shift(3);
        assert_eq!(comp, Component::new(4, 2));
    }
}
