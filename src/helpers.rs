use crate::character_sets::{is_ascii_tab_or_newline, is_c0_control_or_space};
use crate::code_unit::CodeUnit;
use crate::compat::{Cow, Vec};
use crate::types::CanonMode;

/// Input with tab, LF and CR removed.
#[derive(Debug, Clone)]
pub struct CleanInput<'a, C: Clone> {
    pub spec: Cow<'a, [C]>,
    /// A `<` survived whitespace removal
    pub potentially_dangling_markup: bool,
}

/// Remove every tab, LF and CR from `input`.
///
/// Returns the input untouched when there is nothing to remove, and also for
/// `data:` URLs, whose payload may legitimately carry them. When something was
/// removed and the input holds a `<`, the result is flagged as potentially
/// dangling markup.
pub fn remove_url_whitespace<C: CodeUnit>(input: &[C]) -> CleanInput<'_, C> {
    if !C::contains_tab_or_newline(input) || starts_with_data_scheme(input) {
        return CleanInput {
            spec: Cow::Borrowed(input),
            potentially_dangling_markup: false,
        };
    }

    let mut potentially_dangling_markup = false;
    let mut cleaned = Vec::with_capacity(input.len());
    for &unit in input {
        if is_ascii_tab_or_newline(unit.value()) {
            continue;
        }
        if unit.is(b'<') {
            potentially_dangling_markup = true;
        }
        cleaned.push(unit);
    }
    CleanInput {
        spec: Cow::Owned(cleaned),
        potentially_dangling_markup,
    }
}

fn starts_with_data_scheme<C: CodeUnit>(input: &[C]) -> bool {
    input.len() > 5
        && input
            .iter()
            .zip(b"data:")
            .all(|(&unit, &expected)| unit.is(expected))
}

/// Bounds of `spec` without leading C0 controls and spaces, and without
/// trailing ones when `trim_path_end` is set.
///
/// Trailing whitespace is kept for path-only URLs whose path would otherwise
/// change meaning.
pub fn trim_url<C: CodeUnit>(spec: &[C], trim_path_end: bool) -> (usize, usize) {
    let begin = spec
        .iter()
        .position(|unit| !is_c0_control_or_space(unit.value()))
        .unwrap_or(spec.len());
    let mut end = spec.len();
    if trim_path_end {
        while end > begin && is_c0_control_or_space(spec[end - 1].value()) {
            end -= 1;
        }
    }
    (begin, end)
}

/// Number of consecutive slashes starting at `begin`. Backslashes count
/// unless `mode` is [`CanonMode::NonSpecial`].
pub fn count_consecutive_slashes<C: CodeUnit>(
    spec: &[C],
    begin: usize,
    end: usize,
    mode: CanonMode,
) -> usize {
    spec.get(begin..end).map_or(0, |range| {
        range.iter().take_while(|&&unit| mode.is_slash(unit)).count()
    })
}

/// Position of the first unit in `spec[begin..end]` matching `pred`, or `end`.
pub fn find_from<C: CodeUnit>(
    spec: &[C],
    begin: usize,
    end: usize,
    pred: impl Fn(C) -> bool,
) -> usize {
    spec.get(begin..end)
        .and_then(|range| range.iter().position(|&unit| pred(unit)))
        .map_or(end, |offset| begin + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_url_whitespace() {
        let clean = remove_url_whitespace(&b"ht\ttp://a\n.com/\r"[..]);
        assert_eq!(&*clean.spec, b"http://a.com/");
        assert!(!clean.potentially_dangling_markup);

        let clean = remove_url_whitespace(&b"http://a/\n<img"[..]);
        assert_eq!(&*clean.spec, b"http://a/<img");
        assert!(clean.potentially_dangling_markup);

        // Nothing removed, so the flag stays clear.
        let clean = remove_url_whitespace(&b"http://a/<img"[..]);
        assert!(matches!(clean.spec, Cow::Borrowed(_)));
        assert!(!clean.potentially_dangling_markup);
    }

    #[test]
    fn test_remove_url_whitespace_skips_data() {
        let input = b"data:text/plain,a\nb";
        let clean = remove_url_whitespace(&input[..]);
        assert_eq!(&*clean.spec, &input[..]);
    }

    #[test]
    fn test_remove_url_whitespace_utf16() {
        let input: Vec<u16> = "a\tb".encode_utf16().collect();
        let clean = remove_url_whitespace(&input);
        assert_eq!(String::from_utf16_lossy(&clean.spec), "ab");
    }

    #[test]
    fn test_trim_url() {
        assert_eq!(trim_url(&b"  \x01http://a  "[..], true), (3, 11));
        assert_eq!(trim_url(&b"  \x01http://a  "[..], false), (3, 13));
        assert_eq!(trim_url(&b"   "[..], true), (3, 3));
    }

    #[test]
    fn test_count_consecutive_slashes() {
        let spec = b"http:\\/\\host";
        assert_eq!(count_consecutive_slashes(&spec[..], 5, spec.len(), CanonMode::Special), 3);
        assert_eq!(count_consecutive_slashes(&spec[..], 5, spec.len(), CanonMode::NonSpecial), 0);
        assert_eq!(count_consecutive_slashes(&spec[..], 6, spec.len(), CanonMode::NonSpecial), 1);
    }
}
