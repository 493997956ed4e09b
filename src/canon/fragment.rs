use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::output::CanonOutput;
use crate::unicode::percent_encode::FRAGMENT_SET;
use percent_encoding::utf8_percent_encode;

/// Write `#fragment`, or nothing when the fragment is absent.
///
/// ASCII is escaped by the fragment set. Non-ASCII stays as UTF-8, which makes
/// the fragment the only component whose canonical form is not pure ASCII.
/// Malformed input is replaced by U+FFFD.
pub fn canonicalize_ref<C: CodeUnit>(
    spec: &[C],
    fragment: Component,
    output: &mut CanonOutput,
    out_fragment: &mut Component,
) {
    if !fragment.is_valid() {
        out_fragment.reset();
        return;
    }

    output.push(b'#');
    let begin = output.len();
    let lossy = C::to_str_lossy(fragment.slice(spec));
    let mut rest: &str = &lossy.text;
    while !rest.is_empty() {
        let ascii_len = rest.bytes().position(|b| !b.is_ascii()).unwrap_or(rest.len());
        let (ascii, tail) = rest.split_at(ascii_len);
        output.extend_encoded(utf8_percent_encode(ascii, FRAGMENT_SET));

        let mut chars = tail.chars();
        if let Some(ch) = chars.next() {
            output.push_char(ch);
        }
        rest = chars.as_str();
    }

    *out_fragment = Component::from_range(begin, output.len());
}
