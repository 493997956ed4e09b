use super::CharsetConverter;
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::output::CanonOutput;
use crate::unicode::percent_encode::{QUERY_SET, SPECIAL_QUERY_SET};
use percent_encoding::{percent_encode, utf8_percent_encode};

/// Write `?query`, or nothing when the query is absent.
///
/// The text is converted by `converter` when one is given, UTF-8 otherwise,
/// then escaped. Special URLs escape `'` as well. Malformed input is replaced
/// by U+FFFD; a query never fails.
pub fn canonicalize_query<C: CodeUnit>(
    spec: &[C],
    query: Component,
    converter: Option<&dyn CharsetConverter>,
    special: bool,
    output: &mut CanonOutput,
    out_query: &mut Component,
) {
    if !query.is_valid() {
        out_query.reset();
        return;
    }

    output.push(b'?');
    let begin = output.len();
    let set = if special { SPECIAL_QUERY_SET } else { QUERY_SET };
    let units = query.slice(spec);

    if units.iter().all(|unit| unit.is_ascii()) {
        let narrowed = C::narrow(units);
        output.extend_encoded(percent_encode(&narrowed, set));
    } else {
        let lossy = C::to_str_lossy(units);
        if let Some(converter) = converter {
            let mut converted = CanonOutput::with_capacity(lossy.text.len());
            converter.convert(&lossy.text, &mut converted);
            output.extend_encoded(percent_encode(converted.as_bytes(), set));
        } else {
            output.extend_encoded(utf8_percent_encode(&lossy.text, set));
        }
    }

    *out_query = Component::from_range(begin, output.len());
}
