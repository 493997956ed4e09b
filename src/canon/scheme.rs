use super::append_utf8_escaped_char;
use crate::character_sets::canonical_scheme_char;
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::error::{CanonError, Result};
use crate::output::CanonOutput;

/// Write the lower-cased scheme followed by `:`.
///
/// Every input character produces output, so the written scheme always lines
/// up with the input one: invalid characters are escaped and `%` is kept as
/// is, which keeps repeated canonicalization stable. An empty scheme writes
/// only the colon.
pub fn canonicalize_scheme<C: CodeUnit>(
    spec: &[C],
    scheme: Component,
    output: &mut CanonOutput,
    out_scheme: &mut Component,
) -> Result<()> {
    if scheme.is_empty() {
        *out_scheme = Component::new(output.len(), 0);
        output.push(b':');
        return Err(CanonError::InvalidScheme);
    }

    let begin = output.len();
    let units = scheme.slice(spec);
    let mut result = Ok(());
    let mut i = 0;
    while i < units.len() {
        let canonical = units[i]
            .ascii()
            .filter(|b| i > 0 || b.is_ascii_alphabetic())
            .and_then(canonical_scheme_char);
        match canonical {
            Some(b) => output.push(b),
            None if units[i].is(b'%') => {
                result = Err(CanonError::InvalidScheme);
                output.push(b'%');
            }
            None => {
                result = Err(CanonError::InvalidScheme);
                let decoded = C::decode_at(units, i);
                append_utf8_escaped_char(decoded.ch, output);
                i += decoded.len;
                continue;
            }
        }
        i += 1;
    }

    *out_scheme = Component::from_range(begin, output.len());
    output.push(b':');
    result
}
