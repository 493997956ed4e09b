use super::append_string_of_type;
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::error::{Result, Validity};
use crate::output::CanonOutput;
use crate::unicode::percent_encode::USERINFO_SET;

/// Write `username[:password]@`.
///
/// Nothing is written when both are empty. A present password keeps its
/// colon, even when empty, as long as there is a username.
pub fn canonicalize_user_info<C: CodeUnit>(
    username_source: &[C],
    username: Component,
    password_source: &[C],
    password: Component,
    output: &mut CanonOutput,
    out_username: &mut Component,
    out_password: &mut Component,
) -> Result<()> {
    if username.is_empty() && password.is_empty() {
        out_username.reset();
        out_password.reset();
        return Ok(());
    }

    let mut validity = Validity::default();

    let begin = output.len();
    validity.record(append_string_of_type(
        username.slice(username_source),
        USERINFO_SET,
        output,
    ));
    *out_username = Component::from_range(begin, output.len());

    if password.is_nonempty() || (password.is_valid() && username.is_nonempty()) {
        output.push(b':');
        let begin = output.len();
        validity.record(append_string_of_type(
            password.slice(password_source),
            USERINFO_SET,
            output,
        ));
        *out_password = Component::from_range(begin, output.len());
    } else {
        out_password.reset();
    }

    output.push(b'@');
    validity.error().map_or(Ok(()), Err)
}
