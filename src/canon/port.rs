use super::append_invalid_narrow_string;
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::error::Result;
use crate::output::CanonOutput;
use crate::parser::parse_port;

/// Write `:port`, or nothing when the port is unspecified or equals
/// `default_port`.
///
/// Leading zeros are dropped. An invalid port is echoed so the URL still
/// displays.
pub fn canonicalize_port<C: CodeUnit>(
    spec: &[C],
    port: Component,
    default_port: Option<u16>,
    output: &mut CanonOutput,
    out_port: &mut Component,
) -> Result<()> {
    match parse_port(spec, port) {
        Ok(None) => {
            out_port.reset();
            Ok(())
        }
        Ok(Some(value)) if Some(value) == default_port => {
            out_port.reset();
            Ok(())
        }
        Ok(Some(value)) => {
            output.push(b':');
            let begin = output.len();
            output.append_decimal(u32::from(value));
            *out_port = Component::from_range(begin, output.len());
            Ok(())
        }
        Err(error) => {
            output.push(b':');
            let begin = output.len();
            append_invalid_narrow_string(port.slice(spec), output);
            *out_port = Component::from_range(begin, output.len());
            Err(error)
        }
    }
}
