use super::{apply_path, trim_and_extract_scheme};
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::parsed::Parsed;

/// Parse an opaque-path URL such as `javascript:x` or `data:,x`: everything
/// after the scheme is path, query and fragment.
///
/// With `trim_path_end` unset, trailing spaces stay part of the path.
pub fn parse_path_url<C: CodeUnit>(spec: &[C], trim_path_end: bool) -> Parsed {
    let (begin, end, scheme) = trim_and_extract_scheme(spec, trim_path_end);
    let mut parsed = Parsed::new();
    parsed.has_opaque_path = true;
    if begin == end {
        return parsed;
    }

    let path_begin = match scheme {
        Some(scheme) => {
            parsed.scheme = scheme;
            scheme.end() + 1
        }
        None => begin,
    };
    if path_begin == end {
        return parsed;
    }
    apply_path(spec, Component::from_range(path_begin, end), &mut parsed);
    parsed
}
