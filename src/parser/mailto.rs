use super::trim_and_extract_scheme;
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::parsed::Parsed;

/// Parse `mailto:<addresses>?<headers>`. There is no authority and no
/// fragment; a `#` is part of the path or query.
pub fn parse_mailto_url<C: CodeUnit>(spec: &[C]) -> Parsed {
    let (begin, end, scheme) = trim_and_extract_scheme(spec, true);
    let mut parsed = Parsed::new();
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
    if path_begin >= end {
        return parsed;
    }

    let mut path_end = end;
    if let Some(question) = spec[path_begin..end].iter().position(|unit| unit.is(b'?')) {
        path_end = path_begin + question;
        parsed.query = Component::from_range(path_end + 1, end);
    }

    // No path is absent rather than empty, as for standard URLs
    if path_begin != path_end {
        parsed.path = Component::from_range(path_begin, path_end);
    }
    parsed
}
