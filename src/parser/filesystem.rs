use super::{extract_scheme_in, parse_file_url, parse_standard_url};
use crate::checkers::is_url_slash;
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::helpers::trim_url;
use crate::parsed::Parsed;
use crate::scheme::{SchemeRegistry, compare_scheme_component};

/// Parse `filesystem:<inner URL>/<type>/<path>`.
///
/// The inner URL must be `file:` or a standard scheme. Its spans, limited to
/// the scheme, authority and `/<type>` path, land in the inner `Parsed`; the
/// rest of the path plus the query and fragment belong to the outer one. On
/// malformed input only the outer scheme is filled in.
pub fn parse_filesystem_url<C: CodeUnit>(spec: &[C], registry: &SchemeRegistry) -> Parsed {
    let (begin, end) = trim_url(spec, true);
    let mut parsed = Parsed::new();
    if begin == end {
        return parsed;
    }

    let Some(scheme) = extract_scheme_in(spec, begin, end) else {
        return parsed;
    };
    parsed.scheme = scheme;
    let inner_start = scheme.end() + 1;
    if inner_start >= end {
        return parsed;
    }

    let Some(inner_scheme) = extract_scheme_in(spec, inner_start, end) else {
        return parsed;
    };
    if inner_scheme.end() + 1 >= end {
        return parsed;
    }

    let inner_spec = &spec[inner_start..end];
    let inner_name = inner_scheme.slice(spec);
    let mut inner = if compare_scheme_component(inner_name, "file") {
        parse_file_url(inner_spec)
    } else if compare_scheme_component(inner_name, "filesystem") {
        // Filesystem URLs do not nest.
        return parsed;
    } else if registry.classify(spec, inner_scheme).is_some() {
        parse_standard_url(inner_spec)
    } else {
        return parsed;
    };
    shift_all(&mut inner, inner_start);

    // The inner path is "/<type>", the remainder belongs to the outer URL. A
    // path that ends before the second slash is all type.
    if !inner.path.is_valid() || !is_url_slash(spec[inner.path.begin]) {
        return parsed;
    }
    let type_end = (inner.path.begin + 1..inner.path.end())
        .find(|&i| is_url_slash(spec[i]))
        .unwrap_or(inner.path.end());

    parsed.path = Component::from_range(type_end, inner.path.end());
    parsed.query = inner.query;
    parsed.fragment = inner.fragment;

    inner.path = Component::from_range(inner.path.begin, type_end);
    inner.query.reset();
    inner.fragment.reset();
    parsed.set_inner_parsed(inner);
    parsed
}

fn shift_all(parsed: &mut Parsed, delta: usize) {
    for component in [
        &mut parsed.scheme,
        &mut parsed.username,
        &mut parsed.password,
        &mut parsed.host,
        &mut parsed.port,
        &mut parsed.path,
        &mut parsed.query,
        &mut parsed.fragment,
    ] {
        component.shift(delta);
    }
}
