use super::{
    Canonical, CharsetConverter, ComponentSource, canonicalize_path, canonicalize_query,
    canonicalize_ref, canonicalize_standard_url,
};
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::error::{CanonError, Validity};
use crate::output::CanonOutput;
use crate::parsed::Parsed;
use crate::scheme::{SchemeRegistry, compare_scheme_component};
use crate::types::{CanonMode, SchemeType};

/// Canonicalize `filesystem:<inner URL>/<type>/<path>`.
///
/// The spans of the inner URL are read from `source.scheme`, the buffer the
/// outer scheme came from. The inner URL loses its userinfo. The canonical
/// inner spans are attached to the result only when everything succeeded.
pub fn canonicalize_filesystem_url<C: CodeUnit>(
    source: &ComponentSource<'_, C>,
    parsed: &Parsed,
    registry: &SchemeRegistry,
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    let mut validity = Validity::default();
    let mut new_parsed = Parsed::new();

    new_parsed.scheme = Component::new(output.len(), 10);
    output.push_str("filesystem:");

    let Some(inner) = parsed.inner_parsed().filter(|inner| inner.scheme.is_valid()) else {
        return Canonical {
            parsed: new_parsed,
            error: Some(CanonError::InvalidFilesystemUrl),
        };
    };

    let inner_spec = source.scheme;
    let inner_source = ComponentSource::new(inner_spec);
    let mut new_inner = Parsed::new();
    if compare_scheme_component(inner.scheme.slice(inner_spec), "file") {
        new_inner.scheme = Component::new(output.len(), 4);
        output.push_str("file://");
        validity.record(canonicalize_path(
            inner_spec,
            inner.path,
            CanonMode::File,
            output,
            &mut new_inner.path,
        ));
    } else if let Some(inner_type) = registry.classify(inner_spec, inner.scheme) {
        let inner_type = match inner_type {
            SchemeType::WithHostPortAndUserInfo => SchemeType::WithHostAndPort,
            other => other,
        };
        let canonical =
            canonicalize_standard_url(&inner_source, inner, inner_type, converter, output);
        if let Some(error) = canonical.error {
            validity.fail(error);
        }
        new_inner = canonical.parsed;
    } else {
        return Canonical {
            parsed: new_parsed,
            error: Some(CanonError::InvalidFilesystemUrl),
        };
    }

    // The type segment is more than its leading slash. Without one, an
    // empty path stays empty so the echo matches the input.
    let has_type = new_inner.path.len() > 1;
    if !has_type {
        validity.fail(CanonError::InvalidFilesystemUrl);
    }

    if has_type || parsed.path.is_nonempty() {
        validity.record(canonicalize_path(
            source.path,
            parsed.path,
            CanonMode::Special,
            output,
            &mut new_parsed.path,
        ));
    }
    canonicalize_query(
        source.query,
        parsed.query,
        converter,
        true,
        output,
        &mut new_parsed.query,
    );
    canonicalize_ref(source.fragment, parsed.fragment, output, &mut new_parsed.fragment);

    new_parsed.potentially_dangling_markup = parsed.potentially_dangling_markup;
    let error = validity.error();
    if error.is_none() {
        new_parsed.set_inner_parsed(new_inner);
    }
    Canonical {
        parsed: new_parsed,
        error,
    }
}
