use super::{
    Canonical, CharsetConverter, ComponentSource, canonicalize_non_special_host, canonicalize_path,
    canonicalize_port, canonicalize_query, canonicalize_ref, canonicalize_scheme,
    canonicalize_user_info,
};
use crate::code_unit::CodeUnit;
use crate::error::{CanonError, Validity};
use crate::output::CanonOutput;
use crate::parsed::Parsed;
use crate::types::CanonMode;

/// Canonicalize a hierarchical URL of an unregistered scheme.
///
/// The host is opaque and may be empty, and an empty authority is kept
/// (`git:///x`). Without an authority, a path starting with `//` gets a `/.`
/// prefix so the output does not re-parse with a host.
pub fn canonicalize_non_special_url<C: CodeUnit>(
    source: &ComponentSource<'_, C>,
    parsed: &Parsed,
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    let mut validity = Validity::default();
    let mut new_parsed = Parsed::new();

    validity.record(canonicalize_scheme(
        source.scheme,
        parsed.scheme,
        output,
        &mut new_parsed.scheme,
    ));

    let have_authority = parsed.has_authority_components();
    if have_authority {
        output.push_str("//");
        validity.record(canonicalize_user_info(
            source.username,
            parsed.username,
            source.password,
            parsed.password,
            output,
            &mut new_parsed.username,
            &mut new_parsed.password,
        ));
        if parsed.host.is_valid() {
            validity.record(canonicalize_non_special_host(
                source.host,
                parsed.host,
                output,
                &mut new_parsed.host,
            ));
        } else {
            validity.fail(CanonError::MissingHost);
        }
        if new_parsed.host.is_empty()
            && (new_parsed.username.is_valid() || parsed.port.is_valid())
        {
            validity.fail(CanonError::MissingHost);
        }
        validity.record(canonicalize_port(
            source.port,
            parsed.port,
            None,
            output,
            &mut new_parsed.port,
        ));
    }

    if parsed.path.is_valid() {
        validity.record(canonicalize_path(
            source.path,
            parsed.path,
            CanonMode::NonSpecial,
            output,
            &mut new_parsed.path,
        ));
        if !have_authority
            && new_parsed.path.len() >= 2
            && output.at(new_parsed.path.begin) == b'/'
            && output.at(new_parsed.path.begin + 1) == b'/'
        {
            output.insert(new_parsed.path.begin, b"/.");
            new_parsed.path.len += 2;
        }
    }

    canonicalize_query(
        source.query,
        parsed.query,
        converter,
        false,
        output,
        &mut new_parsed.query,
    );
    canonicalize_ref(source.fragment, parsed.fragment, output, &mut new_parsed.fragment);

    new_parsed.potentially_dangling_markup = parsed.potentially_dangling_markup;
    Canonical {
        parsed: new_parsed,
        error: validity.error(),
    }
}
