use super::{
    Canonical, CharsetConverter, ComponentSource, canonicalize_host, canonicalize_path,
    canonicalize_port, canonicalize_query, canonicalize_ref, canonicalize_scheme,
    canonicalize_user_info,
};
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::error::{CanonError, Validity};
use crate::output::CanonOutput;
use crate::parsed::Parsed;
use crate::scheme::default_port_for_scheme;
use crate::types::{CanonMode, SchemeType};

/// Canonicalize a URL of a registered standard scheme.
///
/// `scheme_type` decides which authority parts survive: userinfo and port are
/// dropped when the type does not carry them. A host is required whenever
/// there is an authority, and an authority whenever the type has one.
pub fn canonicalize_standard_url<C: CodeUnit>(
    source: &ComponentSource<'_, C>,
    parsed: &Parsed,
    scheme_type: SchemeType,
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

    let (username, password) = if scheme_type.has_userinfo() {
        (parsed.username, parsed.password)
    } else {
        (Component::ABSENT, Component::ABSENT)
    };
    let port = if scheme_type.has_port() {
        parsed.port
    } else {
        Component::ABSENT
    };

    let have_authority = scheme_type.has_authority()
        && (username.is_valid()
            || password.is_valid()
            || parsed.host.is_nonempty()
            || port.is_valid());

    if have_authority {
        if parsed.scheme.is_valid() {
            output.push_str("//");
        }
        validity.record(canonicalize_user_info(
            source.username,
            username,
            source.password,
            password,
            output,
            &mut new_parsed.username,
            &mut new_parsed.password,
        ));
        validity.record(canonicalize_host(
            source.host,
            parsed.host,
            output,
            &mut new_parsed.host,
        ));
        if !new_parsed.host.is_nonempty() {
            validity.fail(CanonError::MissingHost);
        }
        let default_port = new_parsed
            .scheme
            .as_str_on(output.as_str())
            .and_then(default_port_for_scheme);
        validity.record(canonicalize_port(
            source.port,
            port,
            default_port,
            output,
            &mut new_parsed.port,
        ));
    } else if scheme_type.has_authority() {
        validity.fail(CanonError::MissingAuthority);
    }

    if parsed.path.is_valid() {
        validity.record(canonicalize_path(
            source.path,
            parsed.path,
            CanonMode::Special,
            output,
            &mut new_parsed.path,
        ));
    } else if have_authority || parsed.query.is_valid() || parsed.fragment.is_valid() {
        new_parsed.path = Component::new(output.len(), 1);
        output.push(b'/');
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
    Canonical {
        parsed: new_parsed,
        error: validity.error(),
    }
}
