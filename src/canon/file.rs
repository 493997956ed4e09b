use super::{
    Canonical, CharsetConverter, ComponentSource, canonicalize_host, canonicalize_path,
    canonicalize_query, canonicalize_ref,
};
use crate::checkers::{does_begin_slash_windows_drive_spec, does_begin_windows_drive_spec};
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::error::{Result, Validity};
use crate::helpers::count_consecutive_slashes;
use crate::output::CanonOutput;
use crate::parsed::Parsed;
use crate::scheme::compare_scheme_component;
use crate::types::CanonMode;

/// Canonicalize a `file:` URL.
///
/// The output always has the `file://` prefix and a present, possibly empty,
/// host. Username, password and port never survive.
pub fn canonicalize_file_url<C: CodeUnit>(
    source: &ComponentSource<'_, C>,
    parsed: &Parsed,
    converter: Option<&dyn CharsetConverter>,
    output: &mut CanonOutput,
) -> Canonical {
    let mut validity = Validity::default();
    let mut new_parsed = Parsed::new();

    new_parsed.scheme = Component::new(output.len(), 4);
    output.push_str("file://");

    // file://localhost/C:/x is file:///C:/x
    let mut host = parsed.host;
    if compare_scheme_component(host.slice(source.host), "localhost")
        && parsed.path.is_nonempty()
        && does_begin_slash_windows_drive_spec(source.path, parsed.path.begin, parsed.path.end())
    {
        host.reset();
    }

    validity.record(canonicalize_host(source.host, host, output, &mut new_parsed.host));
    validity.record(canonicalize_file_path(
        source.path,
        parsed.path,
        output,
        &mut new_parsed.path,
    ));
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

/// Canonicalize the path of a file URL.
///
/// A leading drive spec is written as `/C:` whatever its case or separator,
/// and `..` never backs up past it. An empty path becomes `/`.
pub fn canonicalize_file_path<C: CodeUnit>(
    spec: &[C],
    path: Component,
    output: &mut CanonOutput,
    out_path: &mut Component,
) -> Result<()> {
    let begin = output.len();
    let mut result = Ok(());

    if path.is_nonempty() {
        let after_drive = write_drive_spec(spec, path.begin, path.end(), output);
        if after_drive < path.end() {
            let mut sub_path = Component::ABSENT;
            result = canonicalize_path(
                spec,
                Component::from_range(after_drive, path.end()),
                CanonMode::File,
                output,
                &mut sub_path,
            );
        }
    } else {
        output.push(b'/');
    }

    *out_path = Component::from_range(begin, output.len());
    result
}

/// Write `/X:` for a drive spec after any slashes at `begin`, returning where
/// the rest of the path starts. Returns `begin` and writes nothing when there
/// is no drive.
fn write_drive_spec<C: CodeUnit>(
    spec: &[C],
    begin: usize,
    end: usize,
    output: &mut CanonOutput,
) -> usize {
    let after_slashes = begin + count_consecutive_slashes(spec, begin, end, CanonMode::File);
    if !does_begin_windows_drive_spec(spec, after_slashes, end) {
        return begin;
    }
    let Some(letter) = spec[after_slashes].ascii() else {
        return begin;
    };

    output.push(b'/');
    output.push(letter.to_ascii_uppercase());
    output.push(b':');
    after_slashes + 2
}
