use super::{append_escaped_byte, append_utf8_escaped_char};
use crate::character_sets::{PathChar, classify_path_byte};
use crate::code_unit::CodeUnit;
use crate::component::Component;
use crate::error::{CanonError, Result};
use crate::output::CanonOutput;
use crate::types::CanonMode;

/// What follows a dot at the start of a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterDot {
    /// `.x`: a file name that happens to start with a dot
    NotADirectory,
    /// `.` or `./`, plus the units consumed after the dot
    DirectoryCur(usize),
    /// `..` or `../`, plus the units consumed after the first dot
    DirectoryUp(usize),
}

/// Canonicalize a hierarchical path, always starting it with `/`.
///
/// Dot segments are collapsed, `\` becomes `/` in special modes and
/// characters outside the path set are escaped. An empty path becomes `/`,
/// except for non-special URLs, where it stays absent.
pub fn canonicalize_path<C: CodeUnit>(
    spec: &[C],
    path: Component,
    mode: CanonMode,
    output: &mut CanonOutput,
    out_path: &mut Component,
) -> Result<()> {
    let begin = output.len();
    let units = path.slice(spec);

    let result = if let Some(&first) = units.first() {
        if !mode.is_slash(first) {
            output.push(b'/');
        }
        partial_path_internal(units, begin, mode, output)
    } else if mode == CanonMode::NonSpecial {
        out_path.reset();
        return Ok(());
    } else {
        output.push(b'/');
        Ok(())
    };

    *out_path = Component::from_range(begin, output.len());
    result
}

/// Canonicalize `path` and append it to output that already holds the start
/// of the path from `path_begin_in_output` on.
///
/// `..` segments never back up past `path_begin_in_output`. Used when
/// resolving a relative path onto the directory of a base path.
pub fn canonicalize_partial_path<C: CodeUnit>(
    spec: &[C],
    path: Component,
    path_begin_in_output: usize,
    mode: CanonMode,
    output: &mut CanonOutput,
) -> Result<()> {
    partial_path_internal(path.slice(spec), path_begin_in_output, mode, output)
}

pub(crate) fn partial_path_internal<C: CodeUnit>(
    units: &[C],
    path_begin_in_output: usize,
    mode: CanonMode,
    output: &mut CanonOutput,
) -> Result<()> {
    let mut result = Ok(());
    let mut i = 0;

    while i < units.len() {
        let Some(byte) = units[i].ascii() else {
            if C::WIDE {
                let decoded = C::decode_at(units, i);
                if !decoded.valid && result.is_ok() {
                    result = Err(CanonError::InvalidUnicode);
                }
                append_utf8_escaped_char(decoded.ch, output);
                i += decoded.len;
            } else {
                append_escaped_byte(units[i].value() as u8, output);
                i += 1;
            }
            continue;
        };

        match classify_path_byte(byte) {
            PathChar::Pass => output.push(byte),
            PathChar::Escape => append_escaped_byte(byte, output),
            PathChar::Special => {
                let dot_len = dot_len_at(units, i);
                if dot_len > 0 {
                    i += handle_dot(units, i, dot_len, path_begin_in_output, mode, output);
                    continue;
                }
                match byte {
                    b'\\' if mode != CanonMode::NonSpecial => output.push(b'/'),
                    // '%' stays, with or without valid hex digits after it
                    _ => output.push(byte),
                }
            }
        }
        i += 1;
    }

    result
}

/// Write or collapse the dot starting at `i`, returning the units consumed.
fn handle_dot<C: CodeUnit>(
    units: &[C],
    i: usize,
    dot_len: usize,
    path_begin_in_output: usize,
    mode: CanonMode,
    output: &mut CanonOutput,
) -> usize {
    let at_segment_start =
        output.len() > path_begin_in_output && output.as_bytes().last() == Some(&b'/');
    if !at_segment_start {
        copy_ascii(&units[i..i + dot_len], output);
        return dot_len;
    }

    match classify_after_dot(units, i + dot_len, mode) {
        AfterDot::NotADirectory => {
            copy_ascii(&units[i..i + dot_len], output);
            dot_len
        }
        AfterDot::DirectoryCur(consumed) => dot_len + consumed,
        AfterDot::DirectoryUp(consumed) => {
            back_up_to_previous_slash(path_begin_in_output, output);
            dot_len + consumed
        }
    }
}

/// Length of `.` or `%2e` at `i`, 0 for anything else.
fn dot_len_at<C: CodeUnit>(units: &[C], i: usize) -> usize {
    if units[i].is(b'.') {
        return 1;
    }
    let escaped_dot = units[i].is(b'%')
        && units.get(i + 1).is_some_and(|unit| unit.is(b'2'))
        && units
            .get(i + 2)
            .is_some_and(|unit| unit.is(b'e') || unit.is(b'E'));
    if escaped_dot { 3 } else { 0 }
}

fn classify_after_dot<C: CodeUnit>(units: &[C], after_dot: usize, mode: CanonMode) -> AfterDot {
    let Some(&next) = units.get(after_dot) else {
        return AfterDot::DirectoryCur(0);
    };
    if mode.is_slash(next) {
        return AfterDot::DirectoryCur(1);
    }

    let second_dot_len = dot_len_at(units, after_dot);
    if second_dot_len > 0 {
        let after_second = after_dot + second_dot_len;
        match units.get(after_second) {
            None => return AfterDot::DirectoryUp(second_dot_len),
            Some(&unit) if mode.is_slash(unit) => {
                return AfterDot::DirectoryUp(second_dot_len + 1);
            }
            Some(_) => {}
        }
    }
    AfterDot::NotADirectory
}

/// Drop the last segment of the output, which ends with `/`. At the root
/// there is nothing to drop.
fn back_up_to_previous_slash(path_begin_in_output: usize, output: &mut CanonOutput) {
    let bytes = output.as_bytes();
    let Some(last_slash) = bytes.len().checked_sub(1) else {
        return;
    };
    if last_slash <= path_begin_in_output {
        return;
    }

    let previous = bytes[path_begin_in_output..last_slash]
        .iter()
        .rposition(|&b| b == b'/')
        .map_or(path_begin_in_output, |pos| path_begin_in_output + pos);
    output.set_length(previous + 1);
}

fn copy_ascii<C: CodeUnit>(units: &[C], output: &mut CanonOutput) {
    for unit in units {
        if let Some(byte) = unit.ascii() {
            output.push(byte);
        }
    }
}
