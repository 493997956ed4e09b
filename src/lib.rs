//! URL parsing, canonicalization, relative resolution and component
//! replacement.
//!
//! Every operation writes a complete canonical URL into a [`CanonOutput`]
//! and describes it with a [`Parsed`] set of component spans, even when the
//! input is broken; the first error found is reported alongside.
//!
//! ```
//! use urlcanon::{CanonOutput, url_util};
//!
//! let mut output = CanonOutput::new();
//! let canonical = url_util::canonicalize("http://EXAMPLE.com/a/../b".as_bytes(), None, &mut output);
//! assert!(canonical.is_valid());
//! assert_eq!(output.as_str(), "http://example.com/b");
//! ```
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Compatibility layer for std/no_std
mod compat;

// Internal modules (not public API)
mod character_sets;
mod checkers;
mod helpers;
mod ipv4;
mod ipv6;
mod unicode;

pub mod canon;
mod canonical_url;
mod code_unit;
mod component;
mod error;
mod output;
mod parsed;
pub mod parser;
mod query_pairs;
mod replacements;
mod scheme;
mod types;
pub mod url_util;

// Public API
pub use canon::{Canonical, CharsetConverter, ComponentSource, HostInfo};
#[cfg(feature = "encoding")]
pub use canon::EncodingConverter;
pub use canonical_url::CanonicalUrl;
pub use checkers::{does_begin_unc_path, does_begin_windows_drive_spec, is_url_slash};
pub use code_unit::{CodeUnit, Decoded, Lossy};
pub use component::Component;
pub use error::{CanonError, ErrorKind};
pub use helpers::{CleanInput, remove_url_whitespace, trim_url};
pub use output::{CanonOutput, FieldReservation};
pub use parsed::Parsed;
pub use query_pairs::QueryPairs;
pub use replacements::{ComponentReplacements, Part, Replacement, Replacements};
pub use scheme::{SchemeRegistry, SchemeRegistryBuilder, SchemeWithType, default_registry};
pub use types::{CanonMode, ComponentType, HostFamily, SchemeType};

pub type Result<T> = core::result::Result<T, CanonError>;
