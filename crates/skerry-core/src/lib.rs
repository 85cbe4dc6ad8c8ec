#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Core import-map logic for skerry.
//!
//! Resolves module specifiers (bare names, relative paths, absolute URLs)
//! to absolute URLs through a layered remapping table with scope-based
//! overrides. The library receives plain strings and returns plain
//! strings; fetching, execution, and transport belong to the loader shell.

pub mod error;
pub mod map;
pub mod url;
pub mod version;

pub use error::Error;
pub use map::{
    resolve_and_compose, resolve_import, resolve_import_with_warnings, warning_codes, ImportMap,
    MapWarning, PackageMap, PackageTarget, RawImportMap,
};
pub use url::{directory_base_url, resolve_if_not_plain_or_url, resolve_url};
pub use version::VERSION;
