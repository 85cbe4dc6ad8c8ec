//! Import map model, composition, and specifier lookup.
//!
//! To make lookups fast the entire map is pre-resolved at composition time
//! and matched with backtracked prefix lookups afterwards. Maps are built
//! by successive [`resolve_and_compose`] calls and are read-only from the
//! resolver's point of view.

mod compose;
mod resolve;

pub use compose::resolve_and_compose;
pub use resolve::{resolve_import, resolve_import_with_warnings};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Right-hand side of a remapping entry.
///
/// Absence from the table means "not covered"; `Blocked` is the explicit
/// `null` sentinel that makes a specifier unresolvable on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PackageTarget {
    /// Remap to this pre-resolved URL.
    Url(String),
    /// Explicitly blocked (`null` in the document).
    Blocked,
}

impl PackageTarget {
    /// The target URL, unless blocked.
    #[must_use]
    pub fn as_url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Blocked => None,
        }
    }
}

/// Remapping table: specifier prefix to target.
pub type PackageMap = BTreeMap<String, PackageTarget>;

/// Fully normalized import map state.
///
/// Every key and value in `imports` and `scopes` has already been resolved
/// against the declaring document's base URL; lookups match verbatim and
/// never re-resolve. `depcache` and `integrity` are passive metadata for
/// the loader, stored normalized but never acted on here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportMap {
    /// Top-level remapping table (global fallback).
    pub imports: PackageMap,
    /// Scope URL to remapping table, for per-subtree overrides.
    pub scopes: BTreeMap<String, PackageMap>,
    /// Module URL to ordered dependency specifiers to preload.
    pub depcache: BTreeMap<String, Vec<String>>,
    /// Module URL to integrity hash.
    pub integrity: BTreeMap<String, String>,
}

/// Raw import-map document as written, before any normalization.
///
/// All sections are optional and unknown top-level keys are ignored.
/// Remapping targets stay raw JSON values until composition so the `null`
/// sentinel and unsupported fallback arrays can be told apart.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImportMap {
    #[serde(default)]
    pub imports: serde_json::Map<String, Value>,
    #[serde(default)]
    pub scopes: BTreeMap<String, serde_json::Map<String, Value>>,
    #[serde(default)]
    pub depcache: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub integrity: BTreeMap<String, String>,
}

impl RawImportMap {
    /// Parse a document from JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| Error::MapParse { source })
    }

    /// Read and parse a document file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::MapRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }
}

/// Stable warning codes for composition and resolution diagnostics.
pub mod warning_codes {
    /// A mapping target did not resolve through the accumulated map.
    pub const UNRESOLVED_TARGET: &str = "unresolved_target";
    /// A package match left a remainder but the target has no trailing `/`.
    pub const MISSING_TRAILING_SLASH: &str = "missing_trailing_slash";
}

/// Non-fatal diagnostic generated during composition or resolution.
///
/// Warnings never abort processing of unrelated entries; one malformed
/// mapping must not break an entire module graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapWarning {
    /// Stable code (see [`warning_codes`]).
    pub code: &'static str,
    /// The remapping key the warning is about.
    pub key: String,
    /// The target that could not be applied.
    pub target: String,
    /// Human-readable description.
    pub message: String,
}

impl MapWarning {
    pub(crate) fn unresolved_target(key: &str, target: &str) -> Self {
        Self {
            code: warning_codes::UNRESOLVED_TARGET,
            key: key.to_owned(),
            target: target.to_owned(),
            message: format!("target '{target}' for '{key}' did not resolve, mapping dropped"),
        }
    }

    pub(crate) fn missing_trailing_slash(key: &str, target: &str) -> Self {
        Self {
            code: warning_codes::MISSING_TRAILING_SLASH,
            key: key.to_owned(),
            target: target.to_owned(),
            message: format!("package target '{target}' for '{key}' should have a trailing '/'"),
        }
    }
}
