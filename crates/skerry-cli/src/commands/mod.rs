pub mod compose;
pub mod resolve;
pub mod version;

use miette::{IntoDiagnostic, Result};
use skerry_core::{resolve_and_compose, ImportMap, RawImportMap};
use std::path::PathBuf;

/// Compose the given documents, in encounter order, against `base_url`.
///
/// Composition warnings are logged with their stable codes; they never
/// abort the load.
fn compose_files(maps: &[PathBuf], base_url: &str) -> Result<ImportMap> {
    let mut composed = ImportMap::default();
    for path in maps {
        let raw = RawImportMap::from_file(path).into_diagnostic()?;
        for warning in resolve_and_compose(&raw, base_url, &mut composed) {
            tracing::warn!(
                code = warning.code,
                key = %warning.key,
                target = %warning.target,
                "{}",
                warning.message
            );
        }
        tracing::debug!(path = %path.display(), "composed import map");
    }
    Ok(composed)
}
