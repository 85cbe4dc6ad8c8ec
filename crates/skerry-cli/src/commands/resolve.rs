//! `skerry resolve` command implementation.

use super::compose_files;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use skerry_core::version::SCHEMA_VERSION;
use skerry_core::{resolve_import_with_warnings, MapWarning};
use std::path::PathBuf;

/// Exit code when the specifier has no mapping.
const EXIT_UNRESOLVED: i32 = 1;

/// Stable JSON output for `skerry resolve`.
#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    schema_version: u32,
    specifier: &'a str,
    parent: Option<&'a str>,
    resolved: Option<&'a str>,
    status: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<MapWarning>,
}

/// Run the resolve command.
///
/// Composes the given documents, resolves one specifier, and prints the
/// result. Exits with a nonzero code when there is no mapping.
pub fn run(
    maps: &[PathBuf],
    base_url: &str,
    specifier: &str,
    parent: Option<&str>,
    json: bool,
) -> Result<()> {
    let map = compose_files(maps, base_url)?;
    let (resolved, warnings) = resolve_import_with_warnings(&map, specifier, parent);

    for warning in &warnings {
        tracing::warn!(
            code = warning.code,
            key = %warning.key,
            target = %warning.target,
            "{}",
            warning.message
        );
    }

    if json {
        let output = ResolveOutput {
            schema_version: SCHEMA_VERSION,
            specifier,
            parent,
            resolved: resolved.as_deref(),
            status: if resolved.is_some() {
                "resolved"
            } else {
                "unresolved"
            },
            warnings,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).into_diagnostic()?
        );
    } else if let Some(url) = &resolved {
        println!("{url}");
    } else {
        eprintln!("error: no mapping for '{specifier}'");
    }

    if resolved.is_none() {
        std::process::exit(EXIT_UNRESOLVED);
    }
    Ok(())
}
