//! `skerry compose` command implementation.

use super::compose_files;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use skerry_core::version::SCHEMA_VERSION;
use skerry_core::ImportMap;
use std::path::PathBuf;

/// Stable JSON output for `skerry compose`.
#[derive(Debug, Serialize)]
struct ComposeOutput {
    schema_version: u32,
    #[serde(flatten)]
    map: ImportMap,
}

/// Run the compose command.
///
/// Composes the given documents in order and prints the normalized map,
/// with every key and value pre-resolved against the base URL.
pub fn run(maps: &[PathBuf], base_url: &str, json: bool) -> Result<()> {
    let map = compose_files(maps, base_url)?;

    if json {
        let output = ComposeOutput {
            schema_version: SCHEMA_VERSION,
            map,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).into_diagnostic()?
        );
    } else {
        println!("{}", serde_json::to_string_pretty(&map).into_diagnostic()?);
    }
    Ok(())
}
