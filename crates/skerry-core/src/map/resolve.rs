//! Specifier lookup against a normalized import map.
//!
//! Scope selection and package matching both use longest-prefix matches
//! aligned on `/` boundaries, probing by repeated string slicing so no
//! allocation happens per probe.

use super::{ImportMap, MapWarning, PackageMap, PackageTarget};
use std::collections::BTreeMap;

/// Resolve a specifier (or an already-resolved URL) through the map.
///
/// `referrer` selects the applicable scope. Returns the remapped URL, the
/// input itself when it is already absolute and unmapped, or `None` when
/// there is definitively no mapping. Diagnostics are discarded; use
/// [`resolve_import_with_warnings`] to observe them.
#[must_use]
pub fn resolve_import(map: &ImportMap, specifier: &str, referrer: Option<&str>) -> Option<String> {
    let mut warnings = Vec::new();
    resolve_against_map(map, specifier, referrer, &mut warnings)
}

/// Like [`resolve_import`], also returning the diagnostics produced on the
/// way (invalid package targets encountered during matching).
#[must_use]
pub fn resolve_import_with_warnings(
    map: &ImportMap,
    specifier: &str,
    referrer: Option<&str>,
) -> (Option<String>, Vec<MapWarning>) {
    let mut warnings = Vec::new();
    let resolved = resolve_against_map(map, specifier, referrer, &mut warnings);
    (resolved, warnings)
}

pub(crate) fn resolve_against_map(
    map: &ImportMap,
    specifier: &str,
    referrer: Option<&str>,
    warnings: &mut Vec<MapWarning>,
) -> Option<String> {
    let mut scope_url = referrer.and_then(|parent| get_match(parent, &map.scopes));
    while let Some(scope) = scope_url {
        if let Some(resolution) = apply_packages(specifier, &map.scopes[scope], warnings) {
            return Some(resolution);
        }
        // walk up to the nearest enclosing scope
        scope_url = match scope.rfind('/') {
            Some(idx) => get_match(&scope[..idx], &map.scopes),
            None => None,
        };
    }
    if let Some(resolution) = apply_packages(specifier, &map.imports, warnings) {
        return Some(resolution);
    }
    if specifier.contains(':') {
        return Some(specifier.to_owned());
    }
    None
}

/// Longest key in `table` that is `path` itself or a prefix of it ending at
/// a `/` boundary, probed from the full string down through each successive
/// boundary. Matches never split a path segment.
fn get_match<'t, V>(path: &str, table: &'t BTreeMap<String, V>) -> Option<&'t str> {
    if let Some((key, _)) = table.get_key_value(path) {
        return Some(key);
    }
    let mut sep = path.len();
    while let Some(idx) = path[..sep].rfind('/') {
        if let Some((key, _)) = table.get_key_value(&path[..=idx]) {
            return Some(key);
        }
        sep = idx;
    }
    None
}

/// Apply a remapping table to an identifier.
///
/// A `Blocked` match yields `None` (explicitly unresolvable, observably the
/// same as no match). A match with a remainder whose target lacks a
/// trailing `/` is an invalid package target: a warning is recorded and the
/// mapping does not apply. Otherwise the remainder is appended to the
/// target.
fn apply_packages(
    id: &str,
    packages: &PackageMap,
    warnings: &mut Vec<MapWarning>,
) -> Option<String> {
    let pkg_name = get_match(id, packages)?;
    match &packages[pkg_name] {
        PackageTarget::Blocked => None,
        PackageTarget::Url(target) => {
            if id.len() > pkg_name.len() && !target.ends_with('/') {
                warnings.push(MapWarning::missing_trailing_slash(pkg_name, target));
                None
            } else {
                Some(format!("{target}{}", &id[pkg_name.len()..]))
            }
        }
    }
}
