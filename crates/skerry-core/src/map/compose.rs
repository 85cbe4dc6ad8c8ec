//! Import-map composition.
//!
//! Every key and value of a raw document is resolved against the document's
//! declaration base URL and merged into the accumulated map. Targets are
//! additionally re-resolved through the map composed so far, so a later
//! document's remappings are rewritten by previously loaded ones.

use super::resolve::resolve_against_map;
use super::{ImportMap, MapWarning, PackageTarget, RawImportMap};
use crate::url::{resolve_if_not_plain_or_url, resolve_url};
use serde_json::Value;

/// Merge one raw document, declared at `base_url`, into `out`.
///
/// Returns the non-fatal diagnostics produced on the way; a dropped entry
/// never stops composition of the rest of the document. Callers must not
/// compose into the same map concurrently.
pub fn resolve_and_compose(
    raw: &RawImportMap,
    base_url: &str,
    out: &mut ImportMap,
) -> Vec<MapWarning> {
    let mut warnings = Vec::new();

    compose_packages(&raw.imports, base_url, out, None, &mut warnings);

    for (scope_key, packages) in &raw.scopes {
        let resolved_scope = resolve_url(scope_key, base_url);
        out.scopes.entry(resolved_scope.clone()).or_default();
        compose_packages(packages, base_url, out, Some(&resolved_scope), &mut warnings);
    }

    for (url, deps) in &raw.depcache {
        out.depcache.insert(resolve_url(url, base_url), deps.clone());
    }

    for (url, hash) in &raw.integrity {
        out.integrity.insert(resolve_url(url, base_url), hash.clone());
    }

    warnings
}

/// Compose one remapping table into `out`, either at the top level or under
/// `scope`.
///
/// Keys that fail URL resolution stay literal (bare specifiers are valid
/// keys). String targets resolve against `base_url` and then through the
/// accumulated map with `scope` as the referrer; targets that still do not
/// resolve are dropped with a warning. Fallback arrays are not supported
/// and are skipped.
fn compose_packages(
    packages: &serde_json::Map<String, Value>,
    base_url: &str,
    out: &mut ImportMap,
    scope: Option<&str>,
    warnings: &mut Vec<MapWarning>,
) {
    for (key, target) in packages {
        let lhs = resolve_if_not_plain_or_url(key, base_url).unwrap_or_else(|| key.clone());
        let entry = match target {
            Value::Null => PackageTarget::Blocked,
            Value::String(rhs) => {
                let resolved_rhs =
                    resolve_if_not_plain_or_url(rhs, base_url).unwrap_or_else(|| rhs.clone());
                match resolve_against_map(out, &resolved_rhs, scope, warnings) {
                    Some(mapped) => PackageTarget::Url(mapped),
                    None => {
                        warnings.push(MapWarning::unresolved_target(key, rhs));
                        continue;
                    }
                }
            }
            // package fallback arrays are not supported
            _ => continue,
        };
        match scope {
            Some(scope_url) => {
                out.scopes
                    .entry(scope_url.to_owned())
                    .or_default()
                    .insert(lhs, entry);
            }
            None => {
                out.imports.insert(lhs, entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{resolve_import, warning_codes, PackageMap};
    use super::*;
    use serde_json::json;

    fn raw(doc: serde_json::Value) -> RawImportMap {
        serde_json::from_value(doc).unwrap()
    }

    #[test]
    fn test_compose_resolves_relative_target() {
        let mut map = ImportMap::default();
        let warnings = resolve_and_compose(
            &raw(json!({"imports": {"a": "./a.js"}})),
            "https://x/y/",
            &mut map,
        );
        assert!(warnings.is_empty());
        assert_eq!(
            map.imports.get("a"),
            Some(&PackageTarget::Url("https://x/y/a.js".to_string()))
        );
    }

    #[test]
    fn test_compose_keeps_bare_keys_literal() {
        let mut map = ImportMap::default();
        resolve_and_compose(
            &raw(json!({"imports": {"lodash/": "https://cdn/lodash/"}})),
            "https://x/",
            &mut map,
        );
        assert!(map.imports.contains_key("lodash/"));
    }

    #[test]
    fn test_compose_normalizes_relative_keys() {
        let mut map = ImportMap::default();
        resolve_and_compose(
            &raw(json!({"imports": {"./util.js": "./impl/util.js"}})),
            "https://x/y/",
            &mut map,
        );
        assert_eq!(
            map.imports.get("https://x/y/util.js"),
            Some(&PackageTarget::Url("https://x/y/impl/util.js".to_string()))
        );
    }

    #[test]
    fn test_compose_stores_null_as_blocked() {
        let mut map = ImportMap::default();
        let warnings =
            resolve_and_compose(&raw(json!({"imports": {"a": null}})), "https://x/", &mut map);
        assert!(warnings.is_empty());
        assert_eq!(map.imports.get("a"), Some(&PackageTarget::Blocked));
    }

    #[test]
    fn test_compose_skips_fallback_arrays() {
        let mut map = ImportMap::default();
        let warnings = resolve_and_compose(
            &raw(json!({"imports": {"a": ["./a.js", "./b.js"]}})),
            "https://x/",
            &mut map,
        );
        assert!(warnings.is_empty());
        assert!(map.imports.is_empty());
    }

    #[test]
    fn test_compose_drops_unresolvable_bare_target() {
        let mut map = ImportMap::default();
        let warnings =
            resolve_and_compose(&raw(json!({"imports": {"a": "b"}})), "https://x/", &mut map);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, warning_codes::UNRESOLVED_TARGET);
        assert_eq!(warnings[0].key, "a");
        assert_eq!(warnings[0].target, "b");
        assert!(map.imports.is_empty());
    }

    #[test]
    fn test_compose_scope_keys_resolve_against_base() {
        let mut map = ImportMap::default();
        resolve_and_compose(
            &raw(json!({"scopes": {"./vendor/": {"a": "./vendor/a.js"}}})),
            "https://x/y/",
            &mut map,
        );
        let scope = map.scopes.get("https://x/y/vendor/").unwrap();
        assert_eq!(
            scope.get("a"),
            Some(&PackageTarget::Url("https://x/y/vendor/a.js".to_string()))
        );
    }

    #[test]
    fn test_compose_creates_empty_scope_table() {
        let mut map = ImportMap::default();
        resolve_and_compose(&raw(json!({"scopes": {"./v/": {}}})), "https://x/", &mut map);
        assert_eq!(map.scopes.get("https://x/v/"), Some(&PackageMap::new()));
    }

    #[test]
    fn test_compose_normalizes_depcache_and_integrity_keys() {
        let mut map = ImportMap::default();
        resolve_and_compose(
            &raw(json!({
                "depcache": {"./a.js": ["./b.js", "c"]},
                "integrity": {"./a.js": "sha384-xyz"}
            })),
            "https://x/y/",
            &mut map,
        );
        assert_eq!(
            map.depcache.get("https://x/y/a.js"),
            Some(&vec!["./b.js".to_string(), "c".to_string()])
        );
        assert_eq!(
            map.integrity.get("https://x/y/a.js"),
            Some(&"sha384-xyz".to_string())
        );
    }

    #[test]
    fn test_layered_composition_rewrites_through_earlier_map() {
        let mut map = ImportMap::default();
        resolve_and_compose(
            &raw(json!({"imports": {"a": "./real-a.js"}})),
            "https://x/first/",
            &mut map,
        );
        // the second document's target "a" is a bare specifier remapped by
        // the first document
        let warnings = resolve_and_compose(
            &raw(json!({"imports": {"b": "a"}})),
            "https://x/second/",
            &mut map,
        );
        assert!(warnings.is_empty());
        assert_eq!(
            map.imports.get("b"),
            Some(&PackageTarget::Url("https://x/first/real-a.js".to_string()))
        );
    }

    #[test]
    fn test_scoped_target_rewritten_by_enclosing_scope() {
        let mut map = ImportMap::default();
        resolve_and_compose(
            &raw(json!({"scopes": {"https://x/app/": {"dep": "https://cdn/dep.js"}}})),
            "https://x/",
            &mut map,
        );
        let warnings = resolve_and_compose(
            &raw(json!({"scopes": {"https://x/app/sub/": {"alias": "dep"}}})),
            "https://x/",
            &mut map,
        );
        assert!(warnings.is_empty());
        let scope = map.scopes.get("https://x/app/sub/").unwrap();
        assert_eq!(
            scope.get("alias"),
            Some(&PackageTarget::Url("https://cdn/dep.js".to_string()))
        );
    }

    #[test]
    fn test_later_entry_overwrites_same_key() {
        let mut map = ImportMap::default();
        resolve_and_compose(
            &raw(json!({"imports": {"a": "./one.js"}})),
            "https://x/",
            &mut map,
        );
        resolve_and_compose(
            &raw(json!({"imports": {"a": "./two.js"}})),
            "https://x/",
            &mut map,
        );
        assert_eq!(
            map.imports.get("a"),
            Some(&PackageTarget::Url("https://x/two.js".to_string()))
        );
    }

    #[test]
    fn test_composition_is_idempotent_across_fresh_maps() {
        let doc = json!({
            "imports": {"a": "./a.js", "b/": "https://cdn/b/"},
            "scopes": {"./v/": {"a": "./v/a.js"}},
            "depcache": {"./a.js": ["b/x"]},
            "integrity": {"./a.js": "sha384-abc"}
        });
        let mut first = ImportMap::default();
        resolve_and_compose(&raw(doc.clone()), "https://x/y/", &mut first);
        let mut second = ImportMap::default();
        resolve_and_compose(&raw(doc), "https://x/y/", &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_composed_map_resolves_end_to_end() {
        let mut map = ImportMap::default();
        resolve_and_compose(
            &raw(json!({"imports": {"a": "./a.js"}})),
            "https://x/y/",
            &mut map,
        );
        assert_eq!(
            resolve_import(&map, "a", None),
            Some("https://x/y/a.js".to_string())
        );
    }
}
