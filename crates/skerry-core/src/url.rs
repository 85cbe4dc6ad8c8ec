//! URL reference resolution against a base URL.
//!
//! Import-map lookups only ever need scheme-prefix lengths and path
//! boundaries, never a full URL parse, so the resolver works directly on
//! the string without any URL library.

use std::path::Path;

/// Resolve `reference` against `base` when it is relative (`./`, `../`),
/// absolute-path (`/`), or protocol-relative (`//`).
///
/// Returns `None` for everything else - bare specifiers and already-absolute
/// URLs - which the import-map layer handles separately. Backslashes in
/// `reference` are treated as path separators. `base` must be an absolute
/// URL (it contains a `:`).
#[must_use]
pub fn resolve_if_not_plain_or_url(reference: &str, base: &str) -> Option<String> {
    let backslashes;
    let mut reference = reference;
    if reference.contains('\\') {
        backslashes = reference.replace('\\', "/");
        reference = &backslashes;
    }

    // protocol-relative
    if reference.as_bytes().first() == Some(&b'/') && reference.as_bytes().get(1) == Some(&b'/') {
        let scheme_end = base.find(':').map_or(0, |i| i + 1);
        return Some(format!("{}{reference}", &base[..scheme_end]));
    }

    // a lone "." or ".." classifies as if it had a trailing slash
    let dotted;
    if reference == "." || reference == ".." {
        dotted = format!("{reference}/");
        reference = &dotted;
    }

    if !(reference.starts_with("./")
        || reference.starts_with("../")
        || reference.starts_with('/'))
    {
        return None;
    }

    let scheme_end = base.find(':').map_or(0, |i| i + 1);
    let base_bytes = base.as_bytes();

    // The pathname is the part of `base` after the authority, without its
    // leading '/'.
    let pathname: &str = if base_bytes.get(scheme_end + 1) == Some(&b'/') {
        // scheme://... form; file: URLs carry no host segment
        if &base[..scheme_end] == "file:" {
            base.get(8..).unwrap_or("")
        } else {
            let after_authority = base.get(scheme_end + 2..).unwrap_or("");
            let path_start = after_authority.find('/').map_or(0, |i| i + 1);
            &after_authority[path_start..]
        }
    } else {
        // scheme:/... form; the pathname is everything after the slash
        let skip = usize::from(base_bytes.get(scheme_end) == Some(&b'/'));
        base.get(scheme_end + skip..).unwrap_or("")
    };

    // A leading-slash reference replaces the whole path verbatim.
    if reference.starts_with('/') {
        let authority_end = base.len().saturating_sub(pathname.len() + 1);
        return Some(format!("{}{reference}", &base[..authority_end]));
    }

    // Join the base directory with the reference and strip '.' and '..'
    // segments in a single left-to-right scan. Excess backtracking
    // silently collapses to the shortest valid result.
    let dir_end = pathname.rfind('/').map_or(0, |i| i + 1);
    let segmented = format!("{}{reference}", &pathname[..dir_end]);
    let bytes = segmented.as_bytes();

    let mut output: Vec<&str> = Vec::new();
    let mut segment_start: Option<usize> = None;
    let mut i = 0;
    while i < bytes.len() {
        if let Some(start) = segment_start {
            // busy reading a segment - only '/' terminates it
            if bytes[i] == b'/' {
                output.push(&segmented[start..=i]);
                segment_start = None;
            }
        } else if bytes[i] == b'.' {
            if bytes.get(i + 1) == Some(&b'.')
                && (bytes.get(i + 2) == Some(&b'/') || i + 2 == bytes.len())
            {
                // ".." pops the previously emitted segment
                output.pop();
                i += 2;
            } else if bytes.get(i + 1) == Some(&b'/') || i + 1 == bytes.len() {
                // "." is dropped
                i += 1;
            } else {
                segment_start = Some(i);
            }
        } else {
            segment_start = Some(i);
        }
        i += 1;
    }
    // finish reading out the last segment
    if let Some(start) = segment_start {
        output.push(&segmented[start..]);
    }

    let mut resolved = String::with_capacity(base.len() + segmented.len());
    resolved.push_str(&base[..base.len() - pathname.len()]);
    for segment in &output {
        resolved.push_str(segment);
    }
    Some(resolved)
}

/// Resolve any reference against `base`.
///
/// Relative and path references resolve through
/// [`resolve_if_not_plain_or_url`]; references that already carry a scheme
/// pass through unchanged; everything else is retried as a `./`-relative
/// path, so every non-empty reference produces a result.
#[must_use]
pub fn resolve_url(reference: &str, base: &str) -> String {
    match resolve_if_not_plain_or_url(reference, base) {
        Some(resolved) => resolved,
        None if reference.contains(':') => reference.to_owned(),
        None => {
            let dotted = format!("./{reference}");
            resolve_if_not_plain_or_url(&dotted, base).unwrap_or(dotted)
        }
    }
}

/// Build a `file:` directory base URL from a filesystem path.
///
/// Forward slashes throughout, a leading `/` inserted for drive-letter
/// paths, and a trailing `/` so the result resolves like a directory.
#[must_use]
pub fn directory_base_url(path: &Path) -> String {
    let mut p = path.to_string_lossy().replace('\\', "/");
    if !p.starts_with('/') {
        p.insert(0, '/');
    }
    if !p.ends_with('/') {
        p.push('/');
    }
    format!("file://{p}")
}
