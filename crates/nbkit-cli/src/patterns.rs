//! Expansion of notebook filename patterns

use anyhow::{Context, Result};
use std::path::PathBuf;

/// True if `pattern` contains glob metacharacters
fn is_glob(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

/// Expand patterns to concrete file paths, keeping pattern order
///
/// A pattern without glob characters is taken as-is, so a missing file is
/// reported when it is opened. A glob pattern contributes only regular files
/// and may match nothing. With `sort`, each pattern's matches are sorted
/// before being appended.
///
/// # Errors
///
/// Returns an error for a syntactically invalid glob pattern or an
/// unreadable directory entry.
pub fn expand_patterns<S: AsRef<str>>(patterns: &[S], sort: bool) -> Result<Vec<PathBuf>> {
    let mut expanded = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        if !is_glob(pattern) {
            expanded.push(PathBuf::from(pattern));
            continue;
        }

        let matches =
            glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?;

        let mut group = Vec::new();
        for entry in matches {
            let path = entry.with_context(|| format!("Failed to read glob entry for {pattern}"))?;
            if path.is_file() {
                group.push(path);
            }
        }

        if group.is_empty() {
            log::warn!("pattern {pattern} matched no files");
        }
        if sort {
            group.sort();
        }
        log::debug!("pattern {pattern} matched {} file(s)", group.len());
        expanded.extend(group);
    }

    Ok(expanded)
}
