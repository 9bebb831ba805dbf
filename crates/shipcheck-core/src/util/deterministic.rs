//! Deterministic ordering helpers.
//!
//! Directory traversal order is filesystem-dependent. Everything that picks
//! among, or lists, discovered files goes through these helpers so identical
//! trees always produce identical results.

use std::path::{Path, PathBuf};

/// Sort paths lexicographically by their component sequence.
pub fn sort_paths(paths: &mut [PathBuf]) {
    paths.sort();
}

/// Return the lexicographically smallest path, if any.
pub fn first_path(mut paths: Vec<PathBuf>) -> Option<PathBuf> {
    sort_paths(&mut paths);
    paths.into_iter().next()
}

/// Render `paths` relative to `root`, sorted, for diagnostics.
pub fn relative_listing(root: &Path, paths: &[PathBuf]) -> Vec<String> {
    let mut listing: Vec<String> = paths
        .iter()
        .map(|p| {
            p.strip_prefix(root)
                .unwrap_or(p)
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    listing.sort();
    listing
}
