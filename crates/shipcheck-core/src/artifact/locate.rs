//! Discovery of the raw build output for a platform.
//!
//! The search walks the root recursively and collects every regular file
//! whose name starts with the product base name:
//!
//! - `win-x64`: the name must also end in `.exe` (case-insensitive)
//! - other targets: the file must carry an executable permission bit
//!
//! When several files match, the lexicographically smallest path wins so
//! the choice never depends on directory traversal order. Entries the walk
//! cannot read are logged and listed in the not-found diagnostics.

use std::path::Path;

use log::{debug, warn};
use walkdir::WalkDir;

use crate::artifact::ArtifactCandidate;
use crate::error::{Result, VerifyError};
use crate::platform::PlatformTarget;
use crate::util::deterministic::{first_path, relative_listing, sort_paths};
use crate::util::fs::is_executable;

/// Upper bound on the directory listing carried by a not-found error.
const MAX_LISTED_FILES: usize = 20;

/// Find the single build output for `platform` under `root`.
pub fn locate(
    root: &Path,
    product_name: &str,
    platform: PlatformTarget,
) -> Result<ArtifactCandidate> {
    if !root.is_dir() {
        return Err(VerifyError::SearchRootMissing {
            platform,
            root: root.to_path_buf(),
        });
    }

    let mut present = Vec::new();
    let mut matches = Vec::new();
    let mut unreadable = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("{platform}: skipping unreadable entry: {e}");
                if let Some(path) = e.path() {
                    unreadable.push(path.to_path_buf());
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path().to_path_buf();
        if is_match(&entry, product_name, platform) {
            matches.push(path);
        } else {
            present.push(path);
        }
    }

    if matches.len() > 1 {
        sort_paths(&mut matches);
        warn!(
            "{platform}: {} candidates match `{product_name}`, using {}",
            matches.len(),
            matches[0].display()
        );
    }

    match first_path(matches) {
        Some(path) => {
            debug!("{platform}: located {}", path.display());
            Ok(ArtifactCandidate { path, platform })
        }
        None => {
            let mut listing: Vec<String> = relative_listing(root, &unreadable)
                .into_iter()
                .map(|p| format!("{p} (unreadable)"))
                .collect();
            listing.extend(relative_listing(root, &present));
            listing.truncate(MAX_LISTED_FILES);
            Err(VerifyError::NotFound {
                platform,
                root: root.to_path_buf(),
                present: listing,
            })
        }
    }
}

fn is_match(entry: &walkdir::DirEntry, product_name: &str, platform: PlatformTarget) -> bool {
    let name = entry.file_name().to_string_lossy();
    if !name.starts_with(product_name) {
        return false;
    }

    if platform.requires_exec_bit() {
        entry.metadata().map(|m| is_executable(&m)).unwrap_or(false)
    } else {
        name.to_ascii_lowercase().ends_with(platform.extension())
    }
}
