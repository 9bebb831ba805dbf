//! Build artifacts: discovery, validation, staging, fingerprinting.

pub mod locate;
pub mod stage;
pub mod validate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::platform::PlatformTarget;

/// A discovered build output for one platform. Read-only once located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCandidate {
    pub path: PathBuf,
    pub platform: PlatformTarget,
}

/// Cryptographic fingerprint of a staged asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactHash {
    pub algorithm: String,
    pub value: String,
}

/// Compute the SHA-256 of a file's bytes.
///
/// The identity depends only on content; timestamps and permissions are
/// ignored.
pub fn fingerprint(path: &std::path::Path) -> Result<ArtifactHash> {
    let mut file = std::fs::File::open(path)
        .with_context(|| format!("failed to open artifact: {}", path.display()))?;

    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)
        .with_context(|| format!("failed to read artifact: {}", path.display()))?;

    Ok(ArtifactHash {
        algorithm: "sha256".to_string(),
        value: hex::encode(hasher.finalize()),
    })
}
