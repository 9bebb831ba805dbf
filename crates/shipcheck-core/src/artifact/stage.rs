//! Copying validated artifacts into the release-asset layout.
//!
//! Staged files are named `<product>_<version>_<platform>[.exe]`. Staging is
//! idempotent: the output directory is created on demand and an existing
//! staged file is overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::artifact::ArtifactCandidate;
use crate::error::{Result, VerifyError};
use crate::platform::PlatformTarget;
use crate::util::fs::make_executable;

/// Stages build artifacts under one product name and version.
pub struct Stager {
    product_name: String,
    version: String,
    output_dir: PathBuf,
}

impl Stager {
    /// Create a stager, rejecting versions that would escape `output_dir`.
    pub fn new(product_name: &str, version: &str, output_dir: &Path) -> Result<Self> {
        if version.is_empty()
            || version.contains('/')
            || version.contains('\\')
            || version.contains("..")
        {
            return Err(VerifyError::InvalidVersion {
                version: version.to_string(),
            });
        }

        Ok(Self {
            product_name: product_name.to_owned(),
            version: version.to_owned(),
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Canonical release filename for `platform`.
    pub fn staged_filename(&self, platform: PlatformTarget) -> String {
        format!(
            "{}_{}_{}{}",
            self.product_name,
            self.version,
            platform.id(),
            platform.extension()
        )
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Copy `candidate` into the output directory under its canonical name.
    ///
    /// Non-Windows copies get mode `0o755` whatever the source permissions.
    pub fn stage(&self, candidate: &ArtifactCandidate) -> Result<PathBuf> {
        let platform = candidate.platform;
        let dest = self.output_dir.join(self.staged_filename(platform));
        let staging_err = |source| VerifyError::Staging {
            platform,
            path: dest.clone(),
            source,
        };

        fs::create_dir_all(&self.output_dir).map_err(staging_err)?;
        fs::copy(&candidate.path, &dest).map_err(staging_err)?;

        if platform.requires_exec_bit() {
            make_executable(&dest).map_err(staging_err)?;
        }

        info!(
            "{platform}: staged {} -> {}",
            candidate.path.display(),
            dest.display()
        );
        Ok(dest)
    }
}

/// Stage a single candidate without keeping a `Stager` around.
pub fn stage(
    candidate: &ArtifactCandidate,
    product_name: &str,
    version: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    Stager::new(product_name, version, output_dir)?.stage(candidate)
}
