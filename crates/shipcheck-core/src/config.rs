//! Explicit configuration for a verification run.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::platform::PlatformTarget;

pub const DEFAULT_PRODUCT_NAME: &str = "RewindSubtitleDisplayerForPlex";
pub const DEFAULT_VERSION: &str = "0.0.1-test";
pub const DEFAULT_BUILD_ROOT: &str = "bin/Release/net9.0";
pub const DEFAULT_OUTPUT_DIR: &str = "release-assets";

/// Sanity floor against truncated or empty builds.
pub const DEFAULT_MIN_SIZE: u64 = 1_000_000;

pub const DEFAULT_SMOKE_TIMEOUT: Duration = Duration::from_secs(30);

/// Which staged binaries get executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokeScope {
    /// Run every platform's binary.
    #[default]
    All,
    /// Run only the binary built for the current host.
    Host,
    /// Skip smoke testing entirely.
    None,
}

impl SmokeScope {
    pub fn includes(self, platform: PlatformTarget) -> bool {
        match self {
            Self::All => true,
            Self::Host => PlatformTarget::host() == Some(platform),
            Self::None => false,
        }
    }
}

/// What happens after a platform fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Process every platform, then report.
    #[default]
    CollectAll,
    /// Stop at the first failing platform.
    FailFast,
}

/// Inputs of one verification run.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    pub product_name: String,
    pub version: String,
    /// Parent of the per-platform build trees (`<build_root>/<platform>/...`).
    pub build_root: PathBuf,
    pub output_dir: PathBuf,
    pub platforms: Vec<PlatformTarget>,
    pub min_size: u64,
    pub smoke_timeout: Duration,
    pub smoke_scope: SmokeScope,
    pub failure_policy: FailurePolicy,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            version: DEFAULT_VERSION.to_string(),
            build_root: PathBuf::from(DEFAULT_BUILD_ROOT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            platforms: PlatformTarget::ALL.to_vec(),
            min_size: DEFAULT_MIN_SIZE,
            smoke_timeout: DEFAULT_SMOKE_TIMEOUT,
            smoke_scope: SmokeScope::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl VerifyConfig {
    /// Directory searched for the build output of `platform`.
    pub fn search_root(&self, platform: PlatformTarget) -> PathBuf {
        self.build_root.join(platform.id())
    }
}
