use serde::{Deserialize, Serialize};

use crate::SCHEMA_VERSION;
use crate::artifact::ArtifactHash;
use crate::artifact::validate::ValidationResult;
use crate::config::{FailurePolicy, SmokeScope, VerifyConfig};
use crate::error::Result;
use crate::platform::PlatformTarget;
use crate::smoke::SmokeTestOutcome;

/// Top-level verification report.
///
/// This is the stable JSON contract emitted by `--format json`. Platform
/// entries keep the order in which platforms were processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub platforms: Vec<PlatformResult>,
    pub outcome: OutcomeInfo,
}

impl Report {
    /// Summary text and exit code, in that order.
    pub fn summary(&self) -> (String, i32) {
        (
            crate::report::render::render_text(self),
            self.outcome.exit_code,
        )
    }

    pub fn passed(&self) -> bool {
        self.outcome.exit_code == 0
    }
}

/// Tool metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
    pub commit: Option<String>,
}

/// Inputs the run was invoked with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub product: String,
    pub version: String,
    pub build_root: String,
    pub output_dir: String,
    pub min_size_bytes: u64,
    pub smoke_timeout_ms: u64,
    pub smoke_scope: SmokeScope,
    pub failure_policy: FailurePolicy,
}

impl From<&VerifyConfig> for RunInfo {
    fn from(cfg: &VerifyConfig) -> Self {
        Self {
            product: cfg.product_name.clone(),
            version: cfg.version.clone(),
            build_root: cfg.build_root.display().to_string(),
            output_dir: cfg.output_dir.display().to_string(),
            min_size_bytes: cfg.min_size,
            smoke_timeout_ms: cfg.smoke_timeout.as_millis() as u64,
            smoke_scope: cfg.smoke_scope,
            failure_policy: cfg.failure_policy,
        }
    }
}

/// Terminal state of one platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformStatus {
    Passed,
    Failed,
    /// Not attempted because an earlier platform failed under fail-fast.
    Skipped,
}

impl std::fmt::Display for PlatformStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
        })
    }
}

/// A staged release asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StagedAsset {
    pub path: String,
    pub file_name: String,
    pub size_bytes: u64,
    pub hash: Option<ArtifactHash>,
}

/// Everything learned about one platform during the run.
///
/// Fields are filled in as the platform progresses through
/// locate → validate → stage → smoke-test; a failure leaves the later
/// ones empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformResult {
    pub platform: PlatformTarget,
    pub status: PlatformStatus,
    /// First failure reason; `None` unless `status` is `Failed`.
    pub reason: Option<String>,
    pub artifact: Option<String>,
    /// Validation of the located artifact, or of the staged copy when that
    /// is what failed.
    pub validation: Option<ValidationResult>,
    pub staged: Option<StagedAsset>,
    pub smoke_skipped: bool,
    pub smoke: Vec<SmokeTestOutcome>,
    pub warnings: Vec<String>,
}

impl PlatformResult {
    pub fn new(platform: PlatformTarget) -> Self {
        Self {
            platform,
            status: PlatformStatus::Skipped,
            reason: None,
            artifact: None,
            validation: None,
            staged: None,
            smoke_skipped: false,
            smoke: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Aggregate verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutcomeInfo {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// 0 when every platform passed, 1 otherwise.
    pub exit_code: i32,
}

/// Append-only accumulator of platform results.
#[derive(Debug, Default)]
pub struct VerificationReport {
    entries: Vec<PlatformResult>,
}

impl VerificationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a processed platform.
    ///
    /// `outcome` is the result of the platform's pipeline; its error, if
    /// any, becomes the platform's failure reason.
    pub fn record(&mut self, mut entry: PlatformResult, outcome: Result<()>) {
        match outcome {
            Ok(()) => {
                entry.status = PlatformStatus::Passed;
                entry.reason = None;
            }
            Err(e) => {
                entry.status = PlatformStatus::Failed;
                entry.reason = Some(e.to_string());
            }
        }
        self.entries.push(entry);
    }

    /// Record a platform that was never attempted.
    pub fn record_skipped(&mut self, platform: PlatformTarget) {
        self.entries.push(PlatformResult::new(platform));
    }

    /// Whether any platform recorded so far has failed.
    pub fn has_failures(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.status == PlatformStatus::Failed)
    }

    /// Close the report and compute the aggregate exit code.
    ///
    /// The run passes only if every platform passed; an empty run fails.
    pub fn finalize(self, tool: ToolInfo, run: RunInfo) -> Report {
        let count = |status: PlatformStatus| {
            self.entries
                .iter()
                .filter(|e| e.status == status)
                .count()
        };
        let passed = count(PlatformStatus::Passed);
        let failed = count(PlatformStatus::Failed);
        let skipped = count(PlatformStatus::Skipped);

        let exit_code = if !self.entries.is_empty() && passed == self.entries.len() {
            0
        } else {
            1
        };

        Report {
            schema_version: SCHEMA_VERSION.to_string(),
            tool,
            run,
            platforms: self.entries,
            outcome: OutcomeInfo {
                passed,
                failed,
                skipped,
                exit_code,
            },
        }
    }
}
