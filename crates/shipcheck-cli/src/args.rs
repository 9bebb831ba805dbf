use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use shipcheck_core::VerifyConfig;
use shipcheck_core::config::{
    DEFAULT_BUILD_ROOT, DEFAULT_MIN_SIZE, DEFAULT_OUTPUT_DIR, DEFAULT_PRODUCT_NAME,
    DEFAULT_SMOKE_TIMEOUT, DEFAULT_VERSION, FailurePolicy, SmokeScope,
};
use shipcheck_core::platform::PlatformTarget;

#[derive(Debug, Parser)]
#[command(
    name = "shipcheck",
    version,
    about = "Locate, validate, stage and smoke-test per-platform release binaries"
)]
pub struct Args {
    /// Release version used in staged filenames
    #[arg(value_name = "VERSION", default_value = DEFAULT_VERSION)]
    pub release_version: String,

    /// Platforms to verify (comma separated or repeated)
    #[arg(
        long,
        value_delimiter = ',',
        value_parser = parse_platform,
        default_values_t = PlatformTarget::ALL.to_vec()
    )]
    pub platforms: Vec<PlatformTarget>,

    /// Directory holding one build tree per platform
    #[arg(long, default_value = DEFAULT_BUILD_ROOT)]
    pub build_root: PathBuf,

    /// Directory receiving the staged release assets
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Base name of the product's executables
    #[arg(long, default_value = DEFAULT_PRODUCT_NAME)]
    pub product: String,

    /// Minimum accepted artifact size in bytes
    #[arg(long, default_value_t = DEFAULT_MIN_SIZE)]
    pub min_size: u64,

    /// Seconds to wait for each smoke invocation before killing it
    #[arg(long, default_value_t = DEFAULT_SMOKE_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Which staged binaries to execute
    #[arg(long, default_value = "all")]
    pub smoke: SmokeArg,

    /// Stop at the first failing platform
    #[arg(long)]
    pub fail_fast: bool,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Optional git commit hash for tool metadata
    #[arg(long)]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SmokeArg {
    All,
    Host,
    None,
}

impl From<SmokeArg> for SmokeScope {
    fn from(arg: SmokeArg) -> Self {
        match arg {
            SmokeArg::All => SmokeScope::All,
            SmokeArg::Host => SmokeScope::Host,
            SmokeArg::None => SmokeScope::None,
        }
    }
}

fn parse_platform(s: &str) -> Result<PlatformTarget, String> {
    s.parse().map_err(|e: shipcheck_core::error::VerifyError| e.to_string())
}

impl Args {
    pub fn to_config(&self) -> VerifyConfig {
        VerifyConfig {
            product_name: self.product.clone(),
            version: self.release_version.clone(),
            build_root: self.build_root.clone(),
            output_dir: self.output_dir.clone(),
            platforms: self.platforms.clone(),
            min_size: self.min_size,
            smoke_timeout: Duration::from_secs(self.timeout_secs),
            smoke_scope: self.smoke.into(),
            failure_policy: if self.fail_fast {
                FailurePolicy::FailFast
            } else {
                FailurePolicy::CollectAll
            },
        }
    }
}
