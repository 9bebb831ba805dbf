//! Error taxonomy for a verification run.
//!
//! Every variant is fatal to the platform it concerns. None are retried;
//! the pipeline records the rendered message as the platform's failure
//! reason.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::platform::PlatformTarget;

pub type Result<T> = std::result::Result<T, VerifyError>;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("unknown platform `{name}` (expected one of: win-x64, linux-x64, osx-x64)")]
    UnknownPlatform { name: String },

    #[error("search root {} for {platform} does not exist", root.display())]
    SearchRootMissing {
        platform: PlatformTarget,
        root: PathBuf,
    },

    #[error("no {platform} artifact found under {} (present: {})", root.display(), render_listing(present))]
    NotFound {
        platform: PlatformTarget,
        root: PathBuf,
        /// Files found under the root, for diagnosing naming mismatches.
        present: Vec<String>,
    },

    #[error("{failure}")]
    Validation {
        platform: PlatformTarget,
        failure: ValidationFailure,
    },

    #[error("invalid version `{version}`: must not contain path separators or `..`")]
    InvalidVersion { version: String },

    #[error("failed to stage {platform} artifact to {}: {source}", path.display())]
    Staging {
        platform: PlatformTarget,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to start {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{args}` exited with {}", render_code(*code))]
    SmokeFailed { args: String, code: Option<i32> },

    #[error("`{args}` timed out after {timeout:?}")]
    Timeout { args: String, timeout: Duration },
}

/// The single reason an artifact was rejected by validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("file not found")]
    NotFound,

    #[error("file not readable: {reason}")]
    NotReadable { reason: String },

    #[error("file too small ({size} bytes, minimum {min})")]
    TooSmall { size: u64, min: u64 },

    #[error("not executable")]
    NotExecutable,
}

fn render_listing(present: &[String]) -> String {
    if present.is_empty() {
        "nothing".to_string()
    } else {
        present.join(", ")
    }
}

fn render_code(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
