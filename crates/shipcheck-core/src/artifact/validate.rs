//! Read-only sanity checks on a located or staged artifact.
//!
//! Checks run in order and stop at the first failure:
//!
//!   1. the path is an existing, readable regular file
//!   2. its size is at least the configured minimum
//!   3. non-Windows targets carry an executable permission bit

use std::fs::{self, File};
use std::io::ErrorKind;

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactCandidate;
use crate::error::ValidationFailure;
use crate::util::fs::is_executable;

/// Outcome of validating one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    /// Present exactly when `passed` is false.
    pub reason: Option<String>,
    pub size_bytes: Option<u64>,
    #[serde(skip)]
    pub failure: Option<ValidationFailure>,
}

impl ValidationResult {
    pub fn pass(size_bytes: u64) -> Self {
        Self {
            passed: true,
            reason: None,
            size_bytes: Some(size_bytes),
            failure: None,
        }
    }

    pub fn fail(failure: ValidationFailure, size_bytes: Option<u64>) -> Self {
        Self {
            passed: false,
            reason: Some(failure.to_string()),
            size_bytes,
            failure: Some(failure),
        }
    }
}

pub fn validate(candidate: &ArtifactCandidate, min_size: u64) -> ValidationResult {
    let meta = match fs::metadata(&candidate.path) {
        Ok(m) if m.is_file() => m,
        Ok(_) => return ValidationResult::fail(ValidationFailure::NotFound, None),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return ValidationResult::fail(ValidationFailure::NotFound, None);
        }
        Err(e) => {
            return ValidationResult::fail(
                ValidationFailure::NotReadable {
                    reason: e.to_string(),
                },
                None,
            );
        }
    };

    if let Err(e) = File::open(&candidate.path) {
        return ValidationResult::fail(
            ValidationFailure::NotReadable {
                reason: e.to_string(),
            },
            Some(meta.len()),
        );
    }

    let size = meta.len();
    if size < min_size {
        return ValidationResult::fail(
            ValidationFailure::TooSmall {
                size,
                min: min_size,
            },
            Some(size),
        );
    }

    if candidate.platform.requires_exec_bit() && !is_executable(&meta) {
        return ValidationResult::fail(ValidationFailure::NotExecutable, Some(size));
    }

    ValidationResult::pass(size)
}
