//! Fixed set of platform targets the product is built for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VerifyError;

/// One operating-system/architecture combination of the release matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlatformTarget {
    #[serde(rename = "win-x64")]
    WinX64,
    #[serde(rename = "linux-x64")]
    LinuxX64,
    #[serde(rename = "osx-x64")]
    OsxX64,
}

impl PlatformTarget {
    /// Every target, in release-matrix order.
    pub const ALL: [PlatformTarget; 3] = [Self::WinX64, Self::LinuxX64, Self::OsxX64];

    pub fn id(self) -> &'static str {
        match self {
            Self::WinX64 => "win-x64",
            Self::LinuxX64 => "linux-x64",
            Self::OsxX64 => "osx-x64",
        }
    }

    /// File extension carried by executables of this target (empty if none).
    pub fn extension(self) -> &'static str {
        match self {
            Self::WinX64 => ".exe",
            Self::LinuxX64 | Self::OsxX64 => "",
        }
    }

    /// Whether artifacts of this target must carry an executable permission bit.
    pub fn requires_exec_bit(self) -> bool {
        !matches!(self, Self::WinX64)
    }

    /// The target matching the machine this tool runs on, if any.
    pub fn host() -> Option<Self> {
        if !cfg!(target_arch = "x86_64") {
            return None;
        }
        if cfg!(target_os = "windows") {
            Some(Self::WinX64)
        } else if cfg!(target_os = "linux") {
            Some(Self::LinuxX64)
        } else if cfg!(target_os = "macos") {
            Some(Self::OsxX64)
        } else {
            None
        }
    }
}

impl fmt::Display for PlatformTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PlatformTarget {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| VerifyError::UnknownPlatform {
                name: s.to_string(),
            })
    }
}
