//! Permission-bit helpers that degrade gracefully off Unix.

use std::fs::Metadata;
use std::io;
use std::path::Path;

/// Whether any of the owner/group/other execute bits is set.
///
/// Platforms without Unix permission bits report every file as executable.
#[cfg(unix)]
pub fn is_executable(meta: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
pub fn is_executable(_meta: &Metadata) -> bool {
    true
}

/// Set `rwxr-xr-x` on `path`.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
