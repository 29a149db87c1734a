//! Filesystem helpers for the `~/.flowdesk` data directory.

use std::path::{Path, PathBuf};

/// Root directory for client-side state (config, token, selected customer).
pub fn data_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(".flowdesk")
}

/// Create `dir` (and parents) if missing, restricting it to the owner on Unix.
pub fn ensure_private_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
        }
    }
    Ok(())
}

/// Write `content` to `path` atomically: write a sibling temp file, then rename.
///
/// Readers never observe a half-written file, and a crash mid-write leaves the
/// previous contents intact.
pub fn atomic_write_str(path: &Path, content: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, content)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))?;
    }
    std::fs::rename(&tmp, path)
}
