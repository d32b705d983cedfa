use crate::error::SweepError;
use crate::models::types::OsFamily;
use std::fs;
use std::path::{Path, PathBuf};

pub const PERMISSION_MARKER: &str = "gosweep-permission-test";
pub const DEFAULT_UNIX_ROOT: &str = "/usr/local/go";

/// Removes the probe file when dropped, whatever happened in between.
struct ProbeFile(PathBuf);

impl Drop for ProbeFile {
    fn drop(&mut self) {
        if self.0.exists() {
            if let Err(e) = fs::remove_file(&self.0) {
                log::warn!("failed to remove probe file {}: {}", self.0.display(), e);
            }
        }
    }
}

/// Creates and deletes `marker` inside `dir`. Leaves nothing behind.
pub fn probe_write(dir: &Path, marker: &str) -> Result<(), SweepError> {
    let probe = ProbeFile(dir.join(marker));
    fs::write(&probe.0, b"test").map_err(|source| SweepError::PermissionDenied {
        path: dir.to_path_buf(),
        source,
    })?;
    drop(probe);
    Ok(())
}

pub struct PermissionValidator {
    elevated: bool,
}

impl PermissionValidator {
    pub fn detect(os: OsFamily) -> Self {
        // Windows installs are checked by the write-probe at deletion time only.
        let elevated = os.is_windows() || whoami::username() == "root";
        Self { elevated }
    }

    #[cfg(test)]
    pub fn with_elevation(elevated: bool) -> Self {
        Self { elevated }
    }

    /// Ok when elevated, when `root` does not exist, or when a marker file can
    /// be created inside it.
    pub fn check(&self, root: &Path) -> Result<(), SweepError> {
        if self.elevated || !root.exists() {
            return Ok(());
        }
        probe_write(root, PERMISSION_MARKER)
    }

    /// Runs `check` against the OS family's default installation root.
    pub fn check_default(&self, os: OsFamily) -> Result<(), SweepError> {
        if os.is_windows() {
            return Ok(());
        }
        self.check(Path::new(DEFAULT_UNIX_ROOT))
    }
}
