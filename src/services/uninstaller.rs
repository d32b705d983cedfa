use crate::error::SweepError;
use crate::services::guard::is_critical;
use crate::services::permissions::probe_write;
use std::fs;
use std::path::{Path, PathBuf};

pub const WRITE_PROBE: &str = "gosweep-write-probe";

#[derive(Debug, Default)]
pub struct UninstallReport {
    pub removed: PathBuf,
    pub secondary_removed: Vec<PathBuf>,
    pub secondary_failed: Vec<(PathBuf, String)>,
}

pub struct Uninstaller;

impl Uninstaller {
    /// Removes `primary`, then best-effort removes each version-manager dir.
    ///
    /// Nothing is deleted unless `primary` passes the guard and a write-probe
    /// inside it succeeds. Only a failure on `primary` is reported as an error.
    pub fn uninstall(
        primary: &Path,
        version_manager_dirs: &[PathBuf],
    ) -> Result<UninstallReport, SweepError> {
        if is_critical(primary) {
            return Err(SweepError::CriticalPath(primary.to_path_buf()));
        }

        probe_write(primary, WRITE_PROBE)?;

        fs::remove_dir_all(primary).map_err(|source| SweepError::Removal {
            path: primary.to_path_buf(),
            source,
        })?;
        log::info!("removed {}", primary.display());

        let mut report = UninstallReport {
            removed: primary.to_path_buf(),
            ..Default::default()
        };

        for dir in version_manager_dirs {
            if dir.as_path() == primary || is_critical(dir) || !dir.exists() {
                continue;
            }
            match fs::remove_dir_all(dir) {
                Ok(_) => {
                    log::info!("removed {}", dir.display());
                    report.secondary_removed.push(dir.clone());
                }
                Err(e) => {
                    log::debug!("cleanup of {} failed: {}", dir.display(), e);
                    report.secondary_failed.push((dir.clone(), e.to_string()));
                }
            }
        }

        Ok(report)
    }
}
