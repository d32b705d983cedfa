use crate::error::SweepError;
use crate::models::installation::Installation;
use crate::services::guard::is_critical;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::Command;
use tar::Archive;

/// A batch that stopped partway. Archives written before the failure are kept.
#[derive(Debug)]
pub struct BackupFailure {
    pub error: SweepError,
    pub completed: Vec<PathBuf>,
}

pub struct BackupArchiver {
    backup_dir: PathBuf,
    stamp: String,
    verify: bool,
}

impl BackupArchiver {
    pub fn new(backup_dir: PathBuf, stamp: String) -> Self {
        Self {
            backup_dir,
            stamp,
            verify: true,
        }
    }

    pub fn without_verification(mut self) -> Self {
        self.verify = false;
        self
    }

    pub fn archive_path(&self, index: usize) -> PathBuf {
        self.backup_dir
            .join(format!("go_backup_{}_{}.tar.gz", self.stamp, index + 1))
    }

    /// Archives every installation that still exists, stopping at the first failure.
    pub fn backup(&self, installations: &[Installation]) -> Result<Vec<PathBuf>, BackupFailure> {
        let mut completed = Vec::new();

        if let Err(e) = fs::create_dir_all(&self.backup_dir) {
            return Err(BackupFailure {
                error: SweepError::Backup {
                    path: self.backup_dir.clone(),
                    message: format!("cannot create backup directory: {}", e),
                },
                completed,
            });
        }

        for (index, install) in installations.iter().enumerate() {
            if !install.path.exists() {
                log::debug!("backup {}: gone, skipping", install.path.display());
                continue;
            }

            let dest = self.archive_path(index);
            if let Err(error) = self.archive_one(&install.path, &dest) {
                return Err(BackupFailure { error, completed });
            }
            log::info!("archived {} -> {}", install.path.display(), dest.display());
            completed.push(dest);
        }

        Ok(completed)
    }

    fn archive_one(&self, source: &Path, dest: &Path) -> Result<(), SweepError> {
        let failure = |message: String| SweepError::Backup {
            path: source.to_path_buf(),
            message,
        };

        if is_critical(source) {
            return Err(SweepError::CriticalPath(source.to_path_buf()));
        }

        let (parent, name) = match (source.parent(), source.file_name()) {
            (Some(parent), Some(name)) => (parent, name),
            _ => return Err(failure("path has no parent directory".to_string())),
        };

        let output = Command::new("tar")
            .arg("-czf")
            .arg(dest)
            .arg("-C")
            .arg(parent)
            .arg(name)
            .output()
            .map_err(|e| failure(format!("cannot run tar: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failure(format!("tar exited with {}: {}", output.status, stderr.trim())));
        }

        if self.verify {
            let entries = verify_archive(dest).map_err(|e| failure(format!("{:#}", e)))?;
            log::debug!("verified {} ({} entries)", dest.display(), entries);
        }
        Ok(())
    }
}

/// Reads the archive back end to end and returns its entry count.
pub fn verify_archive(path: &Path) -> Result<usize> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open archive: {}", path.display()))?;
    let mut archive = Archive::new(GzDecoder::new(file));

    let mut count = 0;
    for entry in archive.entries().context("Failed to read archive")? {
        entry.context("Corrupt archive entry")?;
        count += 1;
    }

    if count == 0 {
        anyhow::bail!("Archive is empty: {}", path.display());
    }
    Ok(count)
}
