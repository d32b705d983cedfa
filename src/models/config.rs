use crate::models::types::OsFamily;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::env;
use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "GOSWEEP_HOME";
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub log_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub home_dir: Option<PathBuf>,
    pub os: OsFamily,
    pub started_at: DateTime<Local>,
}

impl Config {
    pub fn new() -> Result<Self> {
        let home_dir = dirs_next::home_dir();
        let base_dir = match env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => home_dir
                .as_ref()
                .map(|h| h.join(".gosweep"))
                .context("Failed to get home directory")?,
        };
        Ok(Self::with_base(base_dir, home_dir))
    }

    pub fn with_base(base_dir: PathBuf, home_dir: Option<PathBuf>) -> Self {
        let log_dir = base_dir.join("logs");
        let backup_dir = base_dir.join("backups");

        Self {
            base_dir,
            log_dir,
            backup_dir,
            home_dir,
            os: OsFamily::default(),
            started_at: Local::now(),
        }
    }

    /// Timestamp shared by every file this run produces.
    pub fn run_stamp(&self) -> String {
        self.started_at.format(STAMP_FORMAT).to_string()
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(format!("gosweep_{}.log", self.run_stamp()))
    }

}

pub fn gvm_dir(home: &Path) -> PathBuf {
    home.join(".gvm").join("gos")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_derive_from_base() {
        let config = Config::with_base(PathBuf::from("/tmp/gs"), Some(PathBuf::from("/home/u")));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/gs/logs"));
        assert_eq!(config.backup_dir, PathBuf::from("/tmp/gs/backups"));
        assert_eq!(
            config.home_dir.as_deref().map(gvm_dir),
            Some(PathBuf::from("/home/u/.gvm/gos"))
        );
    }

    #[test]
    fn test_log_file_named_by_run_stamp() {
        let config = Config::with_base(PathBuf::from("/tmp/gs"), None);
        let name = config.log_file().file_name().unwrap().to_string_lossy().into_owned();
        assert_eq!(name, format!("gosweep_{}.log", config.run_stamp()));
        assert_eq!(config.run_stamp().len(), "20240101_120000".len());
        assert!(config.home_dir.is_none());
    }
}
