use crate::models::config::Config;
use chrono::Local;
use std::fmt::{self, Display};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Info,
    Warn,
    Error,
    Success,
}

impl AuditLevel {
    /// Level of the console copy. The screen already shows every entry that
    /// matters to the user, so the copy is for `--debug` runs only.
    fn console_level(&self) -> log::Level {
        match self {
            Self::Info | Self::Success => log::Level::Trace,
            Self::Warn | Self::Error => log::Level::Debug,
        }
    }
}

impl Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Success => write!(f, "SUCCESS"),
        }
    }
}

/// Append-only record of one run. The file is created on the first entry.
///
/// Write errors never reach the caller; the first one is reported through
/// `log` and later entries keep trying.
pub struct AuditLog {
    path: PathBuf,
    file: Option<File>,
    reported: bool,
}

impl AuditLog {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            file: None,
            reported: false,
        }
    }

    pub fn for_config(config: &Config) -> Self {
        Self::new(config.log_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log(&mut self, level: AuditLevel, message: &str) {
        log::log!(level.console_level(), "audit {}: {}", level, message);

        let line = format!(
            "[{}] {}: {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level,
            message
        );
        if let Err(e) = self.append(&line) {
            self.file = None;
            if !self.reported {
                log::debug!("audit log {} unavailable: {}", self.path.display(), e);
                self.reported = true;
            }
        }
    }

    pub fn info(&mut self, message: &str) {
        self.log(AuditLevel::Info, message);
    }

    pub fn warn(&mut self, message: &str) {
        self.log(AuditLevel::Warn, message);
    }

    pub fn error(&mut self, message: &str) {
        self.log(AuditLevel::Error, message);
    }

    pub fn success(&mut self, message: &str) {
        self.log(AuditLevel::Success, message);
    }

    fn append(&mut self, line: &str) -> io::Result<()> {
        if self.file.is_none() {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            self.file = Some(file);
        }

        if let Some(file) = self.file.as_mut() {
            file.write_all(line.as_bytes())?;
            file.sync_data()?;
        }
        Ok(())
    }
}
