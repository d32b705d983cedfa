use crate::error::SweepError;
use crate::models::installation::{DiscoveryResult, Installation};
use crate::services::archiver::BackupFailure;
use crate::services::uninstaller::UninstallReport;
use std::path::PathBuf;

/// A line typed by the user, or the end of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Quit,
    ToggleDryRun,
    Submit(String),
    /// Standard input reached EOF. Never produced by `parse`.
    Closed,
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("q") {
            Self::Quit
        } else if trimmed == "d" {
            Self::ToggleDryRun
        } else {
            Self::Submit(trimmed.to_string())
        }
    }
}

/// Everything the control loop reacts to.
#[derive(Debug)]
pub enum Event {
    Discovered(DiscoveryResult),
    BackupDone(Result<Vec<PathBuf>, BackupFailure>),
    DeleteDone(Result<UninstallReport, SweepError>),
    Input(Input),
}

/// Long-running work handed to a background thread. Each job owns its data.
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    Discover,
    Backup { installations: Vec<Installation> },
    Delete {
        primary: PathBuf,
        version_manager_dirs: Vec<PathBuf>,
    },
}

impl Job {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::Backup { .. } => "backup",
            Self::Delete { .. } => "delete",
        }
    }
}
