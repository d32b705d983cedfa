//! The single-threaded state machine behind the interactive run.
//!
//! Background work is requested by returning `Effect::Launch`; its result
//! comes back through `handle`. Only one job is ever in flight because every
//! launch moves the phase to one that ignores further submissions.

use crate::error::SweepError;
use crate::logging::audit::AuditLog;
use crate::models::config::Config;
use crate::models::installation::DiscoveryResult;
use crate::services::archiver::BackupFailure;
use crate::services::confirmation::{Confirmation, Stage};
use crate::services::uninstaller::UninstallReport;
use crate::utils::fs::format_size;
use crate::workflow::event::{Event, Input, Job};
use crate::workflow::view::View;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    NothingFound,
    Confirm,
    CreatingBackup,
    Deleting,
    DryRunComplete,
    Complete,
    Cancelled,
    Failed,
}

impl Phase {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Loading | Self::CreatingBackup | Self::Deleting)
    }
}

#[derive(Debug, PartialEq)]
pub enum Effect {
    Continue,
    Launch(Job),
    Exit(i32),
}

pub struct Controller {
    phase: Phase,
    confirmation: Confirmation,
    discovery: DiscoveryResult,
    audit: AuditLog,
    backup_dir: PathBuf,
    archives: Vec<PathBuf>,
    report: Option<UninstallReport>,
    error: Option<SweepError>,
    input_closed: bool,
}

impl Controller {
    pub fn new(config: &Config, dry_run: bool) -> Self {
        Self::with_confirmation(config, Confirmation::new(dry_run))
    }

    pub fn with_confirmation(config: &Config, confirmation: Confirmation) -> Self {
        Self {
            phase: Phase::Loading,
            confirmation,
            discovery: DiscoveryResult::default(),
            audit: AuditLog::for_config(config),
            backup_dir: config.backup_dir.clone(),
            archives: Vec::new(),
            report: None,
            error: None,
            input_closed: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub fn confirmation(&self) -> &Confirmation {
        &self.confirmation
    }

    pub fn start(&mut self) -> Effect {
        self.phase = Phase::Loading;
        Effect::Launch(Job::Discover)
    }

    pub fn handle(&mut self, event: Event) -> Effect {
        match event {
            Event::Input(Input::Quit) => self.cancel("User cancelled operation"),
            // EOF only ends the run once something is waiting for input.
            Event::Input(Input::Closed) => {
                if self.phase == Phase::Confirm {
                    return self.cancel("Input closed, cancelling operation");
                }
                self.input_closed = true;
                Effect::Continue
            }
            Event::Input(Input::ToggleDryRun) => {
                if self.phase == Phase::Confirm && self.confirmation.toggle_dry_run() {
                    let msg = format!("Dry run mode: {}", self.confirmation.dry_run());
                    self.audit.info(&msg);
                }
                Effect::Continue
            }
            Event::Input(Input::Submit(text)) => {
                if self.phase != Phase::Confirm {
                    return Effect::Continue;
                }
                self.on_submit(&text)
            }
            Event::Discovered(result) => self.on_discovered(result),
            Event::BackupDone(result) => self.on_backup(result),
            Event::DeleteDone(result) => self.on_delete(result),
        }
    }

    pub fn launch_failed(&mut self, error: SweepError) -> Effect {
        self.fail(error)
    }

    fn on_discovered(&mut self, mut result: DiscoveryResult) -> Effect {
        if self.phase != Phase::Loading {
            return self.unexpected("discovery result");
        }
        if let Some(error) = result.error.take() {
            return self.fail(error);
        }

        self.audit.info(&format!("Found {} Go installations", result.installations.len()));
        for install in &result.installations {
            self.audit.info(&format!(
                "Installation: {} ({}, {}, {})",
                install.path.display(),
                install.version,
                install.source,
                format_size(install.size_bytes)
            ));
        }
        if !result.permissions_ok {
            self.audit.warn("Insufficient permissions detected for system-wide installations");
        }

        let empty = result.installations.is_empty();
        self.discovery = result;
        if empty {
            self.phase = Phase::NothingFound;
            Effect::Exit(0)
        } else if self.input_closed {
            self.cancel("Input closed, cancelling operation")
        } else {
            self.phase = Phase::Confirm;
            Effect::Continue
        }
    }

    fn on_submit(&mut self, text: &str) -> Effect {
        let step = self.confirmation.stage().number().unwrap_or(0);
        match self.confirmation.submit(text) {
            Stage::AwaitToken => {
                self.audit.info("First confirmation step passed");
                Effect::Continue
            }
            Stage::AwaitFinalPhrase => {
                self.audit.info("Second confirmation step passed");
                Effect::Continue
            }
            Stage::DryRunComplete => {
                self.audit.info("Third confirmation step passed, all confirmations complete");
                self.audit.success("Dry run completed, no files were deleted");
                self.phase = Phase::DryRunComplete;
                Effect::Exit(0)
            }
            Stage::BackupPending => {
                self.audit.info("Third confirmation step passed, proceeding with backup");
                self.phase = Phase::CreatingBackup;
                Effect::Launch(Job::Backup {
                    installations: self.discovery.installations.clone(),
                })
            }
            Stage::Aborted => {
                self.audit.info(&format!("Confirmation step {} did not match, aborting", step));
                self.phase = Phase::Cancelled;
                Effect::Exit(0)
            }
            Stage::AwaitPhrase => self.unexpected("confirmation reset"),
        }
    }

    fn on_backup(&mut self, result: Result<Vec<PathBuf>, BackupFailure>) -> Effect {
        if self.phase != Phase::CreatingBackup {
            return self.unexpected("backup result");
        }

        match result {
            Ok(archives) => {
                self.audit.success(&format!(
                    "Backup created at: {} ({} archive(s))",
                    self.backup_dir.display(),
                    archives.len()
                ));
                self.archives = archives;
            }
            Err(failure) => {
                self.audit.error(&format!(
                    "Backup failed: {} ({} archive(s) kept)",
                    failure.error,
                    failure.completed.len()
                ));
                self.archives = failure.completed;
                self.error = Some(failure.error);
                self.phase = Phase::Failed;
                return Effect::Exit(1);
            }
        }

        let Some(primary) = self.discovery.primary_path.clone() else {
            return self.unexpected("missing primary path");
        };
        self.phase = Phase::Deleting;
        Effect::Launch(Job::Delete {
            primary,
            version_manager_dirs: self.discovery.version_manager_paths(),
        })
    }

    fn on_delete(&mut self, result: Result<UninstallReport, SweepError>) -> Effect {
        if self.phase != Phase::Deleting {
            return self.unexpected("delete result");
        }

        match result {
            Ok(report) => {
                for (path, reason) in &report.secondary_failed {
                    self.audit.warn(&format!("Could not remove {}: {}", path.display(), reason));
                }
                self.audit.success("Go uninstallation completed successfully");
                self.report = Some(report);
                self.phase = Phase::Complete;
                Effect::Exit(0)
            }
            Err(error) => {
                self.audit.error(&format!("Go uninstallation failed: {}", error));
                self.error = Some(error);
                self.phase = Phase::Failed;
                Effect::Exit(1)
            }
        }
    }

    fn cancel(&mut self, reason: &str) -> Effect {
        self.audit.info(reason);
        self.phase = Phase::Cancelled;
        Effect::Exit(0)
    }

    fn fail(&mut self, error: SweepError) -> Effect {
        self.audit.error(&error.to_string());
        self.error = Some(error);
        self.phase = Phase::Failed;
        Effect::Exit(1)
    }

    fn unexpected(&mut self, what: &str) -> Effect {
        self.audit.error(&format!("Unexpected {} in phase {:?}", what, self.phase));
        self.phase = Phase::Failed;
        Effect::Exit(1)
    }

    pub fn view(&self) -> View<'_> {
        View {
            phase: self.phase,
            installations: &self.discovery.installations,
            primary_path: self.discovery.primary_path.as_deref(),
            permissions_ok: self.discovery.permissions_ok,
            dry_run: self.confirmation.dry_run(),
            stage: self.confirmation.stage(),
            prompt: self.confirmation.prompt(),
            backup_dir: &self.backup_dir,
            log_path: self.audit.path(),
            archives: &self.archives,
            report: self.report.as_ref(),
            error: self.error.as_ref(),
        }
    }
}
