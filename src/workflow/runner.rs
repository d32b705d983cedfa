use crate::error::SweepError;
use crate::models::config::Config;
use crate::services::archiver::BackupArchiver;
use crate::services::discovery::discover;
use crate::services::uninstaller::Uninstaller;
use crate::workflow::event::{Event, Job};
use std::sync::mpsc::Sender;
use std::thread;

pub trait JobRunner {
    /// Starts `job` and returns at once; the result arrives later as an `Event`.
    fn launch(&mut self, job: Job) -> Result<(), SweepError>;
}

/// Runs each job on its own named thread and posts the outcome back.
pub struct ThreadRunner {
    config: Config,
    verify_backups: bool,
    tx: Sender<Event>,
}

impl ThreadRunner {
    pub fn new(config: Config, verify_backups: bool, tx: Sender<Event>) -> Self {
        Self {
            config,
            verify_backups,
            tx,
        }
    }
}

impl JobRunner for ThreadRunner {
    fn launch(&mut self, job: Job) -> Result<(), SweepError> {
        let config = self.config.clone();
        let verify = self.verify_backups;
        let tx = self.tx.clone();
        let name = format!("gosweep-{}", job.name());

        thread::Builder::new()
            .name(name)
            .spawn(move || {
                let event = execute(job, &config, verify);
                // The receiver is gone only when the user already quit.
                let _ = tx.send(event);
            })
            .map(|_| ())
            .map_err(|e| SweepError::Spawn(e.to_string()))
    }
}

pub fn execute(job: Job, config: &Config, verify_backups: bool) -> Event {
    match job {
        Job::Discover => Event::Discovered(discover(config)),
        Job::Backup { installations } => {
            let archiver = BackupArchiver::new(config.backup_dir.clone(), config.run_stamp());
            let archiver = if verify_backups {
                archiver
            } else {
                archiver.without_verification()
            };
            Event::BackupDone(archiver.backup(&installations))
        }
        Job::Delete { primary, version_manager_dirs } => {
            Event::DeleteDone(Uninstaller::uninstall(&primary, &version_manager_dirs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_delete_job_reports_back_over_channel() {
        let dir = TempDir::new().unwrap();
        let primary = dir.path().join("go");
        fs::create_dir_all(primary.join("bin")).unwrap();

        let config = Config::with_base(dir.path().join("state"), None);
        let (tx, rx) = mpsc::channel();
        let mut runner = ThreadRunner::new(config, true, tx);
        runner
            .launch(Job::Delete {
                primary: primary.clone(),
                version_manager_dirs: vec![],
            })
            .unwrap();

        match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
            Event::DeleteDone(Ok(report)) => assert_eq!(report.removed, primary),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(!primary.exists());
    }

    #[test]
    fn test_backup_job_without_verification() {
        let dir = TempDir::new().unwrap();
        let config = Config::with_base(dir.path().join("state"), None);

        match execute(Job::Backup { installations: vec![] }, &config, false) {
            Event::BackupDone(Ok(archives)) => assert!(archives.is_empty()),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(config.backup_dir.is_dir());
    }
}
