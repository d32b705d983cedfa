use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub const PRIVILEGE_HINT: &str = "re-run with elevated privileges (sudo / administrator)";

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("refusing to operate on critical system directory: {}", .0.display())]
    CriticalPath(PathBuf),

    #[error("derived path does not appear to be a Go installation: {}", .0.display())]
    NotAnInstallation(PathBuf),

    #[error("insufficient permissions for {}: {source}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("backup of {} failed: {message}", path.display())]
    Backup { path: PathBuf, message: String },

    #[error("failed to remove {}: {source}", path.display())]
    Removal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to start background operation: {0}")]
    Spawn(String),
}

impl SweepError {
    /// Remediation text shown next to the error when privileges are the likely cause.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::PermissionDenied { .. } => Some(PRIVILEGE_HINT),
            Self::Removal { source, .. } if source.kind() == io::ErrorKind::PermissionDenied => {
                Some(PRIVILEGE_HINT)
            }
            Self::Backup { message, .. } if mentions_permission(message) => Some(PRIVILEGE_HINT),
            _ => None,
        }
    }
}

/// `tar` and io errors both spell it "Permission denied".
fn mentions_permission(message: &str) -> bool {
    message.to_ascii_lowercase().contains("permission denied")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_path_message_names_path() {
        let err = SweepError::CriticalPath(PathBuf::from("/usr"));
        assert_eq!(
            err.to_string(),
            "refusing to operate on critical system directory: /usr"
        );
        assert!(err.hint().is_none());
    }

    #[test]
    fn test_permission_errors_carry_hint() {
        let err = SweepError::PermissionDenied {
            path: PathBuf::from("/usr/local/go"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.hint(), Some(PRIVILEGE_HINT));

        let err = SweepError::Removal {
            path: PathBuf::from("/usr/local/go"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.hint(), Some(PRIVILEGE_HINT));

        let err = SweepError::Removal {
            path: PathBuf::from("/usr/local/go"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.hint().is_none());
    }

    #[test]
    fn test_backup_hint_only_for_permission_failures() {
        let denied = SweepError::Backup {
            path: PathBuf::from("/usr/local/go"),
            message: "tar exited with exit status: 2: tar: go/pkg: Cannot open: Permission denied"
                .to_string(),
        };
        assert_eq!(denied.hint(), Some(PRIVILEGE_HINT));

        let missing_tar = SweepError::Backup {
            path: PathBuf::from("/usr/local/go"),
            message: format!("cannot run tar: {}", io::Error::from(io::ErrorKind::NotFound)),
        };
        assert!(missing_tar.hint().is_none());

        let corrupt = SweepError::Backup {
            path: PathBuf::from("/usr/local/go"),
            message: "Corrupt archive entry".to_string(),
        };
        assert!(corrupt.hint().is_none());
    }
}
