use crate::error::SweepError;
use serde::Serialize;
use std::fmt::{self, Display};
use std::path::PathBuf;

pub const UNKNOWN_VERSION: &str = "unknown version";
pub const UNKNOWN_PERMISSIONS: &str = "unknown";

/// Where an installation came from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    Official,
    VersionManager,
    PackageManager,
    Homebrew,
}

impl Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Official => write!(f, "official"),
            Self::VersionManager => write!(f, "version-manager"),
            Self::PackageManager => write!(f, "package-manager"),
            Self::Homebrew => write!(f, "homebrew"),
        }
    }
}

/// One discovered Go toolchain. Built by the inspector, never mutated afterwards.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Installation {
    pub path: PathBuf,
    pub version: String,
    pub source: Source,
    pub size_bytes: u64,
    pub permissions: String,
    pub verified: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct DiscoveryResult {
    pub installations: Vec<Installation>,
    pub primary_path: Option<PathBuf>,
    pub permissions_ok: bool,
    #[serde(skip)]
    pub error: Option<SweepError>,
}

impl DiscoveryResult {
    pub fn vetoed(error: SweepError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn total_size(&self) -> u64 {
        self.installations.iter().map(|i| i.size_bytes).sum()
    }

    pub fn version_manager_paths(&self) -> Vec<PathBuf> {
        self.installations
            .iter()
            .filter(|i| i.source == Source::VersionManager)
            .map(|i| i.path.clone())
            .collect()
    }
}
