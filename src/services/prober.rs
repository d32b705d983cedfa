use crate::error::SweepError;
use crate::models::config::{gvm_dir, Config};
use crate::models::installation::Source;
use crate::models::types::OsFamily;
use crate::services::guard::is_critical;
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Version-manager and toolchain directories all share this name prefix.
pub const GO_PREFIX: &str = "go";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// The path itself is an installation root.
    Root,
    /// Every child directory whose name starts with `prefix` is a root.
    Container { prefix: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub source: Source,
    pub kind: CandidateKind,
}

impl Candidate {
    fn root<P: Into<PathBuf>>(path: P, source: Source) -> Self {
        Self {
            path: path.into(),
            source,
            kind: CandidateKind::Root,
        }
    }

    fn container<P: Into<PathBuf>>(path: P, source: Source, prefix: &'static str) -> Self {
        Self {
            path: path.into(),
            source,
            kind: CandidateKind::Container { prefix },
        }
    }
}

/// Host facts the probe lists are derived from.
#[derive(Debug, Clone, Default)]
pub struct ProbeEnv {
    pub os: OsFamily,
    pub home: Option<PathBuf>,
    pub user_profile: Option<PathBuf>,
    pub program_files: Option<PathBuf>,
}

impl ProbeEnv {
    pub fn from_config(config: &Config) -> Self {
        Self {
            os: config.os,
            home: config.home_dir.clone(),
            user_profile: env::var_os("USERPROFILE").map(PathBuf::from),
            program_files: env::var_os("ProgramFiles").map(PathBuf::from),
        }
    }
}

pub struct PathProber {
    env: ProbeEnv,
}

impl PathProber {
    pub fn new(env: ProbeEnv) -> Self {
        Self { env }
    }

    pub fn os(&self) -> OsFamily {
        self.env.os
    }

    pub fn official_roots(&self) -> Vec<PathBuf> {
        match self.env.os {
            OsFamily::Windows => {
                let mut roots = Vec::new();
                if let Some(profile) = &self.env.user_profile {
                    roots.push(profile.join("go"));
                }
                if let Some(program_files) = &self.env.program_files {
                    roots.push(program_files.join("Go"));
                }
                roots.push(PathBuf::from("C:\\Go"));
                roots
            }
            OsFamily::MacOS => vec![PathBuf::from("/usr/local/go"), PathBuf::from("/opt/go")],
            OsFamily::Linux => vec![
                PathBuf::from("/usr/local/go"),
                PathBuf::from("/opt/go"),
                PathBuf::from("/usr/lib/go"),
            ],
        }
    }

    pub fn package_manager_roots(&self) -> Vec<PathBuf> {
        match self.env.os {
            OsFamily::Linux => vec![
                PathBuf::from("/usr/lib/golang"),
                PathBuf::from("/usr/share/golang"),
                PathBuf::from("/snap/go/current"),
            ],
            _ => Vec::new(),
        }
    }

    pub fn homebrew_cellars(&self) -> Vec<PathBuf> {
        match self.env.os {
            OsFamily::MacOS => vec![
                PathBuf::from("/usr/local/Cellar/go"),
                PathBuf::from("/opt/homebrew/Cellar/go"),
            ],
            _ => Vec::new(),
        }
    }

    pub fn version_manager_dir(&self) -> Option<PathBuf> {
        self.env.home.as_deref().map(gvm_dir)
    }

    /// The well-known locations for this OS family, in probe order.
    pub fn static_candidates(&self) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .official_roots()
            .into_iter()
            .map(|p| Candidate::root(p, Source::Official))
            .collect();

        if let Some(gvm) = self.version_manager_dir() {
            candidates.push(Candidate::container(gvm, Source::VersionManager, GO_PREFIX));
        }

        candidates.extend(
            self.package_manager_roots()
                .into_iter()
                .map(|p| Candidate::root(p, Source::PackageManager)),
        );
        candidates.extend(
            self.homebrew_cellars()
                .into_iter()
                .map(|p| Candidate::container(p, Source::Homebrew, "")),
        );
        candidates
    }

    pub fn derived_root(&self, located: Option<&Path>) -> Result<Option<PathBuf>, SweepError> {
        Ok(located
            .map(|binary| derive_root(binary, self.env.os))
            .transpose()?
            .flatten())
    }

    fn candidates_with(&self, derived: Option<PathBuf>) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        if let Some(root) = derived {
            candidates.push(Candidate::root(root, Source::Official));
        }
        candidates.extend(self.static_candidates());
        candidates
    }

    /// Static candidates preceded by the root derived from the active `go`
    /// binary, when one was located.
    pub fn candidate_paths(&self, located: Option<&Path>) -> Result<Vec<Candidate>, SweepError> {
        Ok(self.candidates_with(self.derived_root(located)?))
    }
}

/// Strips `bin/go` from the located binary to get its installation root.
///
/// Returns `Ok(None)` when the binary does not sit in a `bin` directory. A
/// root that is critical, or whose text does not mention `go`, is an error.
pub fn derive_root(binary: &Path, os: OsFamily) -> Result<Option<PathBuf>, SweepError> {
    let text = binary.to_string_lossy();
    let suffix = if os.is_windows() { "\\bin\\go.exe" } else { "/bin/go" };

    let root = if os.is_windows() {
        let lower = text.to_ascii_lowercase();
        match lower.strip_suffix(suffix) {
            Some(stripped) => &text[..stripped.len()],
            None => return Ok(None),
        }
    } else {
        match text.strip_suffix(suffix) {
            Some(stripped) => stripped,
            None => return Ok(None),
        }
    };

    let root = PathBuf::from(root);
    if is_critical(&root) {
        return Err(SweepError::CriticalPath(root));
    }
    if !root.to_string_lossy().to_lowercase().contains(GO_PREFIX) {
        return Err(SweepError::NotAnInstallation(root));
    }
    Ok(Some(root))
}

/// Asks the platform path resolver where `go` lives. Any failure means "not found".
pub fn locate_go(os: OsFamily) -> Option<PathBuf> {
    let resolver = if os.is_windows() { "where" } else { "which" };
    let output = match Command::new(resolver).arg("go").output() {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            log::debug!("{} go: exited with {}", resolver, output.status);
            return None;
        }
        Err(e) => {
            log::debug!("{} go: {}", resolver, e);
            return None;
        }
    };

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prober(os: OsFamily) -> PathProber {
        PathProber::new(ProbeEnv {
            os,
            home: Some(PathBuf::from("/home/u")),
            user_profile: Some(PathBuf::from("C:\\Users\\u")),
            program_files: Some(PathBuf::from("C:\\Program Files")),
        })
    }

    #[test]
    fn test_linux_candidates() {
        let candidates = prober(OsFamily::Linux).static_candidates();
        let paths: Vec<_> = candidates.iter().map(|c| c.path.clone()).collect();
        assert_eq!(paths[0], PathBuf::from("/usr/local/go"));
        assert!(paths.contains(&PathBuf::from("/usr/lib/golang")));
        assert!(paths.contains(&PathBuf::from("/home/u/.gvm/gos")));
        assert!(candidates.iter().all(|c| c.source != Source::Homebrew));

        let gvm = candidates.iter().find(|c| c.source == Source::VersionManager).unwrap();
        assert_eq!(gvm.kind, CandidateKind::Container { prefix: "go" });
    }

    #[test]
    fn test_macos_candidates_include_cellars() {
        let candidates = prober(OsFamily::MacOS).static_candidates();
        let brew: Vec<_> = candidates.iter().filter(|c| c.source == Source::Homebrew).collect();
        assert_eq!(brew.len(), 2);
        assert!(brew.iter().all(|c| c.kind == CandidateKind::Container { prefix: "" }));
        assert!(candidates.iter().all(|c| c.source != Source::PackageManager));
    }

    #[test]
    fn test_windows_official_roots() {
        let roots = prober(OsFamily::Windows).official_roots();
        assert_eq!(roots.last(), Some(&PathBuf::from("C:\\Go")));
        assert_eq!(roots.len(), 3);
    }

    #[test]
    fn test_no_home_means_no_version_manager() {
        let p = PathProber::new(ProbeEnv { os: OsFamily::Linux, ..Default::default() });
        assert!(p.static_candidates().iter().all(|c| c.source != Source::VersionManager));
    }

    #[test]
    fn test_derive_root() {
        let root = derive_root(Path::new("/usr/local/go/bin/go"), OsFamily::Linux).unwrap();
        assert_eq!(root, Some(PathBuf::from("/usr/local/go")));

        let root = derive_root(Path::new("/home/u/sdk/go1.22/bin/go"), OsFamily::Linux).unwrap();
        assert_eq!(root, Some(PathBuf::from("/home/u/sdk/go1.22")));

        assert_eq!(derive_root(Path::new("/usr/local/bin/golang"), OsFamily::Linux).unwrap(), None);
    }

    #[test]
    fn test_derive_root_rejects_critical() {
        let err = derive_root(Path::new("/usr/bin/go"), OsFamily::Linux).unwrap_err();
        assert!(matches!(err, SweepError::CriticalPath(ref p) if p == Path::new("/usr")));
        assert!(err.to_string().contains("/usr"));
    }

    #[test]
    fn test_derive_root_rejects_unrelated_dir() {
        let err = derive_root(Path::new("/srv/tools/bin/go"), OsFamily::Linux).unwrap_err();
        assert!(matches!(err, SweepError::NotAnInstallation(_)));
    }

    #[test]
    fn test_derive_root_windows() {
        let root = derive_root(Path::new("C:\\Go\\bin\\go.exe"), OsFamily::Windows).unwrap();
        assert_eq!(root, Some(PathBuf::from("C:\\Go")));
    }

    #[test]
    fn test_candidate_paths_puts_derived_first() {
        let p = prober(OsFamily::Linux);
        let candidates = p.candidate_paths(Some(Path::new("/opt/go1.21/bin/go"))).unwrap();
        assert_eq!(candidates[0].path, PathBuf::from("/opt/go1.21"));
        assert_eq!(candidates.len(), p.static_candidates().len() + 1);

        assert!(p.candidate_paths(Some(Path::new("/usr/bin/go"))).is_err());
        assert_eq!(p.candidate_paths(None).unwrap(), p.static_candidates());
    }
}
