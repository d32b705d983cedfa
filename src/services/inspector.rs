use crate::models::installation::{Installation, Source, UNKNOWN_VERSION};
use crate::models::types::OsFamily;
use crate::services::guard::is_critical;
use crate::services::prober::{Candidate, CandidateKind, GO_PREFIX};
use crate::utils::fs::{compute_size, permissions};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct InstallationInspector {
    os: OsFamily,
}

impl InstallationInspector {
    pub fn new(os: OsFamily) -> Self {
        Self { os }
    }

    /// Builds the record for `path`, or `None` if it is not an existing
    /// directory or is a critical system path.
    pub fn inspect(&self, path: &Path, source: Source) -> Option<Installation> {
        if is_critical(path) {
            log::info!("skipping critical path {}", path.display());
            return None;
        }
        match fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                log::debug!("probe {}: not a directory", path.display());
                return None;
            }
            Err(_) => return None,
        }

        Some(Installation {
            path: path.to_path_buf(),
            version: self.version(path),
            source,
            size_bytes: compute_size(path),
            permissions: permissions(path),
            verified: true,
        })
    }

    /// `bin/go version`, then the `VERSION` marker, then the unknown sentinel.
    pub fn version(&self, root: &Path) -> String {
        let go_exec = root.join("bin").join(self.os.go_executable());
        if go_exec.is_file() {
            match Command::new(&go_exec).arg("version").output() {
                Ok(output) if output.status.success() => {
                    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
                    if !version.is_empty() {
                        return version;
                    }
                }
                Ok(output) => {
                    log::debug!("{} version: exited with {}", go_exec.display(), output.status)
                }
                Err(e) => log::debug!("{} version: {}", go_exec.display(), e),
            }
        }

        if let Ok(data) = fs::read_to_string(root.join("VERSION")) {
            if let Some(line) = data.lines().map(str::trim).find(|l| !l.is_empty()) {
                return format!("go version {}", line);
            }
        }

        UNKNOWN_VERSION.to_string()
    }

    /// Child directories of `dir` whose names start with `prefix`, sorted by name.
    pub fn list_children(&self, dir: &Path, prefix: &str) -> Vec<PathBuf> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut children: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
            .map(|entry| entry.path())
            .collect();
        children.sort();
        children
    }

    /// Installations managed by gvm under `gos_dir`.
    pub fn version_manager_installations(&self, gos_dir: &Path) -> Vec<Installation> {
        self.children_installations(gos_dir, GO_PREFIX, Source::VersionManager)
    }

    fn children_installations(
        &self,
        dir: &Path,
        prefix: &str,
        source: Source,
    ) -> Vec<Installation> {
        self.list_children(dir, prefix)
            .iter()
            .filter_map(|path| self.inspect(path, source))
            .collect()
    }

    /// Inspects every candidate in order.
    ///
    /// Critical paths are dropped, and a path reached twice (directly or
    /// through a symlink) is kept only at its first occurrence.
    pub fn detect_installations(&self, candidates: &[Candidate]) -> Vec<Installation> {
        let mut seen = HashSet::new();
        let mut installations = Vec::new();

        for candidate in candidates {
            let found: Vec<Installation> = match candidate.kind {
                CandidateKind::Root => self
                    .inspect(&candidate.path, candidate.source)
                    .into_iter()
                    .collect(),
                CandidateKind::Container { prefix }
                    if candidate.source == Source::VersionManager && prefix == GO_PREFIX =>
                {
                    self.version_manager_installations(&candidate.path)
                }
                CandidateKind::Container { prefix } => {
                    self.children_installations(&candidate.path, prefix, candidate.source)
                }
            };

            for install in found {
                let key = fs::canonicalize(&install.path).unwrap_or_else(|_| install.path.clone());
                if !seen.insert(key) {
                    log::debug!("probe {}: already discovered", install.path.display());
                    continue;
                }
                installations.push(install);
            }
        }

        installations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn inspector() -> InstallationInspector {
        InstallationInspector::new(OsFamily::default())
    }

    fn fake_root(base: &Path, name: &str, version: Option<&str>) -> PathBuf {
        let root = base.join(name);
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/main.go"), b"package main\n").unwrap();
        if let Some(v) = version {
            fs::write(root.join("VERSION"), format!("{}\ntime 2024-01-01\n", v)).unwrap();
        }
        root
    }

    #[test]
    fn test_version_of_missing_path_is_unknown() {
        assert_eq!(inspector().version(Path::new("/non/existent/path")), UNKNOWN_VERSION);
    }

    #[test]
    fn test_version_falls_back_to_marker_file() {
        let dir = TempDir::new().unwrap();
        let root = fake_root(dir.path(), "go", Some("go1.21.5"));
        assert_eq!(inspector().version(&root), "go version go1.21.5");
    }

    #[test]
    fn test_inspect_rejects_non_directories() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("go");
        fs::write(&file, b"not a dir").unwrap();

        assert!(inspector().inspect(&file, Source::Official).is_none());
        assert!(inspector().inspect(&dir.path().join("missing"), Source::Official).is_none());
    }

    #[test]
    fn test_inspect_fills_every_field() {
        let dir = TempDir::new().unwrap();
        let root = fake_root(dir.path(), "go", None);
        let install = inspector().inspect(&root, Source::PackageManager).unwrap();

        assert_eq!(install.path, root);
        assert_eq!(install.version, UNKNOWN_VERSION);
        assert_eq!(install.source, Source::PackageManager);
        assert!(install.size_bytes >= b"package main\n".len() as u64);
        assert_ne!(install.permissions, "unknown");
        assert!(install.verified);
    }

    #[test]
    fn test_version_manager_entries_filtered_by_prefix() {
        let dir = TempDir::new().unwrap();
        fake_root(dir.path(), "go1.20", Some("go1.20"));
        fake_root(dir.path(), "go1.21", Some("go1.21"));
        fake_root(dir.path(), "other", None);
        fs::write(dir.path().join("go-notes.txt"), b"x").unwrap();

        let installs = inspector().version_manager_installations(dir.path());
        let names: Vec<_> = installs
            .iter()
            .map(|i| i.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["go1.20", "go1.21"]);
        assert!(installs.iter().all(|i| i.source == Source::VersionManager));
    }

    #[test]
    fn test_detect_installations_in_candidate_order() {
        let dir = TempDir::new().unwrap();
        let official = fake_root(dir.path(), "go", Some("go1.22.0"));
        let gos = dir.path().join("gvm");
        fake_root(&gos, "go1.19", None);

        let candidates = vec![
            Candidate {
                path: official.clone(),
                source: Source::Official,
                kind: CandidateKind::Root,
            },
            Candidate {
                path: dir.path().join("absent"),
                source: Source::PackageManager,
                kind: CandidateKind::Root,
            },
            Candidate {
                path: gos.clone(),
                source: Source::VersionManager,
                kind: CandidateKind::Container { prefix: "go" },
            },
        ];

        let installs = inspector().detect_installations(&candidates);
        assert_eq!(installs.len(), 2);
        assert_eq!(installs[0].path, official);
        assert_eq!(installs[1].path, gos.join("go1.19"));
        assert!(installs.iter().all(|i| i.verified && !is_critical(&i.path)));
    }

    #[test]
    fn test_detect_installations_deduplicates_paths() {
        let dir = TempDir::new().unwrap();
        let root = fake_root(dir.path(), "go", None);
        let candidates = vec![
            Candidate {
                path: root.clone(),
                source: Source::Official,
                kind: CandidateKind::Root,
            },
            Candidate {
                path: root.clone(),
                source: Source::PackageManager,
                kind: CandidateKind::Root,
            },
        ];

        let installs = inspector().detect_installations(&candidates);
        assert_eq!(installs.len(), 1);
        assert_eq!(installs[0].source, Source::Official);
    }

    #[test]
    fn test_detect_installations_never_returns_critical() {
        let candidates = vec![Candidate {
            path: PathBuf::from("/"),
            source: Source::Official,
            kind: CandidateKind::Root,
        }];
        assert!(inspector().detect_installations(&candidates).is_empty());
    }
}
