use crate::error::SweepError;
use crate::models::config::Config;
use crate::models::installation::{DiscoveryResult, Installation};
use crate::models::types::OsFamily;
use crate::services::guard::is_critical;
use crate::services::inspector::InstallationInspector;
use crate::services::permissions::PermissionValidator;
use crate::services::prober::{locate_go, PathProber, ProbeEnv};
use std::path::{Path, PathBuf};

/// One full discovery pass against the live host.
pub fn discover(config: &Config) -> DiscoveryResult {
    let env = ProbeEnv::from_config(config);
    let os = env.os;
    let located = locate_go(os);
    log::debug!("active go binary: {:?}", located);
    discover_with(env, located.as_deref(), &PermissionValidator::detect(os))
}

/// Discovery with the host facts supplied by the caller.
pub fn discover_with(
    env: ProbeEnv,
    located: Option<&Path>,
    validator: &PermissionValidator,
) -> DiscoveryResult {
    let os = env.os;
    let prober = PathProber::new(env);

    let candidates = match prober.candidate_paths(located) {
        Ok(candidates) => candidates,
        Err(e) => return DiscoveryResult::vetoed(e),
    };
    // Already validated by `candidate_paths`.
    let derived = prober.derived_root(located).ok().flatten();

    let installations = InstallationInspector::new(os).detect_installations(&candidates);

    let primary_path = choose_primary(&prober, derived, &installations);
    if let Some(primary) = &primary_path {
        if is_critical(primary) {
            return DiscoveryResult::vetoed(SweepError::CriticalPath(primary.clone()));
        }
    }

    let permissions_ok = match validator.check_default(os) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("permission check: {}", e);
            false
        }
    };

    DiscoveryResult {
        installations,
        primary_path,
        permissions_ok,
        error: None,
    }
}

/// The single path the uninstaller targets first.
///
/// Preference: the active toolchain's root, the Homebrew cellar on macOS,
/// the first existing official root, then the first discovered installation.
fn choose_primary(
    prober: &PathProber,
    derived: Option<PathBuf>,
    installations: &[Installation],
) -> Option<PathBuf> {
    if derived.is_some() {
        return derived;
    }

    if prober.os() == OsFamily::MacOS {
        if let Some(cellar) = prober.homebrew_cellars().into_iter().find(|p| p.is_dir()) {
            return Some(cellar);
        }
    }

    prober
        .official_roots()
        .into_iter()
        .find(|p| p.is_dir())
        .or_else(|| installations.first().map(|i| i.path.clone()))
}
