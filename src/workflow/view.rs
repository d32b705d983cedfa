use crate::error::SweepError;
use crate::models::installation::Installation;
use crate::services::confirmation::Stage;
use crate::services::uninstaller::UninstallReport;
use crate::utils::fs::format_size;
use crate::utils::version::short_version;
use crate::workflow::controller::Phase;
use colored::{Color, Colorize};
use comfy_table::Table;
use comfy_table::presets::NOTHING;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

const SPINNER_TICK: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Title,
    Highlight,
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bg: Option<Color>,
    pub bold: bool,
    pub italic: bool,
}

const STYLES: &[(Role, Style)] = &[
    (
        Role::Title,
        Style {
            fg: Color::BrightWhite,
            bg: Some(Color::Magenta),
            bold: true,
            italic: false,
        },
    ),
    (
        Role::Highlight,
        Style {
            fg: Color::BrightBlue,
            bg: None,
            bold: true,
            italic: false,
        },
    ),
    (
        Role::Warning,
        Style {
            fg: Color::BrightRed,
            bg: None,
            bold: false,
            italic: false,
        },
    ),
    (
        Role::Success,
        Style {
            fg: Color::BrightGreen,
            bg: None,
            bold: false,
            italic: false,
        },
    ),
    (
        Role::Info,
        Style {
            fg: Color::BrightBlack,
            bg: None,
            bold: false,
            italic: true,
        },
    ),
];

pub fn style(role: Role) -> Option<Style> {
    STYLES.iter().find(|(r, _)| *r == role).map(|(_, s)| *s)
}

/// Immutable snapshot of everything the screen shows.
pub struct View<'a> {
    pub phase: Phase,
    pub installations: &'a [Installation],
    pub primary_path: Option<&'a Path>,
    pub permissions_ok: bool,
    pub dry_run: bool,
    pub stage: Stage,
    pub prompt: String,
    pub backup_dir: &'a Path,
    pub log_path: &'a Path,
    pub archives: &'a [PathBuf],
    pub report: Option<&'a UninstallReport>,
    pub error: Option<&'a SweepError>,
}

pub trait Frontend {
    fn render(&mut self, view: &View<'_>);
}

struct Painter {
    color: bool,
}

impl Painter {
    fn paint(&self, role: Role, text: &str) -> String {
        let Some(style) = style(role).filter(|_| self.color) else {
            return text.to_string();
        };
        let mut painted = text.color(style.fg);
        if let Some(bg) = style.bg {
            painted = painted.on_color(bg);
        }
        if style.bold {
            painted = painted.bold();
        }
        if style.italic {
            painted = painted.italic();
        }
        painted.to_string()
    }
}

pub fn installation_table(installations: &[Installation]) -> Table {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec!["Version", "Path", "Source", "Size", "Permissions"]);

    for install in installations {
        let version = short_version(&install.version).unwrap_or_else(|| install.version.clone());
        table.add_row(vec![
            version,
            install.path.display().to_string(),
            install.source.to_string(),
            format_size(install.size_bytes),
            install.permissions.clone(),
        ]);
    }
    table
}

pub fn busy_message(phase: Phase) -> &'static str {
    match phase {
        Phase::Loading => "Detecting Go installations...",
        Phase::CreatingBackup => "Creating safety backup...",
        Phase::Deleting => "Removing Go installations...",
        _ => "",
    }
}

/// Full text for `view`. Busy phases render only their status line.
pub fn render_text(view: &View<'_>, color: bool) -> String {
    let p = Painter { color };
    let mut s = String::new();

    match view.phase {
        Phase::Loading | Phase::CreatingBackup | Phase::Deleting => {
            s.push_str(busy_message(view.phase));
        }
        Phase::NothingFound => {
            let _ = writeln!(s, "{}", p.paint(Role::Warning, "No Go installations found!"));
            let _ = writeln!(
                s,
                "If you believe Go is installed but not detected, \
                 run this tool with admin/sudo privileges."
            );
        }
        Phase::Confirm => render_confirm(&mut s, &p, view),
        Phase::DryRunComplete => {
            let _ = writeln!(s, "{}\n", p.paint(Role::Success, "DRY RUN COMPLETED"));
            let _ = writeln!(s, "The following operations would be performed:\n");
            for install in view.installations {
                let _ = writeln!(
                    s,
                    "  Remove: {} ({})",
                    install.path.display(),
                    install.source
                );
            }
            let note = "No files were actually deleted in dry-run mode";
            let _ = writeln!(s, "\n{}", p.paint(Role::Info, note));
        }
        Phase::Complete => render_complete(&mut s, &p, view),
        Phase::Failed => {
            match view.error {
                Some(error) => {
                    let line = format!("Error: {}", error);
                    let _ = writeln!(s, "{}", p.paint(Role::Warning, &line));
                    if let Some(hint) = error.hint() {
                        let _ = writeln!(s, "Hint: {}", hint);
                    }
                }
                None => {
                    let line = "Error: unexpected internal state";
                    let _ = writeln!(s, "{}", p.paint(Role::Warning, line));
                }
            }
            if !view.archives.is_empty() {
                let _ = writeln!(s, "Backup available at: {}", view.backup_dir.display());
            }
        }
        Phase::Cancelled => {
            let _ = writeln!(s, "Operation cancelled. Nothing was deleted.");
        }
    }

    s
}

fn render_confirm(s: &mut String, p: &Painter, view: &View<'_>) {
    let header = format!("Detected {} Go installation(s):", view.installations.len());
    let _ = writeln!(s, "{}\n", p.paint(Role::Highlight, &header));
    let _ = writeln!(s, "{}\n", installation_table(view.installations));

    let total: u64 = view.installations.iter().map(|i| i.size_bytes).sum();
    let _ = writeln!(s, "Total size: {}", format_size(total));
    if let Some(primary) = view.primary_path {
        let _ = writeln!(s, "Primary installation: {}", primary.display());
    }
    let _ = writeln!(s);

    if view.permissions_ok {
        let _ = writeln!(s, "{}", p.paint(Role::Success, "Permissions check passed"));
    } else {
        let warning = "WARNING: Insufficient permissions detected!";
        let advice = "   Run with sudo/admin privileges for complete removal";
        let _ = writeln!(s, "{}", p.paint(Role::Warning, warning));
        let _ = writeln!(s, "{}", p.paint(Role::Info, advice));
    }

    if view.dry_run {
        let mode = "DRY RUN MODE ENABLED - No files will be deleted";
        let _ = writeln!(s, "{}", p.paint(Role::Highlight, mode));
    } else {
        let mode = "LIVE MODE - Files WILL be permanently deleted!";
        let _ = writeln!(s, "{}", p.paint(Role::Warning, mode));
    }

    let critical = "CRITICAL WARNING: This will delete ALL Go installations from your system!";
    let _ = writeln!(s, "\n{}", p.paint(Role::Warning, critical));
    let backup = format!("Backup location: {}", view.backup_dir.display());
    let _ = writeln!(s, "{}\n", p.paint(Role::Info, &backup));

    if let Some(n) = view.stage.number() {
        let _ = writeln!(s, "Step {}/3: {}", n, view.prompt);
    }
    let _ = write!(
        s,
        "{} to continue, {} toggle dry-run, {} to quit\n> ",
        p.paint(Role::Title, " ENTER "),
        p.paint(Role::Title, " d "),
        p.paint(Role::Title, " q ")
    );
}

fn render_complete(s: &mut String, p: &Painter, view: &View<'_>) {
    let done = "Success! All Go installations have been removed.";
    let _ = writeln!(s, "{}\n", p.paint(Role::Success, done));

    if let Some(report) = view.report {
        let _ = writeln!(s, "Removed: {}", report.removed.display());
        for path in &report.secondary_removed {
            let _ = writeln!(s, "Removed: {}", path.display());
        }
        for (path, reason) in &report.secondary_failed {
            let line = format!("Left behind: {} ({})", path.display(), reason);
            let _ = writeln!(s, "{}", p.paint(Role::Warning, &line));
        }
    }
    for archive in view.archives {
        let line = format!("Backup created at: {}", archive.display());
        let _ = writeln!(s, "{}", p.paint(Role::Info, &line));
    }
    let _ = writeln!(
        s,
        "Check logs at {} for detailed information",
        view.log_path.display()
    );
    let _ = writeln!(s, "You may need to clean up your PATH environment variable manually.");
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Line-oriented terminal. Redraws the full screen only when the phase, the
/// confirmation stage, or the dry-run flag changes. Busy phases show a spinner.
pub struct Terminal {
    color: bool,
    last: Option<(Phase, Stage, bool)>,
    spinner: Option<ProgressBar>,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            color: colored::control::SHOULD_COLORIZE.should_colorize(),
            last: None,
            spinner: None,
        }
    }

    fn spin(&mut self, message: &'static str) {
        match &self.spinner {
            Some(bar) => bar.set_message(message),
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(spinner_style());
                bar.set_message(message);
                bar.enable_steady_tick(SPINNER_TICK);
                self.spinner = Some(bar);
            }
        }
    }

    fn stop_spinner(&mut self) {
        if let Some(bar) = self.spinner.take() {
            bar.finish_and_clear();
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}

impl Frontend for Terminal {
    fn render(&mut self, view: &View<'_>) {
        let key = (view.phase, view.stage, view.dry_run);
        if self.last == Some(key) {
            return;
        }
        self.last = Some(key);

        if view.phase.is_busy() {
            self.spin(busy_message(view.phase));
            return;
        }
        self.stop_spinner();

        let mut out = io::stdout().lock();
        let _ = write!(out, "\n{}", render_text(view, self.color));
        let _ = out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::installation::{Source, UNKNOWN_VERSION};

    fn view<'a>(phase: Phase, installations: &'a [Installation]) -> View<'a> {
        View {
            phase,
            installations,
            primary_path: None,
            permissions_ok: true,
            dry_run: true,
            stage: Stage::AwaitPhrase,
            prompt: "Type 'CONFIRM' to proceed".to_string(),
            backup_dir: Path::new("/home/u/.gosweep/backups"),
            log_path: Path::new("/home/u/.gosweep/logs/gosweep_x.log"),
            archives: &[],
            report: None,
            error: None,
        }
    }

    #[test]
    fn test_nothing_found_text() {
        let text = render_text(&view(Phase::NothingFound, &[]), false);
        assert!(text.contains("No Go installations found!"));
    }

    #[test]
    fn test_confirm_lists_installations_and_step() {
        let installs = vec![Installation {
            path: PathBuf::from("/usr/local/go"),
            version: "go version go1.21.0 linux/amd64".to_string(),
            source: Source::Official,
            size_bytes: 3 * 1024 * 1024,
            permissions: "drwxr-xr-x".to_string(),
            verified: true,
        }];
        let text = render_text(&view(Phase::Confirm, &installs), false);
        assert!(text.contains("/usr/local/go"));
        assert!(text.contains("go1.21.0"));
        assert!(text.contains("3.00 MB"));
        assert!(text.contains("Step 1/3: Type 'CONFIRM' to proceed"));
        assert!(text.contains("DRY RUN MODE ENABLED"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_failed_shows_hint() {
        let error = SweepError::PermissionDenied {
            path: PathBuf::from("/usr/local/go"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        let mut v = view(Phase::Failed, &[]);
        v.error = Some(&error);
        let text = render_text(&v, false);
        assert!(text.contains("Error: insufficient permissions for /usr/local/go"));
        assert!(text.contains("Hint: "));
    }

    #[test]
    fn test_complete_lists_leftovers() {
        let report = UninstallReport {
            removed: PathBuf::from("/usr/local/go"),
            secondary_failed: vec![(PathBuf::from("/home/u/.gvm/gos/go1.9"), "busy".into())],
            ..Default::default()
        };
        let mut v = view(Phase::Complete, &[]);
        v.report = Some(&report);
        let text = render_text(&v, false);
        assert!(text.contains("Removed: /usr/local/go"));
        assert!(text.contains("Left behind: /home/u/.gvm/gos/go1.9 (busy)"));
        assert!(text.contains("PATH"));
    }

    #[test]
    fn test_busy_phase_renders_status_line() {
        let text = render_text(&view(Phase::Deleting, &[]), false);
        assert_eq!(text, "Removing Go installations...");
    }

    #[test]
    fn test_unknown_version_shown_verbatim() {
        let installs = vec![Installation {
            path: PathBuf::from("/opt/go"),
            version: UNKNOWN_VERSION.to_string(),
            source: Source::Official,
            size_bytes: 0,
            permissions: "unknown".to_string(),
            verified: true,
        }];
        let table = installation_table(&installs).to_string();
        assert!(table.contains(UNKNOWN_VERSION));
    }

    #[test]
    fn test_every_role_has_a_style() {
        let roles = [
            Role::Title,
            Role::Highlight,
            Role::Warning,
            Role::Success,
            Role::Info,
        ];
        for role in roles {
            assert!(style(role).is_some(), "{:?} has no style", role);
        }
        assert_eq!(style(Role::Warning).map(|s| s.fg), Some(Color::BrightRed));
        assert_eq!(style(Role::Title).and_then(|s| s.bg), Some(Color::Magenta));
    }

    #[test]
    fn test_plain_painter_leaves_text_alone() {
        let p = Painter { color: false };
        assert_eq!(p.paint(Role::Success, "ok"), "ok");
        assert!(Painter { color: true }.paint(Role::Success, "ok").contains("ok"));
    }

    #[test]
    fn test_default_terminal_has_drawn_nothing() {
        let mut terminal = Terminal::default();
        assert!(terminal.last.is_none());
        assert!(terminal.spinner.is_none());
        terminal.stop_spinner();
        assert!(terminal.spinner.is_none());
    }
}
