//! Deny-list of directories that must never be treated as an installation root.
//!
//! Matching is exact after lexical normalization: `/usr` is critical,
//! `/usr/local/go` is not. Both the unix and the Windows entries are checked on
//! every host so a path string can never slip through because of where the
//! binary happens to run.

use std::path::Path;

const UNIX_CRITICAL: &[&str] = &["/", "/usr", "/bin", "/etc", "/home", "/root", "/var", "/opt"];

const WINDOWS_CRITICAL: &[&str] = &["C:\\", "C:\\Windows", "C:\\Program Files", "C:\\Users"];

pub fn is_critical<P: AsRef<Path>>(path: P) -> bool {
    let normalized = normalize(path);
    if is_windows_style(&normalized) {
        WINDOWS_CRITICAL
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&normalized))
    } else {
        UNIX_CRITICAL.iter().any(|c| *c == normalized)
    }
}

/// Lexical normalization: drops `.` and empty components, resolves `..`,
/// strips trailing separators. Never touches the filesystem.
pub fn normalize<P: AsRef<Path>>(path: P) -> String {
    let raw = path.as_ref().to_string_lossy();
    if is_windows_style(&raw) {
        normalize_windows(&raw)
    } else {
        normalize_unix(&raw)
    }
}

fn is_windows_style(raw: &str) -> bool {
    has_drive_prefix(raw) || raw.contains('\\')
}

fn has_drive_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn fold_components<'a>(parts: impl Iterator<Item = &'a str>, absolute: bool) -> Vec<&'a str> {
    let mut stack: Vec<&str> = Vec::new();
    for part in parts {
        match part {
            "" | "." => {}
            ".." => {
                if stack.last().is_some_and(|last| *last != "..") {
                    stack.pop();
                } else if !absolute {
                    stack.push("..");
                }
            }
            other => stack.push(other),
        }
    }
    stack
}

fn normalize_unix(raw: &str) -> String {
    let absolute = raw.starts_with('/');
    let parts = fold_components(raw.split('/'), absolute);
    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

fn normalize_windows(raw: &str) -> String {
    let (drive, rest) = if has_drive_prefix(raw) {
        (Some(raw[..2].to_ascii_uppercase()), &raw[2..])
    } else {
        (None, raw)
    };
    let absolute = rest.starts_with(['\\', '/']);
    let parts = fold_components(rest.split(['\\', '/']), absolute);
    let joined = parts.join("\\");

    let mut out = drive.unwrap_or_default();
    if absolute {
        out.push('\\');
    }
    out.push_str(&joined);
    if out.is_empty() {
        out.push('.');
    }
    out
}
