use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Linux,
    MacOS,
    Windows,
}

impl OsFamily {
    pub fn is_windows(&self) -> bool {
        matches!(self, Self::Windows)
    }

    /// File name of the toolchain driver inside `<root>/bin`.
    pub fn go_executable(&self) -> &'static str {
        match self {
            Self::Windows => "go.exe",
            _ => "go",
        }
    }
}

impl Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::MacOS => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

impl FromStr for OsFamily {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" => Ok(Self::MacOS),
            "windows" => Ok(Self::Windows),
            _ => anyhow::bail!("Unknown OS: {}", s),
        }
    }
}

impl Default for OsFamily {
    fn default() -> Self {
        #[cfg(target_os = "linux")]
        return Self::Linux;
        #[cfg(target_os = "macos")]
        return Self::MacOS;
        #[cfg(target_os = "windows")]
        return Self::Windows;
        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        return Self::Linux;
    }
}
