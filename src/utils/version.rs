use regex::Regex;
use std::sync::OnceLock;

static GO_VERSION_REGEX: OnceLock<Regex> = OnceLock::new();

/// Pulls the release tag out of `go version` style output.
///
/// `"go version go1.21.0 linux/amd64"` becomes `Some("go1.21.0")`. Anything
/// without a recognizable tag, including the unknown sentinel, yields `None`.
pub fn short_version(s: &str) -> Option<String> {
    let re = GO_VERSION_REGEX.get_or_init(|| {
        Regex::new(r"\bgo(\d+(?:\.\d+)*(?:(?:rc|beta)\d+)?)\b").unwrap()
    });

    re.captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| format!("go{}", m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_version_from_go_output() {
        assert_eq!(
            short_version("go version go1.21.0 linux/amd64").as_deref(),
            Some("go1.21.0")
        );
        assert_eq!(short_version("go version go1.22rc1").as_deref(), Some("go1.22rc1"));
    }

    #[test]
    fn test_short_version_from_gvm_dir_name() {
        assert_eq!(short_version("go1.20").as_deref(), Some("go1.20"));
    }

    #[test]
    fn test_short_version_unknown() {
        assert_eq!(short_version("unknown version"), None);
        assert_eq!(short_version("golang"), None);
    }
}
