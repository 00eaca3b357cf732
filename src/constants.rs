// src/constants.rs

/// Directories never descended into while looking for sources.
pub const PRUNE_DIRS: &[&str] = &[
    ".git",
    ".gradle",
    ".idea",
    ".mvn",
    ".settings",
    "node_modules",
    "target",
    "build",
    "out",
    ".cache",
];

/// Name of the optional per-project configuration file.
pub const CONFIG_FILE: &str = "depflow.toml";

/// Returns true if a directory with this name should be skipped during walks.
#[must_use]
pub fn should_prune(name: &str) -> bool {
    if name == "." || name == ".." {
        return false;
    }
    PRUNE_DIRS.contains(&name) || name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_prune() {
        assert!(should_prune("target"));
        assert!(should_prune(".hidden"));
        assert!(!should_prune("src"));
        assert!(!should_prune("."));
    }
}
