//! Path helpers: shell expansion and display.

use std::path::{Path, PathBuf};

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the input unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Path relative to `base` when it lies below it, otherwise unchanged.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    match pathdiff::diff_paths(path, base) {
        Some(rel) if !rel.starts_with("..") && !rel.as_os_str().is_empty() => rel,
        _ => path.to_path_buf(),
    }
}

/// Path for progress output, relative to the current directory when possible.
pub fn display_path(path: &Path) -> String {
    let shown = match std::env::current_dir() {
        Ok(cwd) if path.is_absolute() => relative_to(path, &cwd),
        _ => path.to_path_buf(),
    };
    normalize_path_separator(&shown.to_string_lossy())
}

// Helper function for cross-platform path comparison
pub fn normalize_path_separator(s: &str) -> String {
    s.replace('\\', "/")
}
