//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/mdxfix/mdxfix.toml`
//! 3. Local config: `<project_dir>/.mdxfix.toml`
//! 4. Environment variables: `MDXFIX_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::util::path::expand_env_vars;

pub const GLOBAL_CONFIG_FILE: &str = "mdxfix.toml";
pub const LOCAL_CONFIG_FILE: &str = ".mdxfix.toml";
pub const ENV_PREFIX: &str = "MDXFIX";

/// Unified configuration for mdxfix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Repository root that plan paths are relative to (default: project dir)
    pub docs_root: PathBuf,
    /// Collapse runs of blank lines in files that were changed
    pub normalize_blank_lines: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            docs_root: PathBuf::from("."),
            normalize_blank_lines: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub docs_root: Option<PathBuf>,
    pub normalize_blank_lines: Option<bool>,
}

/// Get the XDG config directory for mdxfix.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mdxfix").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(GLOBAL_CONFIG_FILE))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.docs_root.to_string_lossy().as_ref());
        self.docs_root = PathBuf::from(expanded);
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            docs_root: overlay
                .docs_root
                .clone()
                .unwrap_or_else(|| self.docs_root.clone()),
            normalize_blank_lines: overlay
                .normalize_blank_lines
                .unwrap_or(self.normalize_blank_lines),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Directory holding `.mdxfix.toml`; also the default docs root
    ///
    /// A relative `docs_root` in the local config is resolved against `project_dir`.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Defaults
        let mut current = Self::default();
        if let Some(project) = project_dir {
            current.docs_root = project.to_path_buf();
        }

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        let project = project_dir.unwrap_or_else(|| Path::new("."));
        let local_path = local_config_path(project);
        if local_path.exists() {
            let mut raw = load_raw_settings(&local_path)?;
            if let Some(root) = raw.docs_root.take() {
                let root = PathBuf::from(expand_env_vars(root.to_string_lossy().as_ref()));
                raw.docs_root = Some(if root.is_relative() {
                    project.join(root)
                } else {
                    root
                });
            }
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply MDXFIX_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("docs_root") {
            settings.docs_root = PathBuf::from(val);
        }
        match config.get_bool("normalize_blank_lines") {
            Ok(val) => settings.normalize_blank_lines = val,
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# mdxfix configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/mdxfix/mdxfix.toml
#   Local:  <project_dir>/.mdxfix.toml
#   Env:    MDXFIX_* environment variables (e.g. MDXFIX_DOCS_ROOT)
#   CLI:    --docs-root, --no-normalize

# Repository root that plan target paths are relative to.
# Relative values in a local config resolve against the project directory.
# docs_root = "."

# Collapse runs of blank lines in files that a plan changed
# normalize_blank_lines = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_when_created_then_normalizes_in_cwd() {
        let settings = Settings::default();
        assert_eq!(settings.docs_root, PathBuf::from("."));
        assert!(settings.normalize_blank_lines);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_inherit() {
        let base = Settings::default();
        let overlay = RawSettings {
            docs_root: None,
            normalize_blank_lines: Some(false),
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.docs_root, PathBuf::from("."));
        assert!(!merged.normalize_blank_lines);
    }

    #[test]
    fn given_tilde_in_docs_root_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            docs_root: PathBuf::from("~/src/docs"),
            normalize_blank_lines: true,
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(
            settings.docs_root.to_string_lossy().starts_with(&home),
            "docs_root should start with home dir: {}",
            settings.docs_root.display()
        );
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.docs_root.is_none());
        assert!(raw.normalize_blank_lines.is_none());
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips() {
        let settings = Settings {
            docs_root: PathBuf::from("/srv/docs"),
            normalize_blank_lines: false,
        };
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
