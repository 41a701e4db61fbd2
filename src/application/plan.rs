//! Edit plans: which files to rewrite, with which edits, and what to clean up.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Edit;
use crate::infrastructure::traits::FileSystem;

/// A named list of file rewrites plus files to delete afterwards.
///
/// Plans load from TOML:
/// ```toml
/// name = "example"
/// cleanup = ["NOTES.tmp.md"]
///
/// [[targets]]
/// path = "website/docs/page.mdx"
///
/// [[targets.edits]]
/// op = "remove_section"
/// heading = "## Obsolete"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPlan {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Files removed after all targets ran (if present)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cleanup: Vec<PathBuf>,
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// One file and the edits applied to it, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Relative paths resolve against the docs root
    pub path: PathBuf,
    #[serde(default)]
    pub edits: Vec<Edit>,
}

impl Target {
    pub fn new(path: impl Into<PathBuf>, edits: Vec<Edit>) -> Self {
        Self {
            path: path.into(),
            edits,
        }
    }
}

impl EditPlan {
    /// Parse a plan from TOML. `origin` names the source in error messages.
    pub fn from_toml(content: &str, origin: &str) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::InvalidPlan {
            origin: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Read and validate a plan file.
    pub fn load(fs: &Arc<dyn FileSystem>, path: &Path) -> ApplicationResult<Self> {
        let content = fs.read_to_string(path).with_path_context("read plan", path)?;
        let plan = Self::from_toml(&content, &path.display().to_string())?;
        plan.validate()?;
        Ok(plan)
    }

    /// Reject plans that could never run: unnamed, empty paths, broken edits.
    pub fn validate(&self) -> ApplicationResult<()> {
        let invalid = |message: String| ApplicationError::InvalidPlan {
            origin: if self.name.is_empty() {
                "<unnamed>".to_string()
            } else {
                self.name.clone()
            },
            message,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("plan name must not be empty".to_string()));
        }
        for (t_idx, target) in self.targets.iter().enumerate() {
            if target.path.as_os_str().is_empty() {
                return Err(invalid(format!("target {} has an empty path", t_idx + 1)));
            }
            for (e_idx, edit) in target.edits.iter().enumerate() {
                edit.validate().map_err(|e| {
                    invalid(format!(
                        "{} edit {}: {}",
                        target.path.display(),
                        e_idx + 1,
                        e
                    ))
                })?;
            }
        }
        if let Some(path) = self.cleanup.iter().find(|p| p.as_os_str().is_empty()) {
            return Err(invalid(format!("empty cleanup path: {:?}", path)));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::InvalidPlan {
            origin: self.name.clone(),
            message: format!("serialize: {e}"),
        })
    }

    /// Total number of edits across all targets.
    pub fn edit_count(&self) -> usize {
        self.targets.iter().map(|t| t.edits.len()).sum()
    }
}
