//! Rewrite service
//!
//! Runs edit plans against files on disk: read, apply edits, write back only
//! when the text changed, then delete cleanup files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, EditPlan, IoResultExt};
use crate::domain::{apply_edits, Edit};
use crate::infrastructure::traits::FileSystem;

/// Knobs for a rewrite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Report what would change without touching files
    pub dry_run: bool,
    /// Collapse blank-line runs in files that changed
    pub normalize: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            normalize: true,
        }
    }
}

/// What happened to one target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Written back with changes
    Updated,
    /// Would be written (dry run)
    WouldUpdate,
    /// Every edit was a no-op
    Unchanged,
    /// File does not exist, skipped
    Missing,
}

/// Outcome of a single edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditReport {
    pub description: String,
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub edits: Vec<EditReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStatus {
    Removed,
    WouldRemove,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub path: PathBuf,
    pub status: CleanupStatus,
}

/// Everything a plan run did, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanReport {
    pub plan: String,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
    pub cleanup: Vec<CleanupReport>,
}

impl PlanReport {
    /// Files written (or that would be written in a dry run).
    pub fn changed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Updated | FileStatus::WouldUpdate))
            .count()
    }

    pub fn missing_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Missing)
            .count()
    }
}

/// Applies edit plans to files below a docs root.
pub struct RewriteService {
    fs: Arc<dyn FileSystem>,
    docs_root: PathBuf,
    options: RewriteOptions,
}

impl RewriteService {
    /// Create a new rewrite service.
    ///
    /// # Arguments
    /// * `fs` - Filesystem abstraction
    /// * `docs_root` - Base for relative target and cleanup paths
    /// * `options` - Dry run / normalisation switches
    pub fn new(fs: Arc<dyn FileSystem>, docs_root: PathBuf, options: RewriteOptions) -> Self {
        Self {
            fs,
            docs_root,
            options,
        }
    }

    pub fn options(&self) -> RewriteOptions {
        self.options
    }

    /// Resolve a plan path against the docs root (absolute paths stay as they are).
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.docs_root.join(path)
        }
    }

    /// Apply `edits` to one file. Missing files are reported, not errors.
    #[instrument(skip(self, edits), fields(edits = edits.len()))]
    pub fn rewrite_file(&self, path: &Path, edits: &[Edit]) -> ApplicationResult<FileReport> {
        let describe = |applied: &[bool]| {
            edits
                .iter()
                .zip(applied.iter().copied().chain(std::iter::repeat(false)))
                .map(|(edit, applied)| EditReport {
                    description: edit.describe(),
                    applied,
                })
                .collect::<Vec<_>>()
        };

        if !self.fs.exists(path) {
            debug!("rewrite_file: missing {}", path.display());
            return Ok(FileReport {
                path: path.to_path_buf(),
                status: FileStatus::Missing,
                edits: describe(&[]),
            });
        }

        let content = self.fs.read_to_string(path).with_path_context("read", path)?;
        let outcome = apply_edits(&content, edits, self.options.normalize)?;
        debug!(
            "rewrite_file: {} of {} edits applied to {}",
            outcome.applied.iter().filter(|a| **a).count(),
            edits.len(),
            path.display()
        );

        let status = match outcome.content {
            None => FileStatus::Unchanged,
            Some(_) if self.options.dry_run => FileStatus::WouldUpdate,
            Some(new_content) => {
                self.fs
                    .write(path, &new_content)
                    .with_path_context("write", path)?;
                FileStatus::Updated
            }
        };

        Ok(FileReport {
            path: path.to_path_buf(),
            status,
            edits: describe(&outcome.applied),
        })
    }

    /// Delete a file if it exists.
    pub fn remove_if_present(&self, path: &Path) -> ApplicationResult<CleanupReport> {
        let status = if !self.fs.is_file(path) {
            CleanupStatus::Absent
        } else if self.options.dry_run {
            CleanupStatus::WouldRemove
        } else {
            self.fs.remove_file(path).with_path_context("remove", path)?;
            CleanupStatus::Removed
        };
        debug!("remove_if_present: {} -> {:?}", path.display(), status);
        Ok(CleanupReport {
            path: path.to_path_buf(),
            status,
        })
    }

    /// Validate and run a whole plan: targets in order, then cleanup.
    #[instrument(skip(self, plan), fields(plan = %plan.name))]
    pub fn run(&self, plan: &EditPlan) -> ApplicationResult<PlanReport> {
        plan.validate()?;
        debug!(
            "run: {} targets, {} edits, docs_root={}",
            plan.targets.len(),
            plan.edit_count(),
            self.docs_root.display()
        );

        let files = plan
            .targets
            .iter()
            .map(|t| self.rewrite_file(&self.resolve(&t.path), &t.edits))
            .collect::<ApplicationResult<Vec<_>>>()?;

        let cleanup = plan
            .cleanup
            .iter()
            .map(|p| self.remove_if_present(&self.resolve(p)))
            .collect::<ApplicationResult<Vec<_>>>()?;

        Ok(PlanReport {
            plan: plan.name.clone(),
            dry_run: self.options.dry_run,
            files,
            cleanup,
        })
    }
}
