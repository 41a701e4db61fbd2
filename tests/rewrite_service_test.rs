//! Tests for RewriteService
//!
//! Runs plans against a temporary docs root:
//! - files are written only when an edit changed them
//! - missing targets are reported, never fatal
//! - dry runs leave the tree untouched

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use mdxfix::application::services::{
    CleanupStatus, FileStatus, RewriteOptions, RewriteService,
};
use mdxfix::application::{ApplicationError, EditPlan, Target};
use mdxfix::domain::Edit;
use mdxfix::infrastructure::traits::RealFileSystem;

const PAGE: &str = "# Page\n\nIntro.\n\n## Old\n\nObsolete.\n\n## Keep\n\nStill here.\n";

/// Helper to create a service rooted at `root`.
fn service(root: &Path, dry_run: bool) -> RewriteService {
    RewriteService::new(
        Arc::new(RealFileSystem),
        root.to_path_buf(),
        RewriteOptions {
            dry_run,
            ..RewriteOptions::default()
        },
    )
}

fn drop_old_plan() -> EditPlan {
    EditPlan {
        name: "drop-old".to_string(),
        description: String::new(),
        cleanup: vec!["scratch.md".into()],
        targets: vec![
            Target::new(
                "page.mdx",
                vec![Edit::RemoveSection {
                    heading: "## Old".to_string(),
                }],
            ),
            Target::new(
                "gone.mdx",
                vec![Edit::RemoveSection {
                    heading: "## Old".to_string(),
                }],
            ),
        ],
    }
}

// ============================================================
// Single files
// ============================================================

#[test]
fn given_existing_file_when_rewriting_then_writes_changes() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("page.mdx");
    fs::write(&path, PAGE).unwrap();
    let service = service(temp.path(), false);
    let edits = vec![Edit::RemoveSection {
        heading: "## Old".to_string(),
    }];

    // Act
    let report = service.rewrite_file(&path, &edits).unwrap();

    // Assert
    assert_eq!(report.status, FileStatus::Updated);
    assert!(report.edits[0].applied);
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "# Page\n\nIntro.\n\n## Keep\n\nStill here.\n");
}

#[test]
fn given_missing_file_when_rewriting_then_reports_missing_without_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nowhere.mdx");
    let service = service(temp.path(), false);
    let edits = vec![Edit::ExtendIntro {
        sentence: "More.".to_string(),
    }];

    // Act
    let report = service.rewrite_file(&path, &edits).unwrap();

    // Assert
    assert_eq!(report.status, FileStatus::Missing);
    assert_eq!(report.edits.len(), 1);
    assert!(!report.edits[0].applied);
    assert!(!path.exists());
}

#[test]
fn given_no_applicable_edit_when_rewriting_then_file_not_written() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("page.mdx");
    let original = "# Page\n\n\n\nLoose spacing stays.\n";
    fs::write(&path, original).unwrap();
    let service = service(temp.path(), false);
    let edits = vec![Edit::RemoveSection {
        heading: "## Absent".to_string(),
    }];

    // Act
    let report = service.rewrite_file(&path, &edits).unwrap();

    // Assert
    assert_eq!(report.status, FileStatus::Unchanged);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn given_invalid_pattern_when_rewriting_then_domain_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("page.mdx");
    fs::write(&path, PAGE).unwrap();
    let service = service(temp.path(), false);
    let edits = vec![Edit::ReplacePattern {
        pattern: "[".to_string(),
        replacement: String::new(),
    }];

    // Act
    let result = service.rewrite_file(&path, &edits);

    // Assert
    assert!(matches!(result, Err(ApplicationError::Domain(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), PAGE);
}

// ============================================================
// Whole plans
// ============================================================

#[test]
fn given_plan_when_running_then_targets_rewritten_and_cleanup_removed() {
    // Arrange
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("page.mdx"), PAGE).unwrap();
    fs::write(temp.path().join("scratch.md"), "notes").unwrap();
    let service = service(temp.path(), false);

    // Act
    let report = service.run(&drop_old_plan()).unwrap();

    // Assert
    assert_eq!(report.plan, "drop-old");
    assert!(!report.dry_run);
    assert_eq!(report.files[0].status, FileStatus::Updated);
    assert_eq!(report.files[1].status, FileStatus::Missing);
    assert_eq!(report.changed_count(), 1);
    assert_eq!(report.missing_count(), 1);
    assert_eq!(report.cleanup[0].status, CleanupStatus::Removed);
    assert!(!temp.path().join("scratch.md").exists());
}

#[test]
fn given_plan_already_applied_when_running_again_then_nothing_changes() {
    // Arrange
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("page.mdx"), PAGE).unwrap();
    fs::write(temp.path().join("scratch.md"), "notes").unwrap();
    let service = service(temp.path(), false);
    service.run(&drop_old_plan()).unwrap();
    let after_first = fs::read_to_string(temp.path().join("page.mdx")).unwrap();

    // Act
    let report = service.run(&drop_old_plan()).unwrap();

    // Assert
    assert_eq!(report.files[0].status, FileStatus::Unchanged);
    assert_eq!(report.changed_count(), 0);
    assert_eq!(report.cleanup[0].status, CleanupStatus::Absent);
    assert_eq!(
        fs::read_to_string(temp.path().join("page.mdx")).unwrap(),
        after_first
    );
}

#[test]
fn given_dry_run_when_running_then_no_file_touched() {
    // Arrange
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("page.mdx"), PAGE).unwrap();
    fs::write(temp.path().join("scratch.md"), "notes").unwrap();
    let service = service(temp.path(), true);

    // Act
    let report = service.run(&drop_old_plan()).unwrap();

    // Assert
    assert!(report.dry_run);
    assert_eq!(report.files[0].status, FileStatus::WouldUpdate);
    assert_eq!(report.changed_count(), 1);
    assert_eq!(report.cleanup[0].status, CleanupStatus::WouldRemove);
    assert_eq!(
        fs::read_to_string(temp.path().join("page.mdx")).unwrap(),
        PAGE
    );
    assert!(temp.path().join("scratch.md").exists());
}

#[test]
fn given_absolute_target_path_when_resolving_then_docs_root_ignored() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let other = TempDir::new().unwrap();
    let service = service(temp.path(), false);
    let absolute = other.path().join("page.mdx");

    // Act & Assert
    assert_eq!(service.resolve(&absolute), absolute);
    assert_eq!(
        service.resolve(Path::new("docs/page.mdx")),
        temp.path().join("docs/page.mdx")
    );
}

#[test]
fn given_unnamed_plan_when_running_then_invalid_plan_and_nothing_written() {
    // Arrange
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("page.mdx"), PAGE).unwrap();
    let service = service(temp.path(), false);
    let mut plan = drop_old_plan();
    plan.name = "  ".to_string();

    // Act
    let result = service.run(&plan);

    // Assert
    assert!(matches!(result, Err(ApplicationError::InvalidPlan { .. })));
    assert_eq!(
        fs::read_to_string(temp.path().join("page.mdx")).unwrap(),
        PAGE
    );
}
