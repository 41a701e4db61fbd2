//! Tests for loading edit plans from TOML files

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use mdxfix::application::plans::{builtin, planfiles};
use mdxfix::application::services::{CleanupStatus, FileStatus, RewriteOptions, RewriteService};
use mdxfix::application::{ApplicationError, EditPlan};
use mdxfix::domain::Edit;
use mdxfix::infrastructure::traits::{FileSystem, RealFileSystem};

const RELEASE_NOTES_PLAN: &str = include_str!("resources/plans/release-notes.toml");

const INSTALL_MDX: &str = "\
---
title: Install Atmos
---

## Install

Download `atmos_1.150.2` from the releases page.

## Legacy Installer

Use the shell script.

## Verify

Run `atmos version`; it should print atmos_1.150.2.
";

fn fs() -> Arc<dyn FileSystem> {
    Arc::new(RealFileSystem)
}

// ============================================================
// Parsing and validation
// ============================================================

#[test]
fn given_plan_file_when_loading_then_targets_and_cleanup_parsed() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("release-notes.toml");
    fs::write(&path, RELEASE_NOTES_PLAN).unwrap();

    // Act
    let plan = EditPlan::load(&fs(), &path).unwrap();

    // Assert
    assert_eq!(plan.name, "release-notes");
    assert_eq!(plan.cleanup, vec![Path::new("notes.tmp.md").to_path_buf()]);
    assert_eq!(plan.targets.len(), 1);
    assert_eq!(plan.edit_count(), 3);
    assert_eq!(
        plan.targets[0].edits[2],
        Edit::RemoveSection {
            heading: "## Legacy Installer".to_string()
        }
    );
}

#[test]
fn given_missing_plan_file_when_loading_then_operation_failed() {
    let temp = TempDir::new().unwrap();

    let result = EditPlan::load(&fs(), &temp.path().join("absent.toml"));

    assert!(matches!(
        result,
        Err(ApplicationError::OperationFailed { .. })
    ));
}

#[test]
fn given_unknown_op_when_parsing_then_invalid_plan() {
    // Arrange
    let text = r#"
name = "broken"

[[targets]]
path = "a.mdx"

[[targets.edits]]
op = "rename_everything"
"#;

    // Act
    let result = EditPlan::from_toml(text, "broken.toml");

    // Assert
    match result {
        Err(ApplicationError::InvalidPlan { origin, .. }) => assert_eq!(origin, "broken.toml"),
        other => panic!("expected InvalidPlan, got {:?}", other),
    }
}

#[test]
fn given_bad_regex_in_plan_file_when_loading_then_invalid_plan_names_edit() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.toml");
    fs::write(
        &path,
        r#"
name = "bad"

[[targets]]
path = "a.mdx"

[[targets.edits]]
op = "replace_pattern"
pattern = "(oops"
replacement = ""
"#,
    )
    .unwrap();

    // Act
    let result = EditPlan::load(&fs(), &path);

    // Assert
    match result {
        Err(ApplicationError::InvalidPlan { origin, message }) => {
            assert_eq!(origin, "bad");
            assert!(message.contains("a.mdx edit 1"), "message: {}", message);
        }
        other => panic!("expected InvalidPlan, got {:?}", other),
    }
}

#[test]
fn given_builtin_plan_when_serialized_then_parses_back_identically() {
    let plan = builtin(planfiles::NAME).unwrap();

    let text = plan.to_toml().unwrap();
    let parsed = EditPlan::from_toml(&text, "planfiles.toml").unwrap();

    assert_eq!(parsed, plan);
}

// ============================================================
// Running a loaded plan
// ============================================================

#[test]
fn given_loaded_plan_when_running_then_edits_applied_and_scratch_removed() {
    // Arrange
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("install.mdx"), INSTALL_MDX).unwrap();
    fs::write(temp.path().join("notes.tmp.md"), "draft").unwrap();
    let plan = EditPlan::from_toml(RELEASE_NOTES_PLAN, "release-notes.toml").unwrap();
    let service = RewriteService::new(fs(), temp.path().to_path_buf(), RewriteOptions::default());

    // Act
    let report = service.run(&plan).unwrap();
    let again = service.run(&plan).unwrap();

    // Assert
    assert_eq!(report.files[0].status, FileStatus::Updated);
    assert_eq!(report.cleanup[0].status, CleanupStatus::Removed);
    assert_eq!(again.files[0].status, FileStatus::Unchanged);

    let page = fs::read_to_string(temp.path().join("install.mdx")).unwrap();
    assert!(!page.contains("1.150.2"));
    assert_eq!(page.matches("atmos_1.200.0").count(), 2);
    assert!(page.contains("## Install\n\n:::tip\nHomebrew users"));
    assert!(page.contains("`brew upgrade atmos`.\n:::\n\nDownload"));
    assert!(!page.contains("## Legacy Installer"));
    assert!(page.contains("## Verify"));
}
