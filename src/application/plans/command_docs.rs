//! Purpose sentences and info callouts for the Terraform command pages.

use std::path::PathBuf;

use crate::application::{EditPlan, Target};
use crate::domain::Edit;

pub const NAME: &str = "command-docs";

pub const COMMAND_DOCS_DIR: &str = "website/docs/cli/commands/terraform";

/// Scratch file left behind by the docs analysis; deleted after the run.
pub const ANALYSIS_FILE: &str = "PLANFILE_DOCS_ANALYSIS.md";

/// Callouts go right after the intro block.
pub const CALLOUT_ANCHOR: &str = "</Intro>";

/// Additions for one command page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDocUpdate {
    /// File name inside [`COMMAND_DOCS_DIR`]
    pub file: &'static str,
    /// Sentence appended to the intro paragraph
    pub purpose: Option<&'static str>,
    /// Text of an `:::info` admonition placed after the intro
    pub info: Option<&'static str>,
}

pub const COMMAND_DOC_UPDATES: &[CommandDocUpdate] = &[
    CommandDocUpdate {
        file: "terraform-plan.mdx",
        purpose: Some(
            "Use `--planfile` to write the plan to a specific path for a later `atmos terraform apply`.",
        ),
        info: Some(
            "Atmos generates a planfile for every `plan` run. See [Planfiles](/core-concepts/components/terraform/planfiles) for how they are named, stored and cleaned up.",
        ),
    },
    CommandDocUpdate {
        file: "terraform-apply.mdx",
        purpose: Some(
            "Pass `--from-plan` to apply the planfile produced by a previous `atmos terraform plan`.",
        ),
        info: Some(
            "With `--from-plan`, Atmos applies exactly the reviewed changes and does not run `plan` again.",
        ),
    },
    CommandDocUpdate {
        file: "terraform-deploy.mdx",
        purpose: Some(
            "Unlike `apply`, `deploy` approves changes automatically, which suits CI pipelines.",
        ),
        info: None,
    },
    CommandDocUpdate {
        file: "terraform-plan-diff.mdx",
        purpose: Some("It compares two planfiles and shows what changed between them."),
        info: Some("Both planfiles must be generated for the same component and stack."),
    },
    CommandDocUpdate {
        file: "terraform-clean.mdx",
        purpose: None,
        info: Some(
            "When given a component and stack, `atmos terraform clean` also deletes that component's planfile.",
        ),
    },
];

/// Render an `:::info` admonition.
pub fn info_callout(text: &str) -> String {
    format!(":::info\n{}\n:::", text.trim())
}

impl CommandDocUpdate {
    pub fn path(&self) -> PathBuf {
        PathBuf::from(COMMAND_DOCS_DIR).join(self.file)
    }

    pub fn edits(&self) -> Vec<Edit> {
        let purpose = self.purpose.map(|sentence| Edit::ExtendIntro {
            sentence: sentence.to_string(),
        });
        let info = self.info.map(|text| Edit::InsertAfterLine {
            anchor: CALLOUT_ANCHOR.to_string(),
            text: info_callout(text),
        });
        purpose.into_iter().chain(info).collect()
    }
}

pub fn plan() -> EditPlan {
    EditPlan {
        name: NAME.to_string(),
        description: "Add purpose sentences and info callouts to Terraform command pages"
            .to_string(),
        cleanup: vec![PathBuf::from(ANALYSIS_FILE)],
        targets: COMMAND_DOC_UPDATES
            .iter()
            .map(|u| Target::new(u.path(), u.edits()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_update_without_info_when_building_edits_then_only_purpose() {
        let update = CommandDocUpdate {
            file: "x.mdx",
            purpose: Some("Hello."),
            info: None,
        };
        assert_eq!(
            update.edits(),
            vec![Edit::ExtendIntro {
                sentence: "Hello.".to_string()
            }]
        );
    }

    #[test]
    fn given_builtin_command_docs_plan_when_validating_then_ok() {
        let plan = plan();
        plan.validate().unwrap();
        assert_eq!(plan.targets.len(), COMMAND_DOC_UPDATES.len());
        assert_eq!(plan.cleanup, vec![PathBuf::from(ANALYSIS_FILE)]);
    }
}
