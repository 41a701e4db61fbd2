//! Rewrite of the Terraform planfiles concept page.

use crate::application::{EditPlan, Target};
use crate::domain::Edit;

pub const NAME: &str = "planfiles";

pub const PLANFILES_PAGE: &str = "website/docs/core-concepts/components/terraform/planfiles.mdx";

/// Sections dropped from the page entirely.
pub const REMOVED_SECTIONS: &[&str] = &["## Manual Planfile Management", "## Troubleshooting"];

pub const STORAGE_HEADING: &str = "## Planfile Storage";

pub const STORAGE_BODY: &str = r#"By default, Atmos writes planfiles next to the component's Terraform code, named
`<context>-<component>.planfile`. Use `--planfile` to point `atmos terraform apply`
at a planfile generated elsewhere, for example by an earlier CI job.

Planfiles can contain sensitive values in plain text. Treat them like state: keep them
out of version control and remove them with `atmos terraform clean` once applied."#;

pub const BEST_PRACTICES_HEADING: &str = "## Best Practices";

pub const BEST_PRACTICES_HEADER: [&str; 2] = ["Practice", "Why"];

pub const BEST_PRACTICES: &[[&str; 2]] = &[
    [
        "Generate and apply planfiles in the same pipeline",
        "What was reviewed is exactly what gets applied",
    ],
    [
        "Never commit planfiles",
        "Planfiles may contain secrets in plain text",
    ],
    [
        "Use `--skip-planfile` with Terraform Cloud",
        "Terraform Cloud does not support local planfiles",
    ],
    [
        "Clean up with `atmos terraform clean`",
        "Stale planfiles can be applied against drifted state",
    ],
];

pub fn plan() -> EditPlan {
    let mut edits: Vec<Edit> = REMOVED_SECTIONS
        .iter()
        .map(|heading| Edit::RemoveSection {
            heading: heading.to_string(),
        })
        .collect();

    edits.push(Edit::ReplaceSection {
        heading: STORAGE_HEADING.to_string(),
        body: STORAGE_BODY.to_string(),
    });

    edits.push(Edit::ReplaceTable {
        heading: BEST_PRACTICES_HEADING.to_string(),
        header: BEST_PRACTICES_HEADER.iter().map(|c| c.to_string()).collect(),
        rows: BEST_PRACTICES
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect(),
    });

    EditPlan {
        name: NAME.to_string(),
        description: "Trim the planfiles page, rewrite storage guidance and best practices"
            .to_string(),
        cleanup: Vec::new(),
        targets: vec![Target::new(PLANFILES_PAGE, edits)],
    }
}
