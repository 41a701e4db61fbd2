//! Built-in edit plans
//!
//! Each plan is plain data; the rewrite service runs it like any plan loaded
//! from a TOML file.

pub mod command_docs;
pub mod planfiles;

use crate::application::EditPlan;

/// Names accepted by [`builtin`].
pub const BUILTIN_PLAN_NAMES: &[&str] = &[planfiles::NAME, command_docs::NAME];

/// Look up a built-in plan by name.
pub fn builtin(name: &str) -> Option<EditPlan> {
    match name {
        planfiles::NAME => Some(planfiles::plan()),
        command_docs::NAME => Some(command_docs::plan()),
        _ => None,
    }
}
