//! Application layer: edit plans and the rewrite service
//!
//! This layer orchestrates domain edits and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod plan;
pub mod plans;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use plan::{EditPlan, Target};
