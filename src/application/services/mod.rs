//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod rewrite;

pub use rewrite::{
    CleanupReport, CleanupStatus, EditReport, FileReport, FileStatus, PlanReport, RewriteOptions,
    RewriteService,
};
