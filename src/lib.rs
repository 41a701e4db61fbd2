//! mdxfix: plan-driven, idempotent rewrites of MDX documentation pages.
//!
//! Layers, innermost first:
//! - [`domain`]: pure text edits (sections, tables, intro sentences, callouts)
//! - [`application`]: edit plans, built-in plans, the rewrite service
//! - [`infrastructure`]: filesystem boundary and service wiring
//! - [`cli`]: argument parsing, dispatch, coloured output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
