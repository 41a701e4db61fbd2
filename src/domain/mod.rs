//! Domain layer: text transforms on markdown/MDX content
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod edit;
pub mod error;
pub mod section;
pub mod table;

pub use edit::{apply_edits, collapse_blank_lines, Edit, EditsApplied};
pub use error::{DomainError, DomainResult};
pub use section::{find_section, headings, Heading, HeadingRef, SectionSpan};
pub use table::{find_table, MarkdownTable};
