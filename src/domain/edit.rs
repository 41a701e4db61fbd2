//! Edit operations on MDX text.
//!
//! Every edit is a guarded rewrite: when its target is missing or the change is
//! already in place it reports "no change" instead of failing, so running the
//! same edits twice leaves the text untouched.

use std::borrow::Cow;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::section::{remove_section, replace_section, scan_lines};
use crate::domain::{find_section, find_table, DomainError, DomainResult, HeadingRef, MarkdownTable};

const INTRO_OPEN: &str = "<Intro>";
const INTRO_CLOSE: &str = "</Intro>";

/// A single rewrite step, loadable from TOML (`op = "remove_section"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    /// Drop a heading and everything up to the next sibling heading
    RemoveSection { heading: String },

    /// Keep the heading, swap its body
    ReplaceSection { heading: String, body: String },

    /// Replace the first table under a heading
    ReplaceTable {
        heading: String,
        header: Vec<String>,
        #[serde(default)]
        rows: Vec<Vec<String>>,
    },

    /// Literal replace-all, skipped once `replace` is present
    ReplaceText { find: String, replace: String },

    /// Regex replace-all
    ReplacePattern { pattern: String, replacement: String },

    /// Insert a block after the first line containing `anchor`
    InsertAfterLine { anchor: String, text: String },

    /// Append a sentence to the `<Intro>` paragraph
    ExtendIntro { sentence: String },
}

impl Edit {
    /// Check the edit can be applied at all, independent of content.
    pub fn validate(&self) -> DomainResult<()> {
        match self {
            Edit::RemoveSection { heading } | Edit::ReplaceSection { heading, .. } => {
                HeadingRef::parse(heading).map(|_| ())
            }
            Edit::ReplaceTable { heading, .. } => {
                HeadingRef::parse(heading)?;
                self.table().map_or(Ok(()), |t| t.validate())
            }
            Edit::ReplaceText { find, .. } => non_empty("find", find),
            Edit::ReplacePattern { pattern, .. } => compile(pattern).map(|_| ()),
            Edit::InsertAfterLine { anchor, text } => {
                non_empty("anchor", anchor)?;
                non_empty("text", text)
            }
            Edit::ExtendIntro { sentence } => non_empty("sentence", sentence),
        }
    }

    /// One-line label for progress output.
    pub fn describe(&self) -> String {
        match self {
            Edit::RemoveSection { heading } => format!("remove section '{}'", heading),
            Edit::ReplaceSection { heading, .. } => format!("replace section '{}'", heading),
            Edit::ReplaceTable { heading, .. } => format!("restructure table under '{}'", heading),
            Edit::ReplaceText { find, .. } => format!("replace text '{}'", abbreviate(find)),
            Edit::ReplacePattern { pattern, .. } => format!("replace pattern /{}/", pattern),
            Edit::InsertAfterLine { anchor, text } => format!(
                "insert '{}' after '{}'",
                abbreviate(text.trim()),
                anchor
            ),
            Edit::ExtendIntro { sentence } => format!("extend intro with '{}'", abbreviate(sentence)),
        }
    }

    /// Apply to `content`. `Ok(None)` means nothing to change.
    ///
    /// Blank-line runs in edit-supplied text are collapsed before use, the same
    /// way [`apply_edits`] normalises the file, so the "already present" checks
    /// still match on the next run.
    pub fn apply(&self, content: &str) -> DomainResult<Option<String>> {
        match self {
            Edit::RemoveSection { heading } => {
                Ok(remove_section(content, &HeadingRef::parse(heading)?))
            }
            Edit::ReplaceSection { heading, body } => Ok(replace_section(
                content,
                &HeadingRef::parse(heading)?,
                &collapse_blank_lines(body.trim()),
            )),
            Edit::ReplaceTable { heading, .. } => {
                let selector = HeadingRef::parse(heading)?;
                let Some(table) = self.table() else {
                    return Ok(None);
                };
                table.validate()?;
                Ok(replace_table(content, &selector, &table))
            }
            Edit::ReplaceText { find, replace } => {
                non_empty("find", find)?;
                let replace = collapse_blank_lines(replace);
                if (!replace.is_empty() && content.contains(&*replace))
                    || !content.contains(find.as_str())
                {
                    return Ok(None);
                }
                Ok(Some(content.replace(find.as_str(), &replace)))
            }
            Edit::ReplacePattern {
                pattern,
                replacement,
            } => {
                let re = compile(pattern)?;
                match re.replace_all(content, replacement.as_str()) {
                    Cow::Owned(result) if result != content => Ok(Some(result)),
                    _ => Ok(None),
                }
            }
            Edit::InsertAfterLine { anchor, text } => Ok(insert_after_line(
                content,
                anchor,
                &collapse_blank_lines(text.trim()),
            )),
            Edit::ExtendIntro { sentence } => Ok(extend_intro(
                content,
                &collapse_blank_lines(sentence.trim()),
            )),
        }
    }

    fn table(&self) -> Option<MarkdownTable> {
        match self {
            Edit::ReplaceTable { header, rows, .. } => Some(MarkdownTable {
                header: header.clone(),
                rows: rows.clone(),
            }),
            _ => None,
        }
    }
}

fn non_empty(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidEdit {
            message: format!("'{}' must not be empty", field),
        });
    }
    Ok(())
}

fn compile(pattern: &str) -> DomainResult<Regex> {
    Regex::new(pattern).map_err(|e| DomainError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn abbreviate(text: &str) -> String {
    const MAX: usize = 40;
    let first_line = text.lines().next().unwrap_or("");
    if first_line.chars().count() > MAX || text.lines().count() > 1 {
        let short: String = first_line.chars().take(MAX).collect();
        format!("{}...", short.trim_end())
    } else {
        first_line.to_string()
    }
}

fn replace_table(content: &str, selector: &HeadingRef, table: &MarkdownTable) -> Option<String> {
    let span = find_section(content, selector)?;
    let range = find_table(content, span.body_start..span.end)?;
    if MarkdownTable::parse(&content[range.clone()]).as_ref() == Some(table) {
        return None;
    }

    let mut result = String::with_capacity(content.len());
    result.push_str(&content[..range.start]);
    result.push_str(&table.render());
    result.push_str(&content[range.end..]);
    Some(result)
}

fn insert_after_line(content: &str, anchor: &str, text: &str) -> Option<String> {
    let block = text.trim();
    if block.is_empty() || content.contains(block) {
        return None;
    }
    let anchor = anchor.trim();
    let lines = scan_lines(content);
    let line = lines
        .iter()
        .find(|l| !l.in_fence && l.text.trim().contains(anchor))?;

    let pos = line.offset + line.raw_len;
    let rest = &content[pos..];

    let mut insertion = String::new();
    if line.raw_len == line.text.len() {
        // anchor is the last line, without terminator
        insertion.push('\n');
    }
    insertion.push('\n');
    insertion.push_str(block);
    insertion.push('\n');
    let next_line_blank = rest.lines().next().map_or(true, |l| l.trim().is_empty());
    if !rest.is_empty() && !next_line_blank {
        insertion.push('\n');
    }

    let mut result = String::with_capacity(content.len() + insertion.len());
    result.push_str(&content[..pos]);
    result.push_str(&insertion);
    result.push_str(rest);
    Some(result)
}

fn extend_intro(content: &str, sentence: &str) -> Option<String> {
    if sentence.is_empty() || content.contains(sentence) {
        return None;
    }
    let lines = scan_lines(content);
    let open = lines
        .iter()
        .position(|l| !l.in_fence && l.text.contains(INTRO_OPEN))?;
    let close = open
        + lines[open..]
            .iter()
            .position(|l| !l.in_fence && l.text.contains(INTRO_CLOSE))?;

    // inline form: text sits on the closing line
    let close_line = &lines[close];
    let close_col = close_line.text.find(INTRO_CLOSE)?;
    let leading = &close_line.text[..close_col];
    let leading = if close == open {
        leading.split_once(INTRO_OPEN).map_or(leading, |(_, after)| after)
    } else {
        leading
    };
    let insert_at = if !leading.trim().is_empty() {
        let before = &content[..close_line.offset + close_col];
        before.trim_end().len()
    } else {
        let text_line = (open..close).rev().find_map(|idx| {
            let line = &lines[idx];
            if line.in_fence {
                return None;
            }
            let text = if idx == open {
                line.text.split_once(INTRO_OPEN).map_or("", |(_, after)| after)
            } else {
                line.text
            };
            (!text.trim().is_empty()).then_some(line)
        })?;
        text_line.offset + text_line.text.trim_end().len()
    };

    let mut result = String::with_capacity(content.len() + sentence.len() + 1);
    result.push_str(&content[..insert_at]);
    result.push(' ');
    result.push_str(sentence);
    result.push_str(&content[insert_at..]);
    Some(result)
}

/// Collapse runs of blank lines (outside fenced code) to a single blank line.
pub fn collapse_blank_lines(content: &str) -> Cow<'_, str> {
    let mut result = String::with_capacity(content.len());
    let mut blank_run = 0;
    let mut dropped = false;

    for line in scan_lines(content) {
        if !line.in_fence && line.text.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                dropped = true;
                continue;
            }
        } else {
            blank_run = 0;
        }
        result.push_str(&content[line.offset..line.offset + line.raw_len]);
    }

    if dropped {
        Cow::Owned(result)
    } else {
        Cow::Borrowed(content)
    }
}

/// Outcome of running a list of edits over one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditsApplied {
    /// New text, `None` if it is identical to the input
    pub content: Option<String>,
    /// Per edit: whether it changed the text
    pub applied: Vec<bool>,
}

/// Run `edits` in order. Blank-line normalisation only runs if something changed.
pub fn apply_edits(content: &str, edits: &[Edit], normalize: bool) -> DomainResult<EditsApplied> {
    let mut current: Cow<'_, str> = Cow::Borrowed(content);
    let mut applied = Vec::with_capacity(edits.len());

    for edit in edits {
        match edit.apply(&current)? {
            Some(next) => {
                current = Cow::Owned(next);
                applied.push(true);
            }
            None => applied.push(false),
        }
    }

    if !applied.contains(&true) {
        return Ok(EditsApplied {
            content: None,
            applied,
        });
    }

    let mut result = current.into_owned();
    if normalize {
        if let Cow::Owned(collapsed) = collapse_blank_lines(&result) {
            result = collapsed;
        }
    }

    Ok(EditsApplied {
        content: (result != content).then_some(result),
        applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_three_blank_lines_when_collapsing_then_keeps_one() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb\n"), "a\n\nb\n");
    }

    #[test]
    fn given_blank_lines_in_fence_when_collapsing_then_untouched() {
        let content = "```\nx\n\n\n\ny\n```\n";
        assert!(matches!(collapse_blank_lines(content), Cow::Borrowed(_)));
    }

    #[test]
    fn given_long_text_when_describing_then_abbreviates() {
        let edit = Edit::ReplaceText {
            find: "x".repeat(60),
            replace: "y".to_string(),
        };
        assert!(edit.describe().ends_with("...'"));
    }

    #[test]
    fn given_empty_find_when_validating_then_fails() {
        let edit = Edit::ReplaceText {
            find: " ".to_string(),
            replace: "y".to_string(),
        };
        assert!(matches!(edit.validate(), Err(DomainError::InvalidEdit { .. })));
    }
}
