//! Markdown heading scan and section addressing.
//!
//! A section starts at an ATX heading and runs until the next heading of the
//! same or a higher level (fewer `#`), or to the end of the text. Headings
//! inside fenced code blocks are ignored.

use std::fmt;

use crate::domain::{DomainError, DomainResult};

/// One line of content with its byte offset.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    /// Byte offset of the first character of the line
    pub offset: usize,
    /// Line text without the line terminator
    pub text: &'a str,
    /// Length of the line including its terminator
    pub raw_len: usize,
    /// Line is a fence marker or sits between fence markers
    pub in_fence: bool,
}

/// Split content into lines, tracking ``` / ~~~ fenced code blocks.
pub(crate) fn scan_lines(content: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    let mut open_fence: Option<char> = None;

    for raw in content.split_inclusive('\n') {
        let text = raw.trim_end_matches(['\n', '\r']);
        let trimmed = text.trim_start();
        let marker = if trimmed.starts_with("```") {
            Some('`')
        } else if trimmed.starts_with("~~~") {
            Some('~')
        } else {
            None
        };

        let in_fence = match (open_fence, marker) {
            (None, Some(m)) => {
                open_fence = Some(m);
                true
            }
            (Some(open), Some(m)) if open == m => {
                // closing fence carries no info string
                if trimmed.trim_start_matches(m).trim().is_empty() {
                    open_fence = None;
                }
                true
            }
            (Some(_), _) => true,
            (None, None) => false,
        };

        lines.push(Line {
            offset,
            text,
            raw_len: raw.len(),
            in_fence,
        });
        offset += raw.len();
    }
    lines
}

/// Parse an ATX heading line into `(level, title)`.
fn parse_heading(text: &str) -> Option<(usize, &str)> {
    let level = text.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &text[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    let title = rest.trim().trim_end_matches('#').trim_end();
    Some((level, title))
}

/// A heading found in content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Number of leading `#`
    pub level: usize,
    /// Heading text, trimmed, closing `#`s dropped
    pub title: String,
    /// Zero-based line index
    pub line: usize,
    /// Byte offset of the heading line
    pub offset: usize,
    /// Byte offset just past the heading line (including its newline)
    pub line_end: usize,
}

/// List all ATX headings outside fenced code blocks.
pub fn headings(content: &str) -> Vec<Heading> {
    scan_lines(content)
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.in_fence)
        .filter_map(|(idx, l)| {
            parse_heading(l.text).map(|(level, title)| Heading {
                level,
                title: title.to_string(),
                line: idx,
                offset: l.offset,
                line_end: l.offset + l.raw_len,
            })
        })
        .collect()
}

/// Selects a heading by title and, optionally, level.
///
/// `"## Best Practices"` only matches level-2 headings titled "Best Practices";
/// `"Best Practices"` matches that title at any level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRef {
    pub level: Option<usize>,
    pub title: String,
}

impl HeadingRef {
    pub fn parse(selector: &str) -> DomainResult<Self> {
        let selector = selector.trim();
        if selector.starts_with('#') {
            match parse_heading(selector) {
                Some((level, title)) if !title.is_empty() => Ok(Self {
                    level: Some(level),
                    title: title.to_string(),
                }),
                _ => Err(DomainError::InvalidHeading(selector.to_string())),
            }
        } else if selector.is_empty() {
            Err(DomainError::InvalidHeading(selector.to_string()))
        } else {
            Ok(Self {
                level: None,
                title: selector.to_string(),
            })
        }
    }

    pub fn matches(&self, heading: &Heading) -> bool {
        self.level.map_or(true, |l| l == heading.level) && self.title == heading.title
    }
}

impl fmt::Display for HeadingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Some(level) => write!(f, "{} {}", "#".repeat(level), self.title),
            None => write!(f, "{}", self.title),
        }
    }
}

/// Byte offsets of a section within its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    /// Start of the heading line
    pub start: usize,
    /// Start of the body (just after the heading line)
    pub body_start: usize,
    /// Start of the next sibling-or-higher heading, or content length
    pub end: usize,
    pub level: usize,
}

/// Locate the first section whose heading matches `selector`.
pub fn find_section(content: &str, selector: &HeadingRef) -> Option<SectionSpan> {
    let all = headings(content);
    let idx = all.iter().position(|h| selector.matches(h))?;
    let heading = &all[idx];
    let end = all[idx + 1..]
        .iter()
        .find(|next| next.level <= heading.level)
        .map(|next| next.offset)
        .unwrap_or(content.len());

    Some(SectionSpan {
        start: heading.offset,
        body_start: heading.line_end,
        end,
        level: heading.level,
    })
}

/// Remove a section (heading and body). Returns `None` when no section matches.
pub fn remove_section(content: &str, selector: &HeadingRef) -> Option<String> {
    let span = find_section(content, selector)?;
    let mut result = String::with_capacity(content.len());
    result.push_str(&content[..span.start]);
    result.push_str(&content[span.end..]);
    Some(result)
}

/// Replace the body of a section, keeping its heading line.
///
/// Returns `None` when no section matches or the body is already in place.
pub fn replace_section(content: &str, selector: &HeadingRef, body: &str) -> Option<String> {
    let span = find_section(content, selector)?;

    let mut new_body = format!("\n{}\n", body.trim());
    if span.end < content.len() {
        new_body.push('\n');
    }
    if content[span.body_start..span.end] == new_body {
        return None;
    }

    let mut result = String::with_capacity(content.len() + new_body.len());
    result.push_str(&content[..span.body_start]);
    if !result.ends_with('\n') {
        // heading was the last line, without terminator
        result.push('\n');
    }
    result.push_str(&new_body);
    result.push_str(&content[span.end..]);
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Title\n\nIntro.\n\n## One\n\nbody one\n\n### Sub\n\nsub body\n\n## Two\n\nbody two\n";

    #[test]
    fn given_heading_with_closing_hashes_when_parsing_then_drops_them() {
        assert_eq!(parse_heading("## Two ##"), Some((2, "Two")));
        assert_eq!(parse_heading("#NoSpace"), None);
        assert_eq!(parse_heading("####### seven"), None);
    }

    #[test]
    fn given_fenced_code_when_listing_headings_then_skips_fence_content() {
        let content = "## Real\n\n```bash\n# not a heading\n```\n\n## Also Real\n";
        let titles: Vec<_> = headings(content).into_iter().map(|h| h.title).collect();
        assert_eq!(titles, vec!["Real", "Also Real"]);
    }

    #[test]
    fn given_nested_heading_when_finding_section_then_span_includes_subsections() {
        let sel = HeadingRef::parse("## One").unwrap();
        let span = find_section(DOC, &sel).unwrap();
        let text = &DOC[span.start..span.end];
        assert!(text.starts_with("## One\n"));
        assert!(text.contains("### Sub"));
        assert!(!text.contains("## Two"));
    }

    #[test]
    fn given_selector_without_level_when_matching_then_any_level_matches() {
        let sel = HeadingRef::parse("Sub").unwrap();
        assert_eq!(sel.level, None);
        assert!(find_section(DOC, &sel).is_some());
    }

    #[test]
    fn given_empty_selector_when_parsing_then_fails() {
        assert!(HeadingRef::parse("").is_err());
        assert!(HeadingRef::parse("## ").is_err());
    }

    #[test]
    fn given_last_section_when_replacing_twice_then_second_is_noop() {
        let sel = HeadingRef::parse("## Two").unwrap();
        let once = replace_section(DOC, &sel, "new body").unwrap();
        assert!(once.ends_with("## Two\n\nnew body\n"));
        assert_eq!(replace_section(&once, &sel, "new body"), None);
    }
}
