//! Markdown pipe tables: parse, render, locate.

use std::ops::Range;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::section::scan_lines;
use crate::domain::{DomainError, DomainResult};

/// A GitHub-flavoured pipe table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownTable {
    pub header: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_row<S: Into<String>>(mut self, row: impl IntoIterator<Item = S>) -> Self {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    /// Parse table text: header row, delimiter row, body rows.
    ///
    /// Returns `None` if the text is not a table.
    pub fn parse(text: &str) -> Option<Self> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        let header_line = lines.next()?;
        if !header_line.starts_with('|') {
            return None;
        }
        let delimiter = split_row(lines.next()?);
        if !delimiter.iter().all(|c| is_delimiter_cell(c)) {
            return None;
        }

        let header = split_row(header_line);
        let rows = lines
            .take_while(|l| l.starts_with('|'))
            .map(split_row)
            .collect();

        Some(Self { header, rows })
    }

    /// Every row must have exactly one cell per header column, and no cell may
    /// contain a line break or an unescaped `|`.
    pub fn validate(&self) -> DomainResult<()> {
        if self.header.is_empty() {
            return Err(DomainError::InvalidTable {
                message: "table has no header columns".to_string(),
            });
        }
        if let Some((idx, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != self.header.len())
        {
            return Err(DomainError::InvalidTable {
                message: format!(
                    "row {} has {} cells, header has {}",
                    idx + 1,
                    row.len(),
                    self.header.len()
                ),
            });
        }
        if let Some(cell) = std::iter::once(&self.header)
            .chain(self.rows.iter())
            .flatten()
            .find(|c| c.contains('\n') || has_unescaped_pipe(c))
        {
            return Err(DomainError::InvalidTable {
                message: format!("cell {:?} needs `\\|` for pipes and must fit on one line", cell),
            });
        }
        Ok(())
    }

    /// Render with columns padded to a common width (at least 3).
    pub fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.header.len())
            .map(|col| {
                std::iter::once(&self.header)
                    .chain(self.rows.iter())
                    .filter_map(|r| r.get(col))
                    .map(|c| c.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(3)
            })
            .collect();

        let render_row = |cells: &[String]| {
            let body = widths
                .iter()
                .enumerate()
                .map(|(col, w)| {
                    let cell = cells.get(col).map(String::as_str).unwrap_or("");
                    format!("{:<width$}", cell, width = *w)
                })
                .join(" | ");
            format!("| {} |\n", body)
        };

        let mut out = render_row(&self.header);
        out.push_str(&format!(
            "| {} |\n",
            widths.iter().map(|w| "-".repeat(*w)).join(" | ")
        ));
        for row in &self.rows {
            out.push_str(&render_row(row));
        }
        out
    }
}

/// Split a `| a | b |` row into trimmed cells; `\|` stays inside a cell.
fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for c in line.chars() {
        match c {
            '|' if !escaped => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => {
                escaped = c == '\\';
                current.push(c);
                continue;
            }
        }
        escaped = false;
    }
    if !current.trim().is_empty() {
        cells.push(current.trim().to_string());
    }
    cells
}

fn has_unescaped_pipe(cell: &str) -> bool {
    let mut escaped = false;
    for c in cell.chars() {
        if c == '|' && !escaped {
            return true;
        }
        escaped = c == '\\' && !escaped;
    }
    false
}

fn is_delimiter_cell(cell: &str) -> bool {
    cell.contains('-') && cell.chars().all(|c| c == '-' || c == ':')
}

/// Byte range of the first table (run of lines starting with `|`) inside `within`.
pub fn find_table(content: &str, within: Range<usize>) -> Option<Range<usize>> {
    let lines = scan_lines(content);
    let mut candidates = lines
        .iter()
        .filter(|l| l.offset >= within.start && l.offset < within.end && !l.in_fence)
        .skip_while(|l| !l.text.trim_start().starts_with('|'));

    let first = candidates.next()?;
    let mut end = first.offset + first.raw_len;
    for line in candidates {
        if !line.text.trim_start().starts_with('|') || line.offset != end {
            break;
        }
        end = line.offset + line.raw_len;
    }
    Some(first.offset..end)
}
