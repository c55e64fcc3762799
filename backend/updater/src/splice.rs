//! # Seed Splice
//!
//! The seed script holds one block per content table:
//!
//! ```sql
//! -- ******** docs ********
//! INSERT INTO docs(course_name,...) VALUES
//! ('Algebra', ...),
//! ('Art', ...);
//! ```
//!
//! [`SeedDocument::parse`] finds every marker once and, for each, the first
//! `INSERT INTO <table> (` after it. The statement runs up to the first semicolon
//! outside a quoted string or `--` comment. Replacing a block swaps exactly that
//! span, so the marker, blank lines and every other byte of the file survive as-is.
use std::{ops::Range, sync::LazyLock};

use regex::Regex;

use crate::error::SpliceError;

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-- \*{8} (\S+) \*{8}").expect("valid marker regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedBlock {
    pub table: String,
    pub marker: Range<usize>,
    /// `None` when no INSERT for the table follows the marker.
    pub statement: Option<Range<usize>>,
}

#[derive(Debug)]
pub struct SeedDocument<'a> {
    text: &'a str,
    blocks: Vec<SeedBlock>,
}

impl<'a> SeedDocument<'a> {
    pub fn parse(text: &'a str) -> Self {
        let mut blocks: Vec<SeedBlock> = Vec::new();

        for captures in MARKER_RE.captures_iter(text) {
            let (Some(marker), Some(table)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            // only the first marker of a table counts
            if blocks.iter().any(|block| block.table == table.as_str()) {
                continue;
            }

            blocks.push(SeedBlock {
                table: table.as_str().to_string(),
                marker: marker.range(),
                statement: find_insert(text, marker.end(), table.as_str()),
            });
        }

        Self { text, blocks }
    }

    pub fn blocks(&self) -> &[SeedBlock] {
        &self.blocks
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|block| block.table.as_str())
    }

    fn statement_range(&self, table: &str) -> Result<Range<usize>, SpliceError> {
        let block = self
            .blocks
            .iter()
            .find(|block| block.table == table)
            .ok_or_else(|| SpliceError::MarkerNotFound(table.to_string()))?;

        block
            .statement
            .clone()
            .ok_or_else(|| SpliceError::InsertNotFound(table.to_string()))
    }

    /// Current INSERT statement of the table's block, semicolon included.
    pub fn statement(&self, table: &str) -> Result<&'a str, SpliceError> {
        let range = self.statement_range(table)?;

        Ok(&self.text[range])
    }

    /// The whole document with the table's INSERT statement swapped for `new_statement`.
    pub fn replace(&self, table: &str, new_statement: &str) -> Result<String, SpliceError> {
        let range = self.statement_range(table)?;

        let mut updated =
            String::with_capacity(self.text.len() - range.len() + new_statement.len());
        updated.push_str(&self.text[..range.start]);
        updated.push_str(new_statement);
        updated.push_str(&self.text[range.end..]);

        Ok(updated)
    }
}

pub fn replace(document: &str, table: &str, new_statement: &str) -> Result<String, SpliceError> {
    SeedDocument::parse(document).replace(table, new_statement)
}

pub fn extract<'a>(document: &'a str, table: &str) -> Result<&'a str, SpliceError> {
    SeedDocument::parse(document).statement(table)
}

/// Span of the first `INSERT INTO <table> (...;` at or after `from`.
fn find_insert(text: &str, from: usize, table: &str) -> Option<Range<usize>> {
    let pattern = format!(r"(?i)INSERT\s+INTO\s+{}\s*\(", regex::escape(table));
    let insert_re = Regex::new(&pattern).ok()?;

    let found = insert_re.find(&text[from..])?;
    let start = from + found.start();
    let end = statement_end(text, from + found.end())?;

    Some(start..end)
}

/// Index just past the first `;` outside quotes and comments, scanning from `from`.
fn statement_end(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut index = from;
    let mut in_string = false;

    while index < bytes.len() {
        match bytes[index] {
            b'\'' => in_string = !in_string,
            b';' if !in_string => return Some(index + 1),
            b'-' if !in_string && bytes.get(index + 1) == Some(&b'-') => {
                // skip to end of line
                index = text[index..].find('\n').map_or(bytes.len(), |offset| index + offset);
                continue;
            }
            _ => {}
        }
        index += 1;
    }

    None
}
