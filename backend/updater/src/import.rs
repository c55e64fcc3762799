//! # CSV Import
//!
//! Turns a spreadsheet export into rows ready for the seed script.
//!
//! 1. Strip a UTF-8 byte-order mark, spreadsheet exports often carry one.
//! 2. Map headers onto canonical columns through [`HEADER_ALIASES`], unknown headers are ignored.
//! 3. Trim every value and drop rows without a course name or a teacher.
//! 4. Blank categories become [`PLACEHOLDER_CATEGORY`].
//! 5. If the current database lists categories, unknown ones also become the
//!    placeholder and are counted for the report.
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs,
    path::Path,
};

use csv::{ReaderBuilder, StringRecord};
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, warn};

use crate::{
    error::ImportError,
    models::{CourseRow, HEADER_ALIASES, PLACEHOLDER_CATEGORY},
};

const BOM: char = '\u{feff}';

#[derive(Debug, Default)]
pub struct ImportedRows {
    pub rows: Vec<CourseRow>,
    /// Rows skipped for missing a course name or teacher.
    pub dropped: usize,
}

/// Canonical column name to header index.
pub fn normalize_headers(headers: &StringRecord) -> HashMap<&'static str, usize> {
    let headers: Vec<String> = headers
        .iter()
        .map(|header| header.trim().to_lowercase())
        .collect();

    HEADER_ALIASES
        .iter()
        .filter_map(|(column, aliases)| {
            aliases
                .iter()
                .find_map(|alias| {
                    let alias = alias.to_lowercase();
                    headers.iter().position(|header| *header == alias)
                })
                .map(|index| (*column, index))
        })
        .collect()
}

pub fn read_csv_rows(csv_path: &Path) -> Result<ImportedRows, ImportError> {
    let text = fs::read_to_string(csv_path)?;

    parse_csv(&text)
}

pub fn parse_csv(text: &str) -> Result<ImportedRows, ImportError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().all(|header| header.trim().is_empty()) {
        return Err(ImportError::MissingHeader);
    }

    let mapping = normalize_headers(&headers);
    debug!("Mapped CSV columns: {mapping:?}");

    let mut imported = ImportedRows::default();

    for record in reader.records() {
        let record = record?;
        let mut row = CourseRow::from_columns(|column| {
            mapping.get(column).and_then(|&index| record.get(index))
        });

        if !row.has_required_fields() {
            imported.dropped += 1;
            continue;
        }

        if row.category.is_empty() {
            row.category = PLACEHOLDER_CATEGORY.to_string();
        }

        imported.rows.push(row);
    }

    Ok(imported)
}

/// Category names known to the current database. Empty if there is none yet.
pub fn allowed_categories(db_path: &Path) -> BTreeSet<String> {
    if !db_path.exists() {
        return BTreeSet::new();
    }

    let read = || -> rusqlite::Result<BTreeSet<String>> {
        let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let mut statement = conn.prepare("SELECT name FROM categories ORDER BY name")?;

        let names = statement
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<BTreeSet<String>>>()?;

        Ok(names)
    };

    read().unwrap_or_else(|e| {
        warn!("Could not read categories from {}: {e}", db_path.display());
        BTreeSet::new()
    })
}

/// Coerces categories outside `allowed` to the placeholder.
///
/// Returns the replaced values with their row counts, most frequent first, ties
/// alphabetical. Nothing is coerced when `allowed` is empty.
pub fn map_categories(rows: &mut [CourseRow], allowed: &BTreeSet<String>) -> Vec<(String, usize)> {
    let mut unknown: BTreeMap<String, usize> = BTreeMap::new();

    for row in rows.iter_mut() {
        let category = row.category.trim();

        if category.is_empty() || category == PLACEHOLDER_CATEGORY {
            row.category = PLACEHOLDER_CATEGORY.to_string();
            continue;
        }

        if !allowed.is_empty() && !allowed.contains(category) {
            *unknown.entry(category.to_string()).or_default() += 1;
            row.category = PLACEHOLDER_CATEGORY.to_string();
        }
    }

    let mut report: Vec<(String, usize)> = unknown.into_iter().collect();
    report.sort_by(|(a_name, a_count), (b_name, b_count)| {
        b_count.cmp(a_count).then_with(|| a_name.cmp(b_name))
    });

    report
}
