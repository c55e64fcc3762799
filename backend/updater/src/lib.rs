//! # Seed Updater
//!
//! Replaces the rows of one content tab with the contents of a spreadsheet export.
//!
//! ## Flow
//! 1. Read the CSV and normalize it, see [import].
//!
//! 2. Check categories against the `categories` table of the current database, if there
//!    is one. Unknown categories become the placeholder and are listed in the report.
//!
//! 3. Generate one multi-row INSERT for the table, see [sql].
//!
//! 4. Splice it into the seed script in place of the table's current block, see [splice].
//!
//! 5. When rebuilding, read the schema script too. Only now touch the disk: back up the
//!    database and the seed script as `<path>.bak.<YYYYmmdd-HHMMSS>`, then write the new
//!    seed script.
//!
//! 6. Unless `--no-rebuild`, build a fresh database from the schema and seed scripts and
//!    rename it over the old one, see [rebuild].
//!
//! Everything up to step 5 happens in memory, so a bad CSV or a seed script without the
//! expected block leaves every file as it was.
//!
//! ## Notes
//! - The server opens the database read-only and caches tab rows for a minute, run the
//!   updater while nobody is looking or rebuild the image afterwards.
//! - Rollback is manual, copy the backups back in place.
use std::{
    fs,
    path::{Path, PathBuf},
};

use catalog::Tab;
use tracing::{info, warn};

pub mod error;
pub mod import;
pub mod models;
pub mod rebuild;
pub mod splice;
pub mod sql;
pub mod utils;

use error::UpdateError;
use import::{allowed_categories, map_categories, read_csv_rows};
use models::{PLACEHOLDER_CATEGORY, PreviewRow};
use rebuild::{build_and_swap, preview_rows};
use sql::generate_insert;
use utils::backup_file;

#[derive(Debug, Clone)]
pub struct Options {
    pub csv_path: PathBuf,
    pub tab: Tab,
    pub db_path: PathBuf,
    pub schema_path: PathBuf,
    pub seed_path: PathBuf,
    pub rebuild: bool,
    pub preview: usize,
}

#[derive(Debug, Default)]
pub struct Outcome {
    pub imported: usize,
    pub dropped: usize,
    pub unknown_categories: Vec<(String, usize)>,
    pub db_backup: Option<PathBuf>,
    pub seed_backup: Option<PathBuf>,
    pub rebuilt: bool,
    pub preview: Vec<PreviewRow>,
}

pub fn update_tab(options: &Options) -> Result<Outcome, UpdateError> {
    let tab = options.tab;
    let table = tab.table();

    if !options.csv_path.exists() {
        return Err(UpdateError::CsvNotFound(options.csv_path.clone()));
    }

    println!("Selected: {}  → table: {table}", tab.grade_label());

    let imported = read_csv_rows(&options.csv_path)?;
    let mut rows = imported.rows;
    info!("Read {} rows, dropped {}", rows.len(), imported.dropped);

    let allowed = allowed_categories(&options.db_path);
    let unknown_categories = map_categories(&mut rows, &allowed);
    report_unknown_categories(&unknown_categories);

    if rows.is_empty() {
        return Err(UpdateError::NoRows);
    }

    let new_sql = generate_insert(table, &rows);

    let seed_text =
        fs::read_to_string(&options.seed_path).map_err(UpdateError::file(&options.seed_path))?;
    let updated_seed = splice::replace(&seed_text, table, &new_sql)?;

    // the rebuild runs from these in-memory scripts, not from a re-read of the files
    let schema = options
        .rebuild
        .then(|| fs::read_to_string(&options.schema_path))
        .transpose()
        .map_err(UpdateError::file(&options.schema_path))?;

    let db_backup = backup(&options.db_path, "DB")?;
    let seed_backup = backup(&options.seed_path, "seed")?;

    fs::write(&options.seed_path, &updated_seed).map_err(UpdateError::file(&options.seed_path))?;
    println!("\nUpdated {} for table '{table}'.", options.seed_path.display());

    let mut outcome = Outcome {
        imported: rows.len(),
        dropped: imported.dropped,
        unknown_categories,
        db_backup,
        seed_backup,
        ..Outcome::default()
    };

    let Some(schema) = schema else {
        println!("\nSkipping DB rebuild (--no-rebuild).");
        return Ok(outcome);
    };

    println!(
        "\nRebuilding database from {} + {} ...",
        options.schema_path.display(),
        options.seed_path.display()
    );
    build_and_swap(&options.db_path, &schema, &updated_seed)?;
    outcome.rebuilt = true;
    println!("Rebuild complete.");

    outcome.preview = preview_rows(&options.db_path, table, options.preview)?;
    print_preview(table, options.preview, &outcome.preview);

    Ok(outcome)
}

fn backup(path: &Path, what: &str) -> Result<Option<PathBuf>, UpdateError> {
    let backup = backup_file(path).map_err(UpdateError::file(path))?;

    if let Some(backup) = &backup {
        println!("Backed up {what} to: {}", backup.display());
    }

    Ok(backup)
}

fn report_unknown_categories(report: &[(String, usize)]) {
    if report.is_empty() {
        return;
    }

    warn!("{} unknown categories mapped to {PLACEHOLDER_CATEGORY}", report.len());
    println!(
        "\nWARNING: Some categories in the CSV were not in the categories table and were mapped to '{PLACEHOLDER_CATEGORY}':"
    );
    for (name, count) in report {
        println!("  - {name} ({count} rows)");
    }
}

fn print_preview(table: &str, limit: usize, rows: &[PreviewRow]) {
    println!("\nPreview from '{table}' (top {limit}):");

    for row in rows {
        println!(
            "- id={}, course_name={}, teacher_name={}, category={}",
            row.id, row.course_name, row.teacher_name, row.category
        );
    }
}
