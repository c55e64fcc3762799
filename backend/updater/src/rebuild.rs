use std::{
    fs,
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::{Connection, OpenFlags, params};
use tracing::{debug, warn};

use crate::{error::UpdateError, models::PreviewRow};

/// Scratch file the new database is built in before it replaces `db_path`.
pub fn staging_path(db_path: &Path) -> PathBuf {
    let mut name = db_path.as_os_str().to_os_string();
    name.push(".rebuild");

    PathBuf::from(name)
}

/// Builds a fresh database from the schema and seed scripts, then renames it over `db_path`.
///
/// On failure the previous database is left untouched.
pub fn rebuild_db(db_path: &Path, schema_path: &Path, seed_path: &Path) -> Result<(), UpdateError> {
    let schema = fs::read_to_string(schema_path).map_err(UpdateError::file(schema_path))?;
    let seed = fs::read_to_string(seed_path).map_err(UpdateError::file(seed_path))?;

    build_and_swap(db_path, &schema, &seed)
}

/// Same as [`rebuild_db`] with both scripts already in memory.
pub fn build_and_swap(db_path: &Path, schema: &str, seed: &str) -> Result<(), UpdateError> {
    if let Some(parent) = db_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(UpdateError::file(parent))?;
    }

    let staging = staging_path(db_path);
    let result = build(&staging, schema, seed)
        .and_then(|()| fs::rename(&staging, db_path).map_err(UpdateError::file(db_path)));

    if result.is_err() && staging.exists() {
        if let Err(e) = fs::remove_file(&staging) {
            warn!("Could not remove {}: {e}", staging.display());
        }
    }

    result
}

fn build(staging: &Path, schema: &str, seed: &str) -> Result<(), UpdateError> {
    if staging.exists() {
        fs::remove_file(staging).map_err(UpdateError::file(staging))?;
    }

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:20.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let conn = Connection::open(staging)?;

    pb.set_message("schema");
    conn.execute_batch(schema)?;
    pb.inc(1);

    pb.set_message("seed");
    conn.execute_batch(seed)?;
    pb.inc(1);

    pb.set_message("close");
    conn.close().map_err(|(_, e)| e)?;
    pb.inc(1);

    pb.finish_with_message("built");
    debug!("Built {}", staging.display());

    Ok(())
}

pub fn preview_rows(db_path: &Path, table: &str, limit: usize) -> Result<Vec<PreviewRow>, UpdateError> {
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    let mut statement = conn.prepare(&format!(
        "SELECT id, course_name, teacher_name, category FROM {table} ORDER BY id DESC LIMIT ?1"
    ))?;

    let rows = statement
        .query_map(params![limit as i64], |row| {
            Ok(PreviewRow {
                id: row.get(0)?,
                course_name: row.get(1)?,
                teacher_name: row.get(2)?,
                category: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
