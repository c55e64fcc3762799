//! # SQLite
//!
//! Read-only store behind the site.
//!
//! ## Requirements
//!
//! - Never written by the service, the file is baked into the image
//! - Handful of tables, a few hundred rows at most
//! - Settings read on every page render, tab rows read through the [cache](crate::cache)
//!
//! ## Implementation
//!
//! - Every read opens its own connection as `file:<path>?mode=ro&immutable=1` so
//!   SQLite never tries to create journal or WAL files next to the database
//! - Reads are blocking and run on tokio's blocking pool
//! - Rows are returned as JSON objects keyed by column name
use std::{path::Path, sync::Arc};

use catalog::{FLAG_COLUMN, Tab};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row as SqlRow, types::ValueRef};
use serde::Serialize;
use serde_json::{Map, Number, Value};

pub type Row = Map<String, Value>;
pub type Rows = Arc<Vec<Row>>;

pub fn connect(db_path: &Path) -> rusqlite::Result<Connection> {
    let uri = format!("file:{}?mode=ro&immutable=1", db_path.display());

    Connection::open_with_flags(
        uri,
        OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
}

/// All rows of the tab's table, newest first.
pub fn fetch_rows(db_path: &Path, tab: Tab) -> rusqlite::Result<Rows> {
    let conn = connect(db_path)?;

    // table names come from the catalog, never from the request
    let mut statement = conn.prepare(&format!("SELECT * FROM {} ORDER BY id DESC", tab.table()))?;
    let columns: Vec<String> = statement
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let rows = statement
        .query_map([], |row| to_json_row(&columns, row))?
        .collect::<rusqlite::Result<Vec<Row>>>()?;

    Ok(Arc::new(rows))
}

fn to_json_row(columns: &[String], row: &SqlRow<'_>) -> rusqlite::Result<Row> {
    let mut object = Map::with_capacity(columns.len() + 1);

    for (index, column) in columns.iter().enumerate() {
        object.insert(column.clone(), to_json_value(row.get_ref(index)?));
    }

    let flag = object.get(FLAG_COLUMN).is_some_and(is_truthy);
    object.insert(FLAG_COLUMN.to_string(), Value::Bool(flag));

    Ok(object)
}

fn to_json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(int) => Value::from(int),
        ValueRef::Real(real) => Number::from_f64(real).map_or(Value::Null, Value::Number),
        ValueRef::Text(text) | ValueRef::Blob(text) => {
            Value::String(String::from_utf8_lossy(text).into_owned())
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tab_home: String,
    pub tab_docs: String,
    pub tab_tasks: String,
    pub tab_notes: String,
    pub tab_alerts: String,
    pub tab_links: String,
    pub tab_highschool: String,
    pub home_title: String,
    pub home_description: String,
}

impl Settings {
    /// Shown until the database has been seeded.
    pub fn fallback() -> Self {
        Self {
            tab_home: "בית".to_string(),
            tab_docs: "מסמכים".to_string(),
            tab_tasks: "משימות".to_string(),
            tab_notes: "פתקים".to_string(),
            tab_alerts: "התראות".to_string(),
            tab_links: "קישורים".to_string(),
            tab_highschool: "תיכון".to_string(),
            home_title: "ברוכים הבאים".to_string(),
            home_description: "אנא הריצו את קבצי schema.sql ו-seed.sql כדי לטעון נתונים לדוגמה."
                .to_string(),
        }
    }

    pub fn label(&self, tab: Tab) -> &str {
        match tab {
            Tab::Home => &self.tab_home,
            Tab::Docs => &self.tab_docs,
            Tab::Tasks => &self.tab_tasks,
            Tab::Notes => &self.tab_notes,
            Tab::Alerts => &self.tab_alerts,
            Tab::Links => &self.tab_links,
            Tab::HighSchool => &self.tab_highschool,
        }
    }
}

pub fn fetch_settings(db_path: &Path) -> rusqlite::Result<Settings> {
    let conn = connect(db_path)?;

    let settings = conn
        .query_row(
            "SELECT tab_home, tab_docs, tab_tasks, tab_notes, tab_alerts, tab_links,
                    tab_highschool, home_title, home_description
             FROM main_settings
             ORDER BY id LIMIT 1",
            [],
            |row| {
                Ok(Settings {
                    tab_home: row.get(0)?,
                    tab_docs: row.get(1)?,
                    tab_tasks: row.get(2)?,
                    tab_notes: row.get(3)?,
                    tab_alerts: row.get(4)?,
                    tab_links: row.get(5)?,
                    tab_highschool: row.get(6)?,
                    home_title: row.get(7)?,
                    home_description: row.get(8)?,
                })
            },
        )
        .optional()?;

    Ok(settings.unwrap_or_else(Settings::fallback))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    const SCHEMA: &str = include_str!("../../../db/schema.sql");

    fn scratch_db(seed: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.db");

        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(seed).unwrap();

        (dir, path)
    }

    #[test]
    fn test_rows_newest_first_with_flag() {
        let (_dir, path) = scratch_db(
            "INSERT INTO docs(course_name, teacher_name, allow_volunteers, max_volunteers) VALUES
             ('Algebra', 'Cohen', 1, 3),
             ('ציור', 'לוי', 0, NULL);",
        );

        let rows = fetch_rows(&path, Tab::Docs).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["course_name"], json!("ציור"));
        assert_eq!(rows[0]["allow_volunteers"], json!(false));
        assert_eq!(rows[0]["max_volunteers"], Value::Null);
        assert_eq!(rows[1]["course_name"], json!("Algebra"));
        assert_eq!(rows[1]["allow_volunteers"], json!(true));
        assert_eq!(rows[1]["max_volunteers"], json!(3));
        assert_eq!(rows[1]["id"], json!(1));
    }

    #[test]
    fn test_empty_table() {
        let (_dir, path) = scratch_db("");

        assert!(fetch_rows(&path, Tab::HighSchool).unwrap().is_empty());
    }

    #[test]
    fn test_missing_database_is_error() {
        let dir = tempfile::tempdir().unwrap();

        assert!(fetch_rows(&dir.path().join("missing.db"), Tab::Docs).is_err());
    }

    #[test]
    fn test_settings_fallback_when_empty() {
        let (_dir, path) = scratch_db("");

        assert_eq!(fetch_settings(&path).unwrap(), Settings::fallback());
    }

    #[test]
    fn test_settings_first_row() {
        let (_dir, path) = scratch_db(
            "INSERT INTO main_settings(tab_home, tab_docs, tab_tasks, tab_notes, tab_alerts,
                tab_links, tab_highschool, home_title, home_description)
             VALUES ('Home', 'Kindergarten', 'A-B', 'C-D', 'E-F', 'Middle', 'High', 'Hi', 'Welcome');",
        );

        let settings = fetch_settings(&path).unwrap();

        assert_eq!(settings.home_title, "Hi");
        assert_eq!(settings.label(Tab::Docs), "Kindergarten");
        assert_eq!(settings.label(Tab::HighSchool), "High");
    }

    #[test]
    fn test_truthy() {
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("x")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!("")));
    }
}
