//! # Catalog
//!
//! Names shared by the query service and the seed updater.
//!
//! ## Tabs
//!
//! Every tab of the site is backed by exactly one table. The mapping is fixed at
//! compile time:
//!
//! | id       | table        |
//! |----------|--------------|
//! | `home`   | `home_items` |
//! | `docs`   | `docs`       |
//! | `tasks`  | `tasks`      |
//! | `notes`  | `notes`      |
//! | `alerts` | `alerts`     |
//! | `links`  | `links`      |
//! | `hs`     | `highschool` |
//!
//! `home` is the landing tab. The other six are content tabs, each with its own
//! marker block in the seed script.
//!
//! ## Seed convention
//!
//! ```sql
//! -- ******** docs ********
//! INSERT INTO docs(course_name,teacher_name,...) VALUES
//! ('Algebra', 'Cohen', ...);
//! ```
//!
//! ## Columns
//!
//! [`CONTENT_COLUMNS`] spells `requirements`, `allow_volunteers`, `volunteers_age` and
//! `max_volunteers` correctly. Databases and clients built against the older misspelled
//! columns (`requirments`, `allow_valenteres`, `valentieres_age`, `max_valetires`) are not
//! compatible: the schema differs and so do the `/api/<tab>` JSON keys. Spreadsheet
//! headers with the old spellings are still accepted by the updater.
use std::{fmt, str::FromStr};

use thiserror::Error;

/// Insert order of the content columns. `id` is assigned by SQLite.
pub const CONTENT_COLUMNS: [&str; 10] = [
    "course_name",
    "teacher_name",
    "intended_for",
    "course_info",
    "requirements",
    "category",
    "allow_volunteers",
    "volunteers_age",
    "max_volunteers",
    "additional_info",
];

/// Stored as 0/1, exposed as a boolean.
pub const FLAG_COLUMN: &str = "allow_volunteers";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tab {
    Home,
    Docs,
    Tasks,
    Notes,
    Alerts,
    Links,
    HighSchool,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown tab: {0}")]
pub struct UnknownTab(pub String);

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Home,
        Tab::Docs,
        Tab::Tasks,
        Tab::Notes,
        Tab::Alerts,
        Tab::Links,
        Tab::HighSchool,
    ];

    /// Tabs whose rows come from the seed script, in updater menu order.
    pub const CONTENT: [Tab; 6] = [
        Tab::Docs,
        Tab::Tasks,
        Tab::Notes,
        Tab::Alerts,
        Tab::Links,
        Tab::HighSchool,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Tab::Home => "home",
            Tab::Docs => "docs",
            Tab::Tasks => "tasks",
            Tab::Notes => "notes",
            Tab::Alerts => "alerts",
            Tab::Links => "links",
            Tab::HighSchool => "hs",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            Tab::Home => "home_items",
            Tab::Docs => "docs",
            Tab::Tasks => "tasks",
            Tab::Notes => "notes",
            Tab::Alerts => "alerts",
            Tab::Links => "links",
            Tab::HighSchool => "highschool",
        }
    }

    /// Bootstrap Icons class.
    pub fn icon(self) -> &'static str {
        match self {
            Tab::Home => "bi bi-house",
            Tab::Docs => "bi bi-file-text",
            Tab::Tasks => "bi bi-check2-square",
            Tab::Notes => "bi bi-journal-text",
            Tab::Alerts => "bi bi-bell",
            Tab::Links => "bi bi-link-45deg",
            Tab::HighSchool => "bi bi-mortarboard",
        }
    }

    /// Grade label shown by the updater.
    pub fn grade_label(self) -> &'static str {
        match self {
            Tab::Home => "דף הבית",
            Tab::Docs => "גן",
            Tab::Tasks => "בית א׳-ב׳",
            Tab::Notes => "בית ג׳-ד׳",
            Tab::Alerts => "בית ה׳-ו׳",
            Tab::Links => "בית חט״ב",
            Tab::HighSchool => "תיכון",
        }
    }

    pub fn is_content(self) -> bool {
        self != Tab::Home
    }

    /// Marker comment opening the tab's block in the seed script.
    pub fn seed_marker(self) -> String {
        seed_marker(self.table())
    }

    /// Looks up a tab by id after trimming and lower-casing.
    pub fn from_id(id: &str) -> Option<Tab> {
        let id = id.trim().to_lowercase();

        Tab::ALL.into_iter().find(|tab| tab.id() == id)
    }

    pub fn from_table(table: &str) -> Option<Tab> {
        let table = table.trim().to_lowercase();

        Tab::ALL.into_iter().find(|tab| tab.table() == table)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::from_id(s).ok_or_else(|| UnknownTab(s.to_string()))
    }
}

pub fn seed_marker(table: &str) -> String {
    format!("-- ******** {table} ********")
}
