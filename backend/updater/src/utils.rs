use std::{
    fs, io,
    path::{Path, PathBuf},
};

use catalog::Tab;
use chrono::prelude::*;

pub fn timestamp() -> String {
    Local::now().format("%Y%m%d-%H%M%S").to_string()
}

pub fn backup_path(path: &Path, stamp: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".bak.{stamp}"));

    PathBuf::from(name)
}

/// Copies `path` next to itself as `<path>.bak.<timestamp>`. Nothing to do if it does not exist.
pub fn backup_file(path: &Path) -> io::Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let backup = backup_path(path, &timestamp());
    fs::copy(path, &backup)?;

    Ok(Some(backup))
}

/// Accepts a content tab id (`hs`), its table (`highschool`) or its menu number (`1`-`6`).
pub fn parse_content_tab(input: &str) -> Result<Tab, String> {
    let input = input.trim();

    let tab = match input.parse::<usize>() {
        Ok(number) => number
            .checked_sub(1)
            .and_then(|index| Tab::CONTENT.get(index).copied()),
        Err(_) => Tab::from_id(input).or_else(|| Tab::from_table(input)),
    };

    match tab {
        Some(tab) if tab.is_content() => Ok(tab),
        _ => Err(format!(
            "expected one of {}",
            Tab::CONTENT
                .iter()
                .enumerate()
                .map(|(index, tab)| format!("{} ({}, {})", index + 1, tab.id(), tab.table()))
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_tab() {
        assert_eq!(parse_content_tab("hs"), Ok(Tab::HighSchool));
        assert_eq!(parse_content_tab("highschool"), Ok(Tab::HighSchool));
        assert_eq!(parse_content_tab(" Docs "), Ok(Tab::Docs));
        assert_eq!(parse_content_tab("1"), Ok(Tab::Docs));
        assert_eq!(parse_content_tab("6"), Ok(Tab::HighSchool));
    }

    #[test]
    fn test_parse_content_tab_rejects() {
        assert!(parse_content_tab("home").is_err());
        assert!(parse_content_tab("home_items").is_err());
        assert!(parse_content_tab("0").is_err());
        assert!(parse_content_tab("7").is_err());
        assert!(parse_content_tab("").is_err());
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("app/app.db"), "20250101-120000"),
            PathBuf::from("app/app.db.bak.20250101-120000")
        );
    }

    #[test]
    fn test_backup_file() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("seed.sql");

        assert_eq!(backup_file(&seed).unwrap(), None);

        fs::write(&seed, "-- seed").unwrap();
        let backup = backup_file(&seed).unwrap().unwrap();

        assert_eq!(fs::read_to_string(backup).unwrap(), "-- seed");
        assert_eq!(fs::read_to_string(&seed).unwrap(), "-- seed");
    }
}
