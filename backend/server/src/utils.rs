use catalog::Tab;

use crate::error::AppError;

/// Page requests never fail on a bad tab, they land on home instead.
pub fn tab_or_home(requested: Option<&str>) -> Tab {
    requested.and_then(Tab::from_id).unwrap_or(Tab::Home)
}

pub fn known_tab(requested: &str) -> Result<Tab, AppError> {
    Tab::from_id(requested).ok_or(AppError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_or_home() {
        assert_eq!(tab_or_home(None), Tab::Home);
        assert_eq!(tab_or_home(Some("")), Tab::Home);
        assert_eq!(tab_or_home(Some("bogus")), Tab::Home);
        assert_eq!(tab_or_home(Some(" HS ")), Tab::HighSchool);
    }

    #[test]
    fn test_known_tab() {
        assert_eq!(known_tab("Links").unwrap(), Tab::Links);
        assert!(matches!(known_tab("highschool"), Err(AppError::NotFound)));
    }
}
