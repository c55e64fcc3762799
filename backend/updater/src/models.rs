/// Category used when a row has none or one the database does not know.
pub const PLACEHOLDER_CATEGORY: &str = "כללי";

/// Lower-cased values read as true, everything else is false.
pub const TRUTHY: [&str; 7] = ["1", "true", "yes", "y", "on", "כן", "נכון"];

/// Accepted header spellings per column, matched case-insensitively in this order.
pub const HEADER_ALIASES: [(&str, &[&str]); 10] = [
    (
        "course_name",
        &["course_name", "corese_name", "course", "course title", "שם קורס", "שם שיעור"],
    ),
    ("teacher_name", &["teacher_name", "teacher", "מורה", "שם מורה"]),
    ("intended_for", &["intended_for", "target", "מיועד ל"]),
    (
        "course_info",
        &["course_info", "description", "about", "תיאור", "מידע על הקורס"],
    ),
    ("requirements", &["requirements", "requirments", "דרישות"]),
    ("category", &["category", "קטגוריה"]),
    (
        "allow_volunteers",
        &["allow_volunteers", "allow_valenteres", "מתנדבים"],
    ),
    (
        "volunteers_age",
        &["volunteers_age", "valentieres_age", "גיל מתנדבים"],
    ),
    (
        "max_volunteers",
        &["max_volunteers", "max_valetires", "מקס מתנדבים", "כמות מתנדבים מקס"],
    ),
    ("additional_info", &["additional_info", "notes", "מידע נוסף"]),
];

/// One spreadsheet row, trimmed, in [`catalog::CONTENT_COLUMNS`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseRow {
    pub course_name: String,
    pub teacher_name: String,
    pub intended_for: String,
    pub course_info: String,
    pub requirements: String,
    pub category: String,
    pub allow_volunteers: String,
    pub volunteers_age: String,
    pub max_volunteers: String,
    pub additional_info: String,
}

impl CourseRow {
    /// Builds a row from a lookup of canonical column name to raw value.
    pub fn from_columns<'a>(mut value: impl FnMut(&str) -> Option<&'a str>) -> Self {
        let mut field = |column: &str| value(column).unwrap_or("").trim().to_string();

        Self {
            course_name: field("course_name"),
            teacher_name: field("teacher_name"),
            intended_for: field("intended_for"),
            course_info: field("course_info"),
            requirements: field("requirements"),
            category: field("category"),
            allow_volunteers: field("allow_volunteers"),
            volunteers_age: field("volunteers_age"),
            max_volunteers: field("max_volunteers"),
            additional_info: field("additional_info"),
        }
    }

    pub fn has_required_fields(&self) -> bool {
        !self.course_name.is_empty() && !self.teacher_name.is_empty()
    }
}

/// Latest rows of a table after a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    pub id: i64,
    pub course_name: String,
    pub teacher_name: String,
    pub category: String,
}
