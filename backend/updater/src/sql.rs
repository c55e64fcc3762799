use catalog::CONTENT_COLUMNS;

use crate::models::{CourseRow, TRUTHY};

/// Quoted SQL string with single quotes doubled. Empty values stay `''`.
pub fn string_literal(value: &str) -> String {
    format!("'{}'", value.trim().replace('\'', "''"))
}

/// Integer literal, or `NULL` for anything that does not parse as one.
pub fn integer_or_null(value: &str) -> String {
    value
        .trim()
        .parse::<i64>()
        .map_or_else(|_| "NULL".to_string(), |int| int.to_string())
}

pub fn parse_bool(value: &str) -> bool {
    TRUTHY.contains(&value.trim().to_lowercase().as_str())
}

fn values_tuple(row: &CourseRow) -> String {
    let values = [
        string_literal(&row.course_name),
        string_literal(&row.teacher_name),
        string_literal(&row.intended_for),
        string_literal(&row.course_info),
        string_literal(&row.requirements),
        string_literal(&row.category),
        u8::from(parse_bool(&row.allow_volunteers)).to_string(),
        string_literal(&row.volunteers_age),
        integer_or_null(&row.max_volunteers),
        string_literal(&row.additional_info),
    ];

    format!("({})", values.join(", "))
}

/// One multi-row INSERT for `table`, ending at its semicolon.
pub fn generate_insert(table: &str, rows: &[CourseRow]) -> String {
    let values: Vec<String> = rows.iter().map(values_tuple).collect();

    format!(
        "INSERT INTO {table}({}) VALUES\n{};",
        CONTENT_COLUMNS.join(","),
        values.join(",\n")
    )
}
