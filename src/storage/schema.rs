//! Database schema definitions

/// Version written to `PRAGMA user_version` once the schema is in place
pub const SCHEMA_VERSION: i64 = 1;

/// SQL to create the courses table
pub const CREATE_COURSES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS courses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    credits INTEGER NOT NULL,
    grade INTEGER NOT NULL
)
"#;

/// Statements that bring a database at `from_version` up to `SCHEMA_VERSION`
pub fn migrations_from(from_version: i64) -> Vec<&'static str> {
    match from_version {
        0 => vec![CREATE_COURSES_TABLE],
        _ => Vec::new(),
    }
}
