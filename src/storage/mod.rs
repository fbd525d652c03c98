//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite table:
//! - courses(id, name, credits, grade)

pub mod schema;
pub mod sqlite;

pub use sqlite::CourseStore;
