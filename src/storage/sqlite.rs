//! SQLite storage implementation

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use rusqlite::{Connection, params, OptionalExtension};
use crate::{Result, Error};
use crate::course::{Course, NewCourse, Summary};
use super::schema;

const SELECT_COURSE: &str = "SELECT id, name, credits, grade FROM courses";

/// SQLite-backed storage for courses.
///
/// The connection sits behind a mutex, so one store can be shared between
/// the thread issuing writes and background loaders.
pub struct CourseStore {
    conn: Mutex<Connection>,
}

impl CourseStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        tracing::debug!("Opened course store at {}", path.display());
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self { conn: Mutex::new(conn) };
        store.initialize_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::LockPoisoned)
    }

    /// Create or migrate the schema, tracked through `PRAGMA user_version`
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        let pending = schema::migrations_from(version);
        if pending.is_empty() {
            return Ok(());
        }

        for stmt in pending {
            conn.execute(stmt, [])?;
        }
        conn.pragma_update(None, "user_version", schema::SCHEMA_VERSION)?;
        tracing::debug!("Migrated course schema from v{} to v{}", version, schema::SCHEMA_VERSION);
        Ok(())
    }

    /// Schema version recorded in the database
    pub fn schema_version(&self) -> Result<i64> {
        let version = self.conn()?.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    // ========== Course Operations ==========

    /// All courses, ordered by id
    pub fn list(&self) -> Result<Vec<Course>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COURSE))?;
        let courses = stmt
            .query_map([], row_to_course)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(courses)
    }

    /// Get a course by id
    pub fn get(&self, id: i64) -> Result<Option<Course>> {
        self.conn()?
            .query_row(&format!("{} WHERE id = ?1", SELECT_COURSE), [id], row_to_course)
            .optional()
            .map_err(Into::into)
    }

    /// Insert a course, returning its new id
    pub fn insert(&self, course: &NewCourse) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO courses (name, credits, grade) VALUES (?1, ?2, ?3)",
            params![course.name, course.credits, course.grade],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Replace the fields of one course, returning rows affected
    pub fn update(&self, id: i64, course: &NewCourse) -> Result<usize> {
        let affected = self.conn()?.execute(
            "UPDATE courses SET name = ?1, credits = ?2, grade = ?3 WHERE id = ?4",
            params![course.name, course.credits, course.grade, id],
        )?;
        Ok(affected)
    }

    /// Delete one course, returning rows affected
    pub fn delete(&self, id: i64) -> Result<usize> {
        let affected = self.conn()?.execute("DELETE FROM courses WHERE id = ?1", [id])?;
        Ok(affected)
    }

    /// Delete every course, returning rows affected
    pub fn delete_all(&self) -> Result<usize> {
        let affected = self.conn()?.execute("DELETE FROM courses", [])?;
        Ok(affected)
    }

    /// Count all courses
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn()?.query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Average grade and credit sum over the whole table.
    ///
    /// `None` when the table is empty.
    pub fn summary(&self) -> Result<Option<Summary>> {
        let (average, total): (Option<f64>, Option<i64>) = self.conn()?.query_row(
            "SELECT AVG(grade), SUM(credits) FROM courses",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(match (average, total) {
            (Some(average_grade), Some(total_credits)) => Some(Summary { average_grade, total_credits }),
            _ => None,
        })
    }
}

/// Helper to convert a row to a Course
fn row_to_course(row: &rusqlite::Row) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        name: row.get(1)?,
        credits: row.get(2)?,
        grade: row.get(3)?,
    })
}
