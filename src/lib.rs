//! # Coursebook - course tracker
//!
//! Keeps a list of academic courses (name, credits, grade) in a local SQLite
//! store and derives a running summary from it.
//!
//! Coursebook provides:
//! - A URI-addressed data access facade over a single `courses` table
//! - Background loads that deliver their result exactly once
//! - Presentation-independent controllers for the course list and the editor
//! - A CLI and a small JSON HTTP API driving those controllers

pub mod contract;
pub mod course;
pub mod storage;
pub mod provider;
pub mod loader;
pub mod catalog;
pub mod editor;
pub mod config;
pub mod server;
pub mod ui;

// Re-exports for convenient access
pub use contract::CourseUri;
pub use course::{Course, CourseValues, NewCourse, Summary, ValidationRules};
pub use storage::CourseStore;
pub use provider::CourseProvider;
pub use catalog::CatalogController;
pub use editor::{EditorController, EditorMode};

/// Result type alias for Coursebook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Coursebook operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Course not found: {0}")]
    CourseNotFound(i64),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// True for failures caused by bad input rather than by the store
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
