//! Data access facade
//!
//! Sits between the controllers and [`CourseStore`]: validates row values,
//! routes by [`CourseUri`] and reports rows-affected counts.

use std::sync::Arc;

use crate::contract::{CourseUri, DEFAULT_AUTHORITY};
use crate::course::{Course, CourseValues, Summary, ValidationRules};
use crate::storage::CourseStore;
use crate::{Error, Result};

/// Shared handle onto the course store.
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone)]
pub struct CourseProvider {
    store: Arc<CourseStore>,
    authority: String,
    rules: ValidationRules,
}

impl CourseProvider {
    pub fn new(store: CourseStore) -> Self {
        Self::with_settings(store, DEFAULT_AUTHORITY, ValidationRules::default())
    }

    pub fn with_settings(store: CourseStore, authority: impl Into<String>, rules: ValidationRules) -> Self {
        Self {
            store: Arc::new(store),
            authority: authority.into(),
            rules,
        }
    }

    /// Provider over a fresh in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(CourseStore::open_in_memory()?))
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// URI of the whole collection under this provider's authority
    pub fn collection_uri(&self) -> CourseUri {
        CourseUri::Collection { authority: self.authority.clone() }
    }

    /// URI of one course under this provider's authority
    pub fn item_uri(&self, id: i64) -> CourseUri {
        self.collection_uri().with_id(id)
    }

    /// Parse a URI string and require this provider's authority
    pub fn parse_uri(&self, uri: &str) -> Result<CourseUri> {
        CourseUri::parse_for(uri, &self.authority)
    }

    // ========== Typed operations ==========

    pub fn list(&self) -> Result<Vec<Course>> {
        let courses = self.store.list()?;
        tracing::debug!("Loaded {} courses", courses.len());
        Ok(courses)
    }

    pub fn get(&self, id: i64) -> Result<Option<Course>> {
        self.store.get(id)
    }

    /// Insert a course, returning its id
    pub fn insert(&self, values: &CourseValues) -> Result<i64> {
        let course = values.validate(&self.rules).inspect_err(|e| {
            tracing::warn!("Rejected insert: {}", e);
        })?;
        let id = self.store.insert(&course)?;
        tracing::info!("Inserted course {} ({})", id, course.name);
        Ok(id)
    }

    /// Replace all fields of a course, returning rows affected
    pub fn update(&self, id: i64, values: &CourseValues) -> Result<usize> {
        let course = values.validate(&self.rules).inspect_err(|e| {
            tracing::warn!("Rejected update of course {}: {}", id, e);
        })?;
        let affected = self.store.update(id, &course)?;
        tracing::info!("Updated course {} ({} rows)", id, affected);
        Ok(affected)
    }

    /// Delete one course, returning rows affected
    pub fn delete(&self, id: i64) -> Result<usize> {
        let affected = self.store.delete(id)?;
        tracing::info!("Deleted course {} ({} rows)", id, affected);
        Ok(affected)
    }

    /// Delete every course, returning rows affected
    pub fn delete_all(&self) -> Result<usize> {
        let affected = self.store.delete_all()?;
        tracing::info!("{} rows deleted from course database", affected);
        Ok(affected)
    }

    /// Aggregate over the full table; `None` when it is empty
    pub fn summary(&self) -> Result<Option<Summary>> {
        self.store.summary()
    }

    // ========== URI-routed operations ==========

    /// Rows addressed by `uri`: every course, or zero/one course
    pub fn query(&self, uri: &CourseUri) -> Result<Vec<Course>> {
        self.check_authority(uri)?;
        match uri {
            CourseUri::Collection { .. } => self.list(),
            CourseUri::Item { id, .. } => Ok(self.get(*id)?.into_iter().collect()),
        }
    }

    /// Insert into the collection, returning the new item URI
    pub fn insert_at(&self, uri: &CourseUri, values: &CourseValues) -> Result<CourseUri> {
        self.check_authority(uri)?;
        match uri {
            CourseUri::Collection { .. } => {
                let id = self.insert(values)?;
                Ok(uri.with_id(id))
            }
            CourseUri::Item { .. } => Err(Error::UnsupportedOperation(format!(
                "Insertion is not supported for {}",
                uri
            ))),
        }
    }

    /// Update the course at an item URI
    pub fn update_at(&self, uri: &CourseUri, values: &CourseValues) -> Result<usize> {
        self.check_authority(uri)?;
        match uri {
            CourseUri::Item { id, .. } => self.update(*id, values),
            CourseUri::Collection { .. } => Err(Error::UnsupportedOperation(format!(
                "Update is not supported for {}",
                uri
            ))),
        }
    }

    /// Delete one course (item URI) or all of them (collection URI)
    pub fn delete_at(&self, uri: &CourseUri) -> Result<usize> {
        self.check_authority(uri)?;
        match uri {
            CourseUri::Item { id, .. } => self.delete(*id),
            CourseUri::Collection { .. } => self.delete_all(),
        }
    }

    /// MIME type for the result set addressed by `uri`
    pub fn mime_type(&self, uri: &CourseUri) -> Result<String> {
        self.check_authority(uri)?;
        Ok(uri.mime_type())
    }

    fn check_authority(&self, uri: &CourseUri) -> Result<()> {
        if uri.authority() == self.authority {
            Ok(())
        } else {
            Err(Error::InvalidUri(format!("Unknown URI {}", uri)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> CourseProvider {
        CourseProvider::in_memory().unwrap()
    }

    #[test]
    fn test_insert_then_get() {
        let p = provider();
        let id = p.insert(&CourseValues::new("Algorithms", 4, 95)).unwrap();
        let course = p.get(id).unwrap().unwrap();
        assert_eq!(course, Course { id, name: "Algorithms".into(), credits: 4, grade: 95 });
    }

    #[test]
    fn test_insert_with_missing_field_is_rejected() {
        let p = provider();
        let values = CourseValues { name: Some("History".into()), credits: None, grade: Some(85) };
        assert!(p.insert(&values).unwrap_err().is_validation());
        assert!(p.list().unwrap().is_empty());
    }

    #[test]
    fn test_update_only_touches_target_row() {
        let p = provider();
        let a = p.insert(&CourseValues::new("Algorithms", 4, 95)).unwrap();
        let b = p.insert(&CourseValues::new("History", 3, 85)).unwrap();
        let before_b = p.get(b).unwrap();

        assert_eq!(p.update(a, &CourseValues::new("Compilers", 5, 88)).unwrap(), 1);
        assert_eq!(p.get(a).unwrap().unwrap().name, "Compilers");
        assert_eq!(p.get(b).unwrap(), before_b);
    }

    #[test]
    fn test_update_requires_all_fields() {
        let p = provider();
        let id = p.insert(&CourseValues::new("Algorithms", 4, 95)).unwrap();
        let partial = CourseValues { name: Some("Algo".into()), ..Default::default() };
        assert!(p.update(id, &partial).unwrap_err().is_validation());
        assert_eq!(p.get(id).unwrap().unwrap().name, "Algorithms");
    }

    #[test]
    fn test_delete_missing_reports_zero() {
        let p = provider();
        p.insert(&CourseValues::new("Algorithms", 4, 95)).unwrap();
        assert_eq!(p.delete(12345).unwrap(), 0);
        assert_eq!(p.list().unwrap().len(), 1);
    }

    #[test]
    fn test_uri_routing() {
        let p = provider();
        let collection = p.collection_uri();

        let uri = p.insert_at(&collection, &CourseValues::new("Algorithms", 4, 95)).unwrap();
        p.insert_at(&collection, &CourseValues::new("History", 3, 85)).unwrap();
        assert_eq!(p.query(&collection).unwrap().len(), 2);
        assert_eq!(p.query(&uri).unwrap().len(), 1);
        assert!(p.query(&p.item_uri(999)).unwrap().is_empty());

        assert!(matches!(
            p.insert_at(&uri, &CourseValues::new("X", 1, 1)),
            Err(Error::UnsupportedOperation(_))
        ));
        assert!(matches!(
            p.update_at(&collection, &CourseValues::new("X", 1, 1)),
            Err(Error::UnsupportedOperation(_))
        ));

        assert_eq!(p.update_at(&uri, &CourseValues::new("Algorithms", 4, 100)).unwrap(), 1);
        assert_eq!(p.delete_at(&uri).unwrap(), 1);
        assert_eq!(p.delete_at(&collection).unwrap(), 1);
        assert!(p.query(&collection).unwrap().is_empty());
    }

    #[test]
    fn test_foreign_authority_is_rejected() {
        let p = provider();
        let foreign = CourseUri::Collection { authority: "someone.else".into() };
        assert!(matches!(p.query(&foreign), Err(Error::InvalidUri(_))));
        assert!(p.parse_uri("content://someone.else/courses").is_err());
        assert_eq!(
            p.mime_type(&p.collection_uri()).unwrap(),
            "vnd.cursor.dir/coursebook.courses/courses"
        );
    }

    #[test]
    fn test_summary_example() {
        let p = provider();
        p.insert(&CourseValues::new("Algorithms", 4, 95)).unwrap();
        p.insert(&CourseValues::new("History", 3, 85)).unwrap();
        let summary = p.summary().unwrap().unwrap();
        assert_eq!(summary.average_text(), "90");
        assert_eq!(summary.total_credits, 7);

        p.delete_all().unwrap();
        assert!(p.list().unwrap().is_empty());
        assert!(p.summary().unwrap().is_none());
    }
}
