//! Course list controller
//!
//! Owns what the list screen shows: bound list items, the empty-state flag
//! and the aggregate summary. Reads run through a [`Loader`]; after any
//! write the controller re-fetches synchronously.

use serde::Serialize;

use crate::course::{Course, Summary};
use crate::editor::EditorMode;
use crate::loader::Loader;
use crate::provider::CourseProvider;
use crate::Result;

/// One bound row of the course list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseListItem {
    pub id: i64,
    pub name: String,
    /// `"<credits> credits"`
    pub credits: String,
    pub grade: String,
}

impl From<&Course> for CourseListItem {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            name: course.name.clone(),
            credits: course.credits_label(),
            grade: course.grade.to_string(),
        }
    }
}

/// Entries of the list screen's overflow menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ContactDeveloper,
    DeleteAllEntries,
}

/// What the front end should do in response to a menu action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEffect {
    /// Open the developer contact page
    OpenUrl(String),
    /// Ask before clearing the table; answer with `confirm_delete_all`
    ConfirmDeleteAll,
}

pub struct CatalogController {
    provider: CourseProvider,
    contact_url: String,
    items: Vec<CourseListItem>,
    summary: Option<Summary>,
    pending: Option<Loader<Vec<Course>>>,
}

impl CatalogController {
    pub fn new(provider: CourseProvider, contact_url: impl Into<String>) -> Self {
        Self {
            provider,
            contact_url: contact_url.into(),
            items: Vec::new(),
            summary: None,
            pending: None,
        }
    }

    /// Start loading every course in the background.
    ///
    /// The list stays empty until the load is delivered.
    pub fn activate(&mut self) {
        self.items.clear();
        let provider = self.provider.clone();
        self.pending = Some(Loader::spawn("course list", move || provider.list()));
    }

    pub fn is_loading(&self) -> bool {
        self.pending.as_ref().is_some_and(|l| !l.is_delivered())
    }

    /// Take a finished load without blocking; returns whether one arrived
    pub fn poll(&mut self) -> Result<bool> {
        let result = match self.pending.as_mut().and_then(Loader::poll) {
            Some(result) => result,
            None => return Ok(false),
        };
        self.pending = None;
        self.on_load_finished(result?)?;
        Ok(true)
    }

    /// Block until the pending load is delivered
    pub fn wait(&mut self) -> Result<()> {
        if let Some(mut loader) = self.pending.take() {
            if let Some(result) = loader.wait() {
                self.on_load_finished(result?)?;
            }
        }
        Ok(())
    }

    fn on_load_finished(&mut self, courses: Vec<Course>) -> Result<()> {
        self.items = courses.iter().map(CourseListItem::from).collect();
        self.refresh_summary()
    }

    /// Synchronous re-fetch of the list and the summary
    pub fn refresh(&mut self) -> Result<()> {
        self.pending = None;
        let courses = self.provider.list()?;
        self.on_load_finished(courses)
    }

    /// Re-run the aggregate over the full table
    pub fn refresh_summary(&mut self) -> Result<()> {
        self.summary = self.provider.summary()?;
        Ok(())
    }

    pub fn items(&self) -> &[CourseListItem] {
        &self.items
    }

    /// Whether the empty-state placeholder is showing
    pub fn shows_empty_state(&self) -> bool {
        self.items.is_empty()
    }

    /// Aggregate display; `None` while the table is empty
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Open the editor on an existing course
    pub fn select(&mut self, id: i64) -> Result<EditorMode> {
        self.refresh_summary()?;
        Ok(EditorMode::Edit(id))
    }

    /// Open the editor on a new course
    pub fn add(&mut self) -> Result<EditorMode> {
        self.refresh_summary()?;
        Ok(EditorMode::Create)
    }

    /// The editor closed; pick up whatever it wrote
    pub fn editor_closed(&mut self) -> Result<()> {
        self.refresh()
    }

    pub fn handle_menu(&self, action: MenuAction) -> CatalogEffect {
        match action {
            MenuAction::ContactDeveloper => CatalogEffect::OpenUrl(self.contact_url.clone()),
            MenuAction::DeleteAllEntries => CatalogEffect::ConfirmDeleteAll,
        }
    }

    /// Clear the table after the user confirmed; returns rows deleted
    pub fn confirm_delete_all(&mut self) -> Result<usize> {
        let deleted = self.provider.delete_all()?;
        self.refresh()?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::CourseValues;

    const CONTACT: &str = "https://example.com/contact";

    fn seeded() -> (CourseProvider, CatalogController) {
        let provider = CourseProvider::in_memory().unwrap();
        provider.insert(&CourseValues::new("Algorithms", 4, 95)).unwrap();
        provider.insert(&CourseValues::new("History", 3, 85)).unwrap();
        let catalog = CatalogController::new(provider.clone(), CONTACT);
        (provider, catalog)
    }

    #[test]
    fn test_activation_loads_items_and_summary() {
        let (_, mut catalog) = seeded();
        catalog.activate();
        assert!(catalog.shows_empty_state());
        assert!(catalog.summary().is_none());

        catalog.wait().unwrap();
        assert!(!catalog.is_loading());
        assert_eq!(catalog.items().len(), 2);
        assert_eq!(catalog.items()[0].name, "Algorithms");
        assert_eq!(catalog.items()[0].credits, "4 credits");
        assert_eq!(catalog.items()[1].grade, "85");

        let summary = catalog.summary().unwrap();
        assert_eq!(summary.average_text(), "90");
        assert_eq!(summary.total_credits, 7);
    }

    #[test]
    fn test_poll_delivers_once() {
        let (_, mut catalog) = seeded();
        catalog.activate();
        while !catalog.poll().unwrap() {
            std::thread::yield_now();
        }
        assert_eq!(catalog.items().len(), 2);
        assert!(!catalog.poll().unwrap());
    }

    #[test]
    fn test_delete_all_needs_confirmation() {
        let (provider, mut catalog) = seeded();
        catalog.refresh().unwrap();

        assert_eq!(catalog.handle_menu(MenuAction::DeleteAllEntries), CatalogEffect::ConfirmDeleteAll);
        assert_eq!(provider.list().unwrap().len(), 2);

        assert_eq!(catalog.confirm_delete_all().unwrap(), 2);
        assert!(catalog.shows_empty_state());
        assert!(catalog.summary().is_none());
    }

    #[test]
    fn test_contact_developer_does_not_clear() {
        let (provider, catalog) = seeded();
        assert_eq!(
            catalog.handle_menu(MenuAction::ContactDeveloper),
            CatalogEffect::OpenUrl(CONTACT.to_string())
        );
        assert_eq!(provider.list().unwrap().len(), 2);
    }

    #[test]
    fn test_editor_round_trip_refreshes() {
        let (provider, mut catalog) = seeded();
        catalog.refresh().unwrap();

        assert_eq!(catalog.add().unwrap(), EditorMode::Create);
        provider.insert(&CourseValues::new("Physics", 5, 60)).unwrap();
        assert_eq!(catalog.items().len(), 2);

        catalog.editor_closed().unwrap();
        assert_eq!(catalog.items().len(), 3);
        assert_eq!(catalog.summary().unwrap().total_credits, 12);

        let id = catalog.items()[2].id;
        assert_eq!(catalog.select(id).unwrap(), EditorMode::Edit(id));
    }
}
