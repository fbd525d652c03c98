//! Course editor controller
//!
//! The mode is fixed at construction: [`EditorMode::Create`] starts from
//! empty fields, [`EditorMode::Edit`] loads one course in the background.
//! Actions return prompts and notices as values; the front end shows them
//! and answers prompts through the matching `confirm_*`/`resolve_*` call.

use std::fmt;

use crate::course::{Course, CourseValues};
use crate::loader::Loader;
use crate::provider::CourseProvider;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Credits,
    Grade,
}

/// Outcome of trying to leave the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leave {
    /// Nothing unsaved; the screen is closed
    Proceed,
    /// Unsaved changes; answer with `resolve_unsaved`
    ConfirmDiscard,
}

/// Answer to the unsaved-changes prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsavedChoice {
    Discard,
    KeepEditing,
}

/// Transient message reporting how a write went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Inserted(i64),
    InsertFailed,
    Updated,
    UpdateFailed,
    Deleted,
    DeleteFailed,
    /// Input was rejected before reaching the store
    Invalid(String),
}

impl Notice {
    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Inserted(_) | Notice::Updated | Notice::Deleted)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Inserted(_) => write!(f, "Course saved"),
            Notice::InsertFailed => write!(f, "Error with saving course"),
            Notice::Updated => write!(f, "Course updated"),
            Notice::UpdateFailed => write!(f, "Error with updating course"),
            Notice::Deleted => write!(f, "Course deleted"),
            Notice::DeleteFailed => write!(f, "Error with deleting course"),
            Notice::Invalid(reason) => write!(f, "{}", reason),
        }
    }
}

pub struct EditorController {
    provider: CourseProvider,
    mode: EditorMode,
    name: String,
    credits: String,
    grade: String,
    dirty: bool,
    closed: bool,
    pending: Option<Loader<Option<Course>>>,
}

impl EditorController {
    pub fn new(provider: CourseProvider, mode: EditorMode) -> Self {
        Self {
            provider,
            mode,
            name: String::new(),
            credits: String::new(),
            grade: String::new(),
            dirty: false,
            closed: false,
            pending: None,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "Add a Course",
            EditorMode::Edit(_) => "Edit Course",
        }
    }

    /// Delete is only offered for an existing course
    pub fn can_delete(&self) -> bool {
        matches!(self.mode, EditorMode::Edit(_))
    }

    /// In edit mode, start loading the target course in the background
    pub fn activate(&mut self) {
        if let EditorMode::Edit(id) = self.mode {
            let provider = self.provider.clone();
            self.pending = Some(Loader::spawn("course detail", move || provider.get(id)));
        }
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
        self.on_load_finished(result?);
        Ok(true)
    }

    /// Block until the pending load is delivered
    pub fn wait(&mut self) -> Result<()> {
        if let Some(mut loader) = self.pending.take() {
            if let Some(result) = loader.wait() {
                self.on_load_finished(result?);
            }
        }
        Ok(())
    }

    /// Populate the fields; a missing row leaves them untouched
    fn on_load_finished(&mut self, course: Option<Course>) {
        match course {
            Some(course) => {
                self.name = course.name;
                self.credits = course.credits.to_string();
                self.grade = course.grade.to_string();
            }
            None => tracing::debug!("Course for {:?} is gone, leaving fields as they are", self.mode),
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Credits => &self.credits,
            Field::Grade => &self.grade,
        }
    }

    /// A user edit: store the text and mark the editor dirty
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Credits => self.credits = value,
            Field::Grade => self.grade = value,
        }
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Write the fields and close the screen.
    ///
    /// A brand-new course with every field blank is not written and yields
    /// no notice. Otherwise the notice reports how the write went; the
    /// screen closes either way.
    pub fn save(&mut self) -> Option<Notice> {
        self.closed = true;

        let values = match CourseValues::from_input(&self.name, &self.credits, &self.grade) {
            Ok(values) => values,
            Err(e) => return Some(Notice::Invalid(e.to_string())),
        };

        match self.mode {
            EditorMode::Create if values.is_empty() => None,
            EditorMode::Create => Some(match self.provider.insert(&values) {
                Ok(id) => Notice::Inserted(id),
                Err(e) => failure_notice(e, Notice::InsertFailed),
            }),
            EditorMode::Edit(id) => Some(match self.provider.update(id, &values) {
                Ok(0) => Notice::UpdateFailed,
                Ok(_) => Notice::Updated,
                Err(e) => failure_notice(e, Notice::UpdateFailed),
            }),
        }
    }

    /// Back or up navigation
    pub fn request_leave(&mut self) -> Leave {
        if self.dirty {
            Leave::ConfirmDiscard
        } else {
            self.closed = true;
            Leave::Proceed
        }
    }

    pub fn resolve_unsaved(&mut self, choice: UnsavedChoice) {
        if choice == UnsavedChoice::Discard {
            self.closed = true;
        }
    }

    /// Whether a delete prompt should be shown; false in create mode
    pub fn request_delete(&self) -> bool {
        self.can_delete()
    }

    /// Delete the course after the user confirmed, then close
    pub fn confirm_delete(&mut self) -> Option<Notice> {
        let EditorMode::Edit(id) = self.mode else {
            return None;
        };
        self.closed = true;

        Some(match self.provider.delete(id) {
            Ok(0) => Notice::DeleteFailed,
            Ok(_) => Notice::Deleted,
            Err(e) => failure_notice(e, Notice::DeleteFailed),
        })
    }
}

fn failure_notice(error: Error, fallback: Notice) -> Notice {
    if error.is_validation() {
        Notice::Invalid(error.to_string())
    } else {
        tracing::error!("Course write failed: {}", error);
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_with_course() -> (CourseProvider, i64) {
        let provider = CourseProvider::in_memory().unwrap();
        let id = provider.insert(&CourseValues::new("Algorithms", 4, 95)).unwrap();
        (provider, id)
    }

    #[test]
    fn test_create_mode_blank_save_is_noop() {
        let (provider, _) = provider_with_course();
        let mut editor = EditorController::new(provider.clone(), EditorMode::Create);
        assert_eq!(editor.title(), "Add a Course");
        assert!(!editor.can_delete());

        editor.set_field(Field::Name, "   ");
        assert_eq!(editor.save(), None);
        assert!(editor.is_closed());
        assert_eq!(provider.list().unwrap().len(), 1);
    }

    #[test]
    fn test_create_mode_partial_input_fails() {
        let (provider, _) = provider_with_course();
        let mut editor = EditorController::new(provider.clone(), EditorMode::Create);
        editor.set_field(Field::Name, "History");
        editor.set_field(Field::Credits, "3");

        let notice = editor.save().unwrap();
        assert!(matches!(notice, Notice::Invalid(_)));
        assert!(!notice.is_success());
        assert!(editor.is_closed());
        assert_eq!(provider.list().unwrap().len(), 1);
    }

    #[test]
    fn test_create_mode_inserts() {
        let (provider, first) = provider_with_course();
        let mut editor = EditorController::new(provider.clone(), EditorMode::Create);
        editor.set_field(Field::Name, " History ");
        editor.set_field(Field::Credits, "3");
        editor.set_field(Field::Grade, "85");

        let Some(Notice::Inserted(id)) = editor.save() else {
            panic!("expected an insert");
        };
        assert!(id > first);
        assert_eq!(provider.get(id).unwrap().unwrap().name, "History");
    }

    #[test]
    fn test_edit_mode_loads_without_dirtying() {
        let (provider, id) = provider_with_course();
        let mut editor = EditorController::new(provider, EditorMode::Edit(id));
        assert_eq!(editor.title(), "Edit Course");
        editor.activate();
        editor.wait().unwrap();

        assert_eq!(editor.field(Field::Name), "Algorithms");
        assert_eq!(editor.field(Field::Credits), "4");
        assert_eq!(editor.field(Field::Grade), "95");
        assert!(!editor.is_dirty());
        assert_eq!(editor.request_leave(), Leave::Proceed);
        assert!(editor.is_closed());
    }

    #[test]
    fn test_edit_mode_missing_row_leaves_fields() {
        let (provider, _) = provider_with_course();
        let mut editor = EditorController::new(provider, EditorMode::Edit(999));
        editor.set_field(Field::Name, "typed");
        editor.activate();
        editor.wait().unwrap();
        assert_eq!(editor.field(Field::Name), "typed");
        assert_eq!(editor.field(Field::Grade), "");
    }

    #[test]
    fn test_edit_mode_updates() {
        let (provider, id) = provider_with_course();
        let mut editor = EditorController::new(provider.clone(), EditorMode::Edit(id));
        editor.activate();
        editor.wait().unwrap();
        editor.set_field(Field::Grade, "99");

        assert_eq!(editor.save(), Some(Notice::Updated));
        assert_eq!(provider.get(id).unwrap().unwrap().grade, 99);
    }

    #[test]
    fn test_update_of_vanished_row_fails() {
        let (provider, id) = provider_with_course();
        let mut editor = EditorController::new(provider.clone(), EditorMode::Edit(id));
        editor.activate();
        editor.wait().unwrap();
        provider.delete(id).unwrap();

        assert_eq!(editor.save(), Some(Notice::UpdateFailed));
        assert!(editor.is_closed());
    }

    #[test]
    fn test_dirty_leave_asks_first() {
        let (provider, id) = provider_with_course();
        let mut editor = EditorController::new(provider.clone(), EditorMode::Edit(id));
        editor.set_field(Field::Name, "Changed");

        assert_eq!(editor.request_leave(), Leave::ConfirmDiscard);
        editor.resolve_unsaved(UnsavedChoice::KeepEditing);
        assert!(!editor.is_closed());

        assert_eq!(editor.request_leave(), Leave::ConfirmDiscard);
        editor.resolve_unsaved(UnsavedChoice::Discard);
        assert!(editor.is_closed());
        assert_eq!(provider.get(id).unwrap().unwrap().name, "Algorithms");
    }

    #[test]
    fn test_delete() {
        let (provider, id) = provider_with_course();

        let mut creating = EditorController::new(provider.clone(), EditorMode::Create);
        assert!(!creating.request_delete());
        assert_eq!(creating.confirm_delete(), None);

        let mut editor = EditorController::new(provider.clone(), EditorMode::Edit(id));
        assert!(editor.request_delete());
        assert_eq!(editor.confirm_delete(), Some(Notice::Deleted));
        assert!(editor.is_closed());
        assert!(provider.list().unwrap().is_empty());

        let mut again = EditorController::new(provider, EditorMode::Edit(id));
        assert_eq!(again.confirm_delete(), Some(Notice::DeleteFailed));
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(Notice::Inserted(1).to_string(), "Course saved");
        assert_eq!(Notice::UpdateFailed.to_string(), "Error with updating course");
        assert_eq!(Notice::Invalid("Course requires a grade".into()).to_string(), "Course requires a grade");
    }
}
