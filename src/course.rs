//! Course types
//!
//! - `Course`: a persisted row, only ever built at the storage boundary
//! - `CourseValues`: column-name → value mapping handed to the facade
//! - `NewCourse`: values that passed validation and may be written
//! - `Summary`: average grade and credit total over the whole table

use crate::contract::{self, COLUMN_CREDITS, COLUMN_GRADE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// A course stored in the `courses` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Row id, assigned by the store
    pub id: i64,
    pub name: String,
    pub credits: i64,
    pub grade: i64,
}

impl Course {
    /// Label shown under the name in a list item
    pub fn credits_label(&self) -> String {
        format!("{} credits", self.credits)
    }

    /// The values this row would be written back with
    pub fn values(&self) -> CourseValues {
        CourseValues::new(self.name.clone(), self.credits, self.grade)
    }
}

/// Row values exchanged with the facade.
///
/// Missing keys are `None`. `id` is never part of the mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<i64>,
}

impl CourseValues {
    pub fn new(name: impl Into<String>, credits: i64, grade: i64) -> Self {
        Self {
            name: Some(name.into()),
            credits: Some(credits),
            grade: Some(grade),
        }
    }

    /// Build values from raw editor text.
    ///
    /// Text is trimmed; blank fields become missing keys. Non-numeric
    /// credits or grade is a validation error.
    pub fn from_input(name: &str, credits: &str, grade: &str) -> Result<Self> {
        let name = name.trim();
        Ok(Self {
            name: (!name.is_empty()).then(|| name.to_string()),
            credits: parse_number(COLUMN_CREDITS, credits)?,
            grade: parse_number(COLUMN_GRADE, grade)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.credits.is_none() && self.grade.is_none()
    }

    /// Check required columns and bounds, producing writable values
    pub fn validate(&self, rules: &ValidationRules) -> Result<NewCourse> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::Validation("Course requires a name".to_string()))?;
        let credits = self
            .credits
            .ok_or_else(|| Error::Validation("Course requires credits".to_string()))?;
        let grade = self
            .grade
            .ok_or_else(|| Error::Validation("Course requires a grade".to_string()))?;

        check_range(COLUMN_CREDITS, credits, &rules.credits)?;
        check_range(COLUMN_GRADE, grade, &rules.grade)?;

        Ok(NewCourse {
            name: name.to_string(),
            credits,
            grade,
        })
    }
}

fn parse_number(column: &str, text: &str) -> Result<Option<i64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse()
        .map(Some)
        .map_err(|_| Error::Validation(format!("Invalid {}: {}", column, text)))
}

fn check_range(column: &str, value: i64, range: &RangeInclusive<i64>) -> Result<()> {
    if contract::is_valid(value, *range.start(), *range.end()) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Course requires valid {} ({}..={}), got {}",
            column,
            range.start(),
            range.end(),
            value
        )))
    }
}

/// Validated values ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub name: String,
    pub credits: i64,
    pub grade: i64,
}

/// Accepted ranges for numeric columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    pub credits: RangeInclusive<i64>,
    pub grade: RangeInclusive<i64>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            credits: 0..=60,
            grade: 0..=100,
        }
    }
}

/// Average grade and summed credits over every stored course.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub average_grade: f64,
    pub total_credits: i64,
}

impl Summary {
    pub const AVERAGE_LABEL: &'static str = "Average grade";
    pub const CREDITS_LABEL: &'static str = "Total credits";

    /// Average formatted the way the summary line shows it
    pub fn average_text(&self) -> String {
        let rounded = (self.average_grade * 100.0).round() / 100.0;
        if rounded.fract() == 0.0 {
            format!("{:.0}", rounded)
        } else {
            format!("{}", rounded)
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}  {}: {}",
            Self::AVERAGE_LABEL,
            self.average_text(),
            Self::CREDITS_LABEL,
            self.total_credits
        )
    }
}
