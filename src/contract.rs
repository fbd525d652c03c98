//! Course contract - table, columns and addressing for the course store
//!
//! Format: `content://<authority>/courses[/<id>]`
//!
//! Examples:
//! - `content://coursebook.courses/courses` (every course)
//! - `content://coursebook.courses/courses/7` (the course with id 7)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// URI scheme shared by every course address
pub const SCHEME: &str = "content";

/// Default content authority
pub const DEFAULT_AUTHORITY: &str = "coursebook.courses";

/// Path segment of the course collection
pub const PATH_COURSES: &str = "courses";

pub const TABLE_NAME: &str = "courses";
pub const COLUMN_ID: &str = "id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_CREDITS: &str = "credits";
pub const COLUMN_GRADE: &str = "grade";

/// Whether `value` lies within `min..=max`
pub fn is_valid(value: i64, min: i64, max: i64) -> bool {
    value >= min && value <= max
}

/// MIME type of a result set holding the whole collection
pub fn content_list_type(authority: &str) -> String {
    format!("vnd.cursor.dir/{}/{}", authority, PATH_COURSES)
}

/// MIME type of a result set holding a single course
pub fn content_item_type(authority: &str) -> String {
    format!("vnd.cursor.item/{}/{}", authority, PATH_COURSES)
}

/// Address of either the course collection or one course in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CourseUri {
    /// `content://<authority>/courses`
    Collection { authority: String },
    /// `content://<authority>/courses/<id>`
    Item { authority: String, id: i64 },
}

impl CourseUri {
    /// Collection URI under the default authority
    pub fn collection() -> Self {
        Self::Collection { authority: DEFAULT_AUTHORITY.to_string() }
    }

    /// Item URI under the default authority
    pub fn item(id: i64) -> Self {
        Self::Item { authority: DEFAULT_AUTHORITY.to_string(), id }
    }

    /// Append an id to this URI's authority, like `withAppendedId`
    pub fn with_id(&self, id: i64) -> Self {
        Self::Item { authority: self.authority().to_string(), id }
    }

    pub fn authority(&self) -> &str {
        match self {
            CourseUri::Collection { authority } | CourseUri::Item { authority, .. } => authority,
        }
    }

    /// The row id, for item URIs
    pub fn id(&self) -> Option<i64> {
        match self {
            CourseUri::Collection { .. } => None,
            CourseUri::Item { id, .. } => Some(*id),
        }
    }

    /// MIME type of the result set this URI addresses
    pub fn mime_type(&self) -> String {
        match self {
            CourseUri::Collection { authority } => content_list_type(authority),
            CourseUri::Item { authority, .. } => content_item_type(authority),
        }
    }

    /// Parse a URI string into a CourseUri
    ///
    /// Expected format: `content://<authority>/courses[/<id>]`
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix(SCHEME)
            .and_then(|r| r.strip_prefix("://"))
            .ok_or_else(|| Error::InvalidUri(format!("URI must start with {}://", SCHEME)))?;

        let (authority, path) = rest
            .split_once('/')
            .ok_or_else(|| Error::InvalidUri("URI must contain authority/path".to_string()))?;
        if authority.is_empty() {
            return Err(Error::InvalidUri("URI authority is empty".to_string()));
        }

        let path = path.trim_end_matches('/');
        let (collection, id) = match path.split_once('/') {
            Some((collection, id)) => (collection, Some(id)),
            None => (path, None),
        };
        if collection != PATH_COURSES {
            return Err(Error::InvalidUri(format!("Unknown path: {}", path)));
        }

        match id {
            None => Ok(Self::Collection { authority: authority.to_string() }),
            Some(id_str) => {
                let id: i64 = id_str
                    .parse()
                    .map_err(|_| Error::InvalidUri(format!("Invalid course id: {}", id_str)))?;
                if id < 0 {
                    return Err(Error::InvalidUri(format!("Invalid course id: {}", id_str)));
                }
                Ok(Self::Item { authority: authority.to_string(), id })
            }
        }
    }

    /// Parse and require the given authority
    pub fn parse_for(uri: &str, authority: &str) -> Result<Self> {
        let parsed = Self::parse(uri)?;
        if parsed.authority() != authority {
            return Err(Error::InvalidUri(format!(
                "Unknown authority {} (expected {})",
                parsed.authority(),
                authority
            )));
        }
        Ok(parsed)
    }

    /// Convert to URI string
    pub fn to_uri_string(&self) -> String {
        match self {
            CourseUri::Collection { authority } => {
                format!("{}://{}/{}", SCHEME, authority, PATH_COURSES)
            }
            CourseUri::Item { authority, id } => {
                format!("{}://{}/{}/{}", SCHEME, authority, PATH_COURSES, id)
            }
        }
    }
}

impl fmt::Display for CourseUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri_string())
    }
}

impl FromStr for CourseUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for CourseUri {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_uri_string())
    }
}

impl<'de> Deserialize<'de> for CourseUri {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CourseUri::parse(&s).map_err(serde::de::Error::custom)
    }
}
