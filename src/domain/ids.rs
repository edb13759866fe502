//! Domain identifier types with validation
//!
//! Newtype wrapper for record identifiers so that ids cannot be mixed up
//! with arbitrary text fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record identifier newtype wrapper
///
/// Unique within a single batch; not guaranteed unique across runs.
///
/// # Examples
///
/// ```
/// use piiflag::domain::ids::RecordId;
/// use std::str::FromStr;
///
/// let id = RecordId::from_str("2024-000123").unwrap();
/// assert_eq!(id.as_str(), "2024-000123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new RecordId from a string
    ///
    /// Surrounding whitespace is trimmed; an empty id is rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("Record ID cannot be empty".to_string());
        }
        if trimmed.len() == id.len() {
            Ok(Self(id))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Creates a RecordId from a zero-based row position
    ///
    /// Used when the source has no id column or the id cell is blank.
    pub fn from_index(index: usize) -> Self {
        Self(index.to_string())
    }

    /// Returns the record ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
