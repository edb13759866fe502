//! Record domain model

use super::ids::RecordId;
use serde::{Deserialize, Serialize};

/// A single free-text record to be scored
///
/// Immutable once loaded: fields are only readable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    text: String,
}

impl Record {
    /// Creates a new record
    pub fn new(id: RecordId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Record identifier
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Record text (may be empty)
    pub fn text(&self) -> &str {
        &self.text
    }
}
