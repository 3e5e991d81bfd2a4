//! Document identity for mend.
//!
//! A document is addressed by its collection name and an id that is unique
//! within that collection. References are immutable once created.

use crate::StoreError;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

fn segment_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_.@-]+$").ok())
        .as_ref()
}

/// Reference to a document: `(collection, id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Collection the document lives in.
    pub collection: String,
    /// Document id within the collection.
    pub id: String,
}

impl DocumentRef {
    /// Create a reference without validation.
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Parse a `collection/id` path.
    pub fn parse(path: &str) -> Result<Self, StoreError> {
        let (collection, id) = path
            .split_once('/')
            .ok_or_else(|| StoreError::invalid_ref(path))?;

        if !is_valid_segment(collection) || !is_valid_segment(id) {
            return Err(StoreError::invalid_ref(path));
        }

        Ok(Self::new(collection, id))
    }

    /// Returns true if both segments are well-formed.
    pub fn is_valid(&self) -> bool {
        is_valid_segment(&self.collection) && is_valid_segment(&self.id)
    }
}

/// Check that a collection name or document id is a single, non-empty path segment.
pub fn is_valid_segment(segment: &str) -> bool {
    segment_pattern().is_some_and(|pattern| pattern.is_match(segment))
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}
