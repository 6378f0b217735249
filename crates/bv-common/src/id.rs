//! Bug identity type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a bug record, as supplied by the route.
///
/// Matching against records is exact string equality: no trimming, no case
/// folding, no numeric coercion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BugId(pub String);

impl BugId {
    /// Create a new id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        BugId(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a record id refers to this bug.
    pub fn matches(&self, record_id: Option<&str>) -> bool {
        record_id == Some(self.0.as_str())
    }
}

impl fmt::Display for BugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BugId {
    fn from(id: &str) -> Self {
        BugId(id.to_string())
    }
}

impl From<String> for BugId {
    fn from(id: String) -> Self {
        BugId(id)
    }
}
