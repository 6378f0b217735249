//! Bug list sources.
//!
//! A [`BugSource`] performs the view's single suspending operation: fetching
//! the full bug list from the fixed resource path. Sources are blocking and
//! run on the host's worker threads.

pub mod dir;
pub mod http;

pub use dir::DirSource;
pub use http::HttpSource;

use std::sync::Arc;
use std::time::Duration;

use bv_common::{BugId, BugList};
use thiserror::Error;

/// Message shown for every load failure other than "not found".
pub const GENERIC_LOAD_FAILURE: &str = "Failed to load bug details. Please try again later.";

/// Why a bug could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("bug list request failed with HTTP status {0}")]
    Status(u16),

    #[error("bug list request failed: {0}")]
    Transport(String),

    #[error("bug list is malformed: {0}")]
    Malformed(String),

    #[error("bug {0} not found")]
    NotFound(BugId),
}

impl LoadError {
    /// The message shown in place of the page content.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::NotFound(id) => format!("Bug with ID {} not found", id),
            _ => GENERIC_LOAD_FAILURE.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound(_))
    }

    /// Short kind name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Status(_) => "status",
            LoadError::Transport(_) => "transport",
            LoadError::Malformed(_) => "malformed",
            LoadError::NotFound(_) => "not_found",
        }
    }
}

impl From<bv_common::Error> for LoadError {
    fn from(err: bv_common::Error) -> Self {
        match err {
            bv_common::Error::Json(e) => LoadError::Malformed(e.to_string()),
            other => LoadError::Malformed(other.to_string()),
        }
    }
}

/// A place the bug list can be fetched from.
pub trait BugSource: Send + Sync {
    /// Fetch the bug list. Entries are decoded later, one at a time.
    fn fetch_list(&self) -> Result<BugList, LoadError>;

    /// Human-readable location, for logs and `config show`.
    fn describe(&self) -> String;
}

impl<S: BugSource + ?Sized> BugSource for Arc<S> {
    fn fetch_list(&self) -> Result<BugList, LoadError> {
        (**self).fetch_list()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Whether a source location names an HTTP origin rather than a directory.
pub fn is_http_location(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Build a source from a URL or directory path.
pub fn source_from_location(location: &str, timeout: Option<Duration>) -> Arc<dyn BugSource> {
    if is_http_location(location) {
        Arc::new(HttpSource::new(location, timeout))
    } else {
        Arc::new(DirSource::new(location))
    }
}
