//! Error types for bug list handling.

use thiserror::Error;

/// Result type alias for bv-common operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding or normalizing bug records.
#[derive(Error, Debug)]
pub enum Error {
    /// The body was not a JSON array, or the selected entry did not decode.
    #[error("malformed bug list: {0}")]
    Json(#[from] serde_json::Error),

    /// A record selected for display carries no usable identifier.
    #[error("bug record has no string id")]
    MissingId,
}
