//! Bugview common types, IDs, and errors.
//!
//! This crate provides the foundational types shared by the bug-detail view,
//! the page generator and the CLI:
//! - Bug and contributor records as they appear in `Bug.json`
//! - The normalized, immutable [`BugSnapshot`] a view displays
//! - Asset path normalization
//! - Display fallbacks (title, date, body, contributor names)
//! - Output formats

pub mod display;
pub mod error;
pub mod id;
pub mod output;
pub mod paths;
pub mod record;

pub use display::BodyContent;
pub use error::{Error, Result};
pub use id::BugId;
pub use output::OutputFormat;
pub use paths::{normalize_asset_path, normalize_photo_path, AssetKind, PLACEHOLDER_PATH};
pub use record::{parse_bug_list, BugList, BugRecord, BugSnapshot, Contributor, ContributorRecord};

/// Location of the bug list relative to the static-asset root.
pub const RESOURCE_PATH: &str = "/Bug.json";
