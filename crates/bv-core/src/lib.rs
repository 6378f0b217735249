//! Bugview Core Library
//!
//! This library provides the runtime side of the bug-detail view:
//! - The `BugDetailView` state machine (messages in, commands out)
//! - Bug list sources (HTTP origin or static-asset directory)
//! - A host that runs fetches on worker threads
//! - Configuration loading and validation
//! - Bug list checks and the static site server
//!
//! The binary entry point is in `main.rs`.

pub mod check;
pub mod config;
pub mod exit_codes;
pub mod fetch;
pub mod host;
pub mod logging;
pub mod serve;
pub mod view;

pub use fetch::{BugSource, LoadError};
pub use host::{HistoryNavigator, Navigator, NoopNavigator, ViewHost};
pub use view::{BugDetailView, Cmd, Msg, Phase};
