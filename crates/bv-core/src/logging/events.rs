//! Stable event names and pipeline stages for structured logs.

use serde::{Deserialize, Serialize};

/// Where in the pipeline an event happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Bug list fetch.
    Fetch,
    /// View state transitions.
    View,
    /// Page rendering.
    Render,
    /// Bug list validation.
    Check,
    /// Static server.
    Serve,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Fetch => "fetch",
            Stage::View => "view",
            Stage::Render => "render",
            Stage::Check => "check",
            Stage::Serve => "serve",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    // Fetch / load cycle
    pub const FETCH_STARTED: &str = "fetch.started";
    pub const LOAD_STARTED: &str = "load.started";
    pub const LOAD_FINISHED: &str = "load.finished";
    pub const LOAD_NOT_FOUND: &str = "load.not_found";
    pub const LOAD_FAILED: &str = "load.failed";
    pub const LOAD_STALE: &str = "load.stale";

    // Rendering
    pub const ASSET_FAILED: &str = "asset.failed";
    pub const PAGE_WRITTEN: &str = "page.written";

    // Check
    pub const CHECK_FINDING: &str = "check.finding";

    // Server
    pub const SERVE_STARTED: &str = "serve.started";
    pub const SERVE_REQUEST: &str = "serve.request";
    pub const SERVE_STOPPED: &str = "serve.stopped";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display_matches_serde() {
        for stage in [
            Stage::Init,
            Stage::Fetch,
            Stage::View,
            Stage::Render,
            Stage::Check,
            Stage::Serve,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage));
        }
    }
}
