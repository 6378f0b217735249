//! Fuzz target for config.toml parsing.
//!
//! Tests that configuration parsing and validation handle arbitrary input
//! without panicking.

#![no_main]

use bv_core::config::BugviewConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Try to parse as TOML - should never panic, only return an error
    if let Ok(config) = BugviewConfig::from_toml(data) {
        let _ = config.validate();
    }
});
