//! Fuzz target for Bug.json parsing and lookup.
//!
//! Tests that parsing, lookup and normalization handle arbitrary input
//! without panicking.

#![no_main]

use bv_common::{parse_bug_list, BugId, BugSnapshot};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Malformed input must come back as an error, never a panic
    let Ok(list) = parse_bug_list(data) else {
        return;
    };
    for id in list.ids().flatten() {
        assert!(list.find(&BugId::new(id)).is_some());
    }
    for record in list.records().flatten() {
        let _ = BugSnapshot::normalize(record);
    }
});
