//! Fuzz target for rendering arbitrary bug records.
//!
//! Any record that parses must render without panicking, and user text
//! must never open a raw script tag.

#![no_main]

use bv_common::{parse_bug_list, BugSnapshot};
use bv_render::{PageGenerator, PageModel};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let Ok(list) = parse_bug_list(data) else {
        return;
    };
    let generator = PageGenerator::default_config();
    for record in list.records().flatten() {
        let Ok(snapshot) = BugSnapshot::normalize(record) else {
            continue;
        };
        let Ok(page) = generator.render(&PageModel::Ready {
            snapshot: &snapshot,
            overlay: None,
        }) else {
            continue;
        };
        // The page carries exactly one script element of its own
        assert_eq!(page.html.matches("<script").count(), 1);
    }
});
