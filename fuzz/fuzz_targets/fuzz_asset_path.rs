//! Fuzz target for asset path normalization.
//!
//! Normalization must be idempotent and always yield a rooted path.

#![no_main]

use bv_common::{normalize_asset_path, normalize_photo_path};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let once = normalize_asset_path(data);
    assert!(once.starts_with('/'));
    assert_eq!(normalize_asset_path(&once), once);

    let photo = normalize_photo_path(Some(data));
    assert!(photo.starts_with('/'));
});
