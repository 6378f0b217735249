//! Asset path normalization.
//!
//! `Bug.json` is hand-edited and mixes `./img/a.png`, `img/a.png` and
//! `/img/a.png`. Every path a view displays is rewritten to the
//! absolute-rooted form so the static-asset server resolves them the same
//! way regardless of the page URL. Missing contributor photos become the
//! placeholder asset.

use serde::{Deserialize, Serialize};

/// Fallback image substituted for missing or unloadable assets.
pub const PLACEHOLDER_PATH: &str = "/placeholder.jpg";

const RELATIVE_PREFIX: &str = "./";

/// Rewrite an asset path into its absolute-rooted form.
///
/// Pure and idempotent: `./a.png`, `a.png` and `/a.png` all map to `/a.png`.
pub fn normalize_asset_path(path: &str) -> String {
    if let Some(rest) = path.strip_prefix(RELATIVE_PREFIX) {
        format!("/{rest}")
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Normalize a contributor photo, mapping absent or empty paths to the
/// placeholder.
pub fn normalize_photo_path(photo: Option<&str>) -> String {
    match photo {
        Some(path) if !path.is_empty() => normalize_asset_path(path),
        _ => PLACEHOLDER_PATH.to_string(),
    }
}

/// Normalize an ordered list of asset paths, preserving order.
pub fn normalize_asset_paths<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    paths
        .iter()
        .map(|p| normalize_asset_path(p.as_ref()))
        .collect()
}

/// Where an image is displayed on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Screenshot thumbnail in the gallery.
    Screenshot,
    /// Contributor photo.
    Photo,
    /// Enlarged image in the overlay.
    Overlay,
}

impl AssetKind {
    /// Prefix of the diagnostic line emitted when an asset fails to load.
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            AssetKind::Screenshot => "Failed to load image",
            AssetKind::Photo => "Failed to load student photo",
            AssetKind::Overlay => "Failed to load modal image",
        }
    }

    pub fn failure_message(&self, path: &str) -> String {
        format!("{}: {}", self.failure_prefix(), path)
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Screenshot => write!(f, "screenshot"),
            AssetKind::Photo => write!(f, "photo"),
            AssetKind::Overlay => write!(f, "overlay"),
        }
    }
}

/// Whether a path is the placeholder asset.
pub fn is_placeholder(path: &str) -> bool {
    path == PLACEHOLDER_PATH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_prefix_is_replaced() {
        assert_eq!(normalize_asset_path("./a.png"), "/a.png");
        assert_eq!(normalize_asset_path("./img/bugs/1.png"), "/img/bugs/1.png");
    }

    #[test]
    fn test_bare_path_gets_root() {
        assert_eq!(normalize_asset_path("a.png"), "/a.png");
        assert_eq!(normalize_asset_path("img/a.png"), "/img/a.png");
    }

    #[test]
    fn test_rooted_path_unchanged() {
        assert_eq!(normalize_asset_path("/a.png"), "/a.png");
        assert_eq!(normalize_asset_path("//cdn/a.png"), "//cdn/a.png");
    }

    #[test]
    fn test_only_leading_prefix_is_stripped() {
        assert_eq!(normalize_asset_path("././a.png"), "/./a.png");
        assert_eq!(normalize_asset_path("img/./a.png"), "/img/./a.png");
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(normalize_asset_path(""), "/");
        assert_eq!(normalize_asset_path("./"), "/");
    }

    #[test]
    fn test_photo_fallback() {
        assert_eq!(normalize_photo_path(None), PLACEHOLDER_PATH);
        assert_eq!(normalize_photo_path(Some("")), PLACEHOLDER_PATH);
        assert_eq!(normalize_photo_path(Some("./me.jpg")), "/me.jpg");
        assert!(is_placeholder(&normalize_photo_path(None)));
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            AssetKind::Screenshot.failure_message("/a.png"),
            "Failed to load image: /a.png"
        );
        assert_eq!(
            AssetKind::Photo.failure_message("/me.jpg"),
            "Failed to load student photo: /me.jpg"
        );
        assert_eq!(
            AssetKind::Overlay.failure_message("/a.png"),
            "Failed to load modal image: /a.png"
        );
    }

    #[test]
    fn test_list_normalization_keeps_order() {
        let input = ["./b.png", "a.png", "/c.png"];
        assert_eq!(
            normalize_asset_paths(&input),
            vec!["/b.png", "/a.png", "/c.png"]
        );
        let empty: [&str; 0] = [];
        assert!(normalize_asset_paths(&empty).is_empty());
    }
}
