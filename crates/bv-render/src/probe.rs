//! Server-side asset existence checks.
//!
//! Browsers swap in the placeholder when an image fails to load. When pages
//! are rendered next to the static-asset root, the same substitution can be
//! made up front: a probe reports which normalized paths resolve to a file.

use std::path::{Component, Path, PathBuf};

/// Answers whether a normalized asset path resolves to an existing asset.
pub trait AssetProbe: Send + Sync {
    fn exists(&self, path: &str) -> bool;
}

/// Probe backed by a static-asset directory.
#[derive(Debug, Clone)]
pub struct DirProbe {
    root: PathBuf,
}

impl DirProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a rooted asset path onto the directory, refusing anything that
    /// would escape it.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let relative = Path::new(path.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(resolved)
    }
}

impl AssetProbe for DirProbe {
    fn exists(&self, path: &str) -> bool {
        // Absolute URLs are served by someone else; assume they resolve.
        if path.starts_with("//") || path.contains("://") {
            return true;
        }
        self.resolve(path).is_some_and(|p| p.is_file())
    }
}
