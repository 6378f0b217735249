//! Directory bug list source.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bv_common::{parse_bug_list, BugList, RESOURCE_PATH};
use tracing::debug;

use super::{BugSource, LoadError};

/// Reads `Bug.json` from a static-asset directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the bug list file.
    pub fn list_path(&self) -> PathBuf {
        self.root.join(RESOURCE_PATH.trim_start_matches('/'))
    }
}

impl BugSource for DirSource {
    fn fetch_list(&self) -> Result<BugList, LoadError> {
        let path = self.list_path();
        debug!(path = %path.display(), "reading bug list");
        let body = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::InvalidData => LoadError::Malformed(format!("{}: {}", path.display(), e)),
            _ => LoadError::Transport(format!("{}: {}", path.display(), e)),
        })?;
        Ok(parse_bug_list(&body)?)
    }

    fn describe(&self) -> String {
        self.list_path().display().to_string()
    }
}
