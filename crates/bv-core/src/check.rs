//! Bug list validation.
//!
//! Finds the data problems that make a detail page unreachable or degraded.
//! Entries without a string id and ids shared by several entries (only the
//! first is ever shown) make pages unreachable. An entry whose fields do not
//! decode shows the generic failure. Missing titles and assets that do not
//! resolve under the static-asset root only degrade the page.

use std::collections::BTreeMap;

use bv_common::{AssetKind, BugList, BugSnapshot};
use bv_render::AssetProbe;
use serde::Serialize;
use tracing::debug;

use crate::logging::{event_names, Stage};

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The page cannot be reached or renders wrong content.
    Error,
    /// The page renders with a fallback.
    Warning,
}

/// One problem in the bug list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    MissingId { index: usize },
    MalformedEntry { index: usize, message: String },
    DuplicateId { id: String, indices: Vec<usize> },
    MissingTitle { id: String },
    MissingAsset { id: String, path: String, asset: AssetKind },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Finding::MissingId { .. }
            | Finding::MalformedEntry { .. }
            | Finding::DuplicateId { .. } => Severity::Error,
            Finding::MissingTitle { .. } | Finding::MissingAsset { .. } => Severity::Warning,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Finding::MissingId { index } => format!("entry {} has no string id", index),
            Finding::MalformedEntry { index, message } => {
                format!("entry {} does not decode: {}", index, message)
            }
            Finding::DuplicateId { id, indices } => format!(
                "id {} is used by entries {}; only the first is reachable",
                id,
                indices
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Finding::MissingTitle { id } => format!("bug {} has no title", id),
            Finding::MissingAsset { id, path, asset } => {
                format!("bug {}: {} {} does not exist", id, asset, path)
            }
        }
    }
}

/// Result of checking a bug list.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub records: usize,
    pub findings: Vec<Finding>,
}

impl CheckReport {
    /// No error-level findings.
    pub fn is_clean(&self) -> bool {
        self.count(Severity::Error) == 0
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity() == severity)
            .count()
    }
}

/// Check every entry of `list`, verifying assets with `probe` when one is given.
pub fn check_records(list: &BugList, probe: Option<&dyn AssetProbe>) -> CheckReport {
    let mut findings = Vec::new();
    let mut by_id: BTreeMap<&str, Vec<usize>> = BTreeMap::new();

    for (index, id) in list.ids().enumerate() {
        match id {
            Some(id) => by_id.entry(id).or_default().push(index),
            None => findings.push(Finding::MissingId { index }),
        }
    }

    for (id, indices) in &by_id {
        if indices.len() > 1 {
            findings.push(Finding::DuplicateId {
                id: id.to_string(),
                indices: indices.clone(),
            });
        }
    }

    for (index, decoded) in list.records().enumerate() {
        let record = match decoded {
            Ok(record) => record,
            Err(e) => {
                findings.push(Finding::MalformedEntry {
                    index,
                    message: e.to_string(),
                });
                continue;
            }
        };
        let Ok(snapshot) = BugSnapshot::normalize(record) else {
            continue;
        };
        let id = snapshot.id().to_string();
        if snapshot.title().is_none() {
            findings.push(Finding::MissingTitle { id: id.clone() });
        }
        if let Some(probe) = probe {
            findings.extend(missing_assets(&snapshot, probe));
        }
    }

    for finding in &findings {
        debug!(
            event = event_names::CHECK_FINDING,
            stage = %Stage::Check,
            severity = ?finding.severity(),
            "{}",
            finding.describe()
        );
    }

    CheckReport {
        records: list.len(),
        findings,
    }
}

fn missing_assets(snapshot: &BugSnapshot, probe: &dyn AssetProbe) -> Vec<Finding> {
    let screenshots = snapshot
        .images()
        .iter()
        .map(|path| (path.as_str(), AssetKind::Screenshot));
    let photos = snapshot
        .contributors()
        .iter()
        .map(|c| (c.photo(), AssetKind::Photo))
        .filter(|(path, _)| !bv_common::paths::is_placeholder(path));

    screenshots
        .chain(photos)
        .filter(|(path, _)| !probe.exists(path))
        .map(|(path, asset)| Finding::MissingAsset {
            id: snapshot.id().to_string(),
            path: path.to_string(),
            asset,
        })
        .collect()
}
