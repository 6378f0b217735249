//! Messages into the view and commands out of it.

use bv_common::{AssetKind, BugId, BugList};

use super::ticket::{LoadRequest, LoadTicket};
use crate::fetch::LoadError;

/// Result of a bug list fetch.
pub type FetchOutcome = Result<BugList, LoadError>;

/// Everything that can happen to a bug-detail view.
#[derive(Debug, Clone)]
pub enum Msg {
    // Lifecycle
    Mount(BugId),
    IdChanged(BugId),
    Unmount,

    // Async completion
    ListFetched {
        ticket: LoadTicket,
        outcome: FetchOutcome,
    },

    // Overlay
    OpenImage(String),
    CloseImage,

    // Navigation
    NavigateBack,

    // Rendering feedback
    AssetFailed { path: String, kind: AssetKind },
}

impl Msg {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Msg::Mount(_) => "mount",
            Msg::IdChanged(_) => "id_changed",
            Msg::Unmount => "unmount",
            Msg::ListFetched { .. } => "list_fetched",
            Msg::OpenImage(_) => "open_image",
            Msg::CloseImage => "close_image",
            Msg::NavigateBack => "navigate_back",
            Msg::AssetFailed { .. } => "asset_failed",
        }
    }
}

/// Side effects requested by the view.
#[derive(Debug, Clone)]
pub enum Cmd {
    None,
    /// Fetch the bug list and answer with [`Msg::ListFetched`].
    Fetch(LoadRequest),
    /// Ask the routing layer to go back one step.
    NavigateBack,
}

impl Cmd {
    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }
}
