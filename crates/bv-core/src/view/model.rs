//! The bug-detail view state machine.

use std::sync::Arc;

use bv_common::{BugId, BugList, BugSnapshot};
use bv_render::PageModel;
use tracing::{debug, error, info, warn};

use super::msg::{Cmd, FetchOutcome, Msg};
use super::overlay::Overlay;
use super::ticket::{LoadRequest, LoadTicket};
use crate::fetch::LoadError;
use crate::logging::{event_names, Stage};

/// Load phase of the view.
#[derive(Debug, Clone, Default)]
pub enum Phase {
    /// A fetch is in flight; nothing but the loading indicator renders.
    #[default]
    Loading,
    /// The load failed; only `message` renders.
    Failed { message: String, error: LoadError },
    /// A bug is loaded.
    Ready(Arc<BugSnapshot>),
}

/// State of one bug-detail view instance.
///
/// Mutated only through [`BugDetailView::update`]. Side effects are returned
/// as [`Cmd`] values for the host to execute.
#[derive(Debug, Default)]
pub struct BugDetailView {
    id: Option<BugId>,
    phase: Phase,
    overlay: Overlay,
    ticket: Option<LoadTicket>,
    mounted: bool,
    generation: u64,
}

impl BugDetailView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a message and return the side effect it requires.
    pub fn update(&mut self, msg: Msg) -> Cmd {
        match msg {
            Msg::Mount(id) => {
                self.mounted = true;
                self.start_load(id)
            }
            Msg::IdChanged(id) => {
                if !self.mounted {
                    debug!(bug_id = %id, "id change before mount ignored");
                    return Cmd::None;
                }
                if self.id.as_ref() == Some(&id) {
                    return Cmd::None;
                }
                self.start_load(id)
            }
            Msg::ListFetched { ticket, outcome } => {
                self.finish_load(ticket, outcome);
                Cmd::None
            }
            Msg::OpenImage(path) => {
                if matches!(self.phase, Phase::Ready(_)) && self.overlay.open(&path) {
                    debug!(path = %path, "overlay opened");
                }
                Cmd::None
            }
            Msg::CloseImage => {
                self.overlay.close();
                Cmd::None
            }
            Msg::NavigateBack => Cmd::NavigateBack,
            Msg::AssetFailed { path, kind } => {
                warn!(
                    event = event_names::ASSET_FAILED,
                    stage = %Stage::Render,
                    path = %path,
                    kind = %kind,
                    "{}",
                    kind.failure_message(&path)
                );
                Cmd::None
            }
            Msg::Unmount => {
                if let Some(ticket) = self.ticket.take() {
                    ticket.cancel();
                }
                self.mounted = false;
                self.phase = Phase::Loading;
                self.overlay = Overlay::Closed;
                debug!(bug_id = ?self.id.as_ref().map(BugId::as_str), "view unmounted");
                Cmd::None
            }
        }
    }

    fn start_load(&mut self, id: BugId) -> Cmd {
        if let Some(previous) = self.ticket.take() {
            previous.cancel();
        }
        self.generation += 1;
        let ticket = LoadTicket::new(self.generation);
        self.ticket = Some(ticket.clone());
        self.phase = Phase::Loading;
        self.overlay = Overlay::Closed;
        self.id = Some(id.clone());

        info!(
            event = event_names::LOAD_STARTED,
            stage = %Stage::View,
            bug_id = %id,
            generation = self.generation,
            "loading bug"
        );
        Cmd::Fetch(LoadRequest { id, ticket })
    }

    fn finish_load(&mut self, ticket: LoadTicket, outcome: FetchOutcome) {
        let current = match &self.ticket {
            Some(current) if self.mounted && current.same_cycle(&ticket) => current,
            _ => {
                debug!(
                    event = event_names::LOAD_STALE,
                    generation = ticket.generation(),
                    "stale load completion dropped"
                );
                return;
            }
        };
        if current.is_cancelled() {
            debug!(
                event = event_names::LOAD_STALE,
                generation = ticket.generation(),
                "cancelled load completion dropped"
            );
            return;
        }
        self.ticket = None;

        let Some(id) = self.id.clone() else {
            return;
        };
        match resolve(&id, outcome) {
            Ok(snapshot) => {
                info!(
                    event = event_names::LOAD_FINISHED,
                    bug_id = %id,
                    images = snapshot.images().len(),
                    contributors = snapshot.contributors().len(),
                    "bug loaded"
                );
                self.phase = Phase::Ready(Arc::new(snapshot));
            }
            Err(err) => {
                if err.is_not_found() {
                    info!(event = event_names::LOAD_NOT_FOUND, bug_id = %id, "bug not found");
                } else {
                    error!(
                        event = event_names::LOAD_FAILED,
                        bug_id = %id,
                        kind = err.kind(),
                        error = %err,
                        "Error fetching bug details"
                    );
                }
                self.phase = Phase::Failed {
                    message: err.user_message(),
                    error: err,
                };
            }
        }
    }

    pub fn id(&self) -> Option<&BugId> {
        self.id.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    /// The ticket of the fetch in flight, if any.
    pub fn pending_ticket(&self) -> Option<&LoadTicket> {
        self.ticket.as_ref()
    }

    pub fn snapshot(&self) -> Option<&Arc<BugSnapshot>> {
        match &self.phase {
            Phase::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match &self.phase {
            Phase::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Render-facing projection of the current state.
    pub fn page_model(&self) -> PageModel<'_> {
        match &self.phase {
            Phase::Loading => PageModel::Loading,
            Phase::Failed { message, .. } => PageModel::Failed { message },
            Phase::Ready(snapshot) => PageModel::Ready {
                snapshot,
                overlay: self.overlay.image(),
            },
        }
    }
}

/// Turn a fetch outcome into the snapshot for `id`.
///
/// Only the first entry with a matching id is decoded; the shape of every
/// other entry is irrelevant.
pub fn resolve(id: &BugId, outcome: FetchOutcome) -> Result<BugSnapshot, LoadError> {
    let list: BugList = outcome?;
    let record = list.find(id).ok_or_else(|| LoadError::NotFound(id.clone()))??;
    Ok(BugSnapshot::normalize(record)?)
}
