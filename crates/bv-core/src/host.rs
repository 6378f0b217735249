//! Host runtime for a bug-detail view.
//!
//! The host owns a [`BugDetailView`] and executes the commands it returns:
//! fetches run on named worker threads and come back through a channel,
//! back navigation goes to a [`Navigator`]. The view itself is only ever
//! touched from the thread that owns the host.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use bv_common::BugId;
use bv_render::{PageGenerator, RenderedPage};
use tracing::{debug, error};

use crate::fetch::{BugSource, LoadError};
use crate::logging::{event_names, Stage};
use crate::view::{BugDetailView, Cmd, LoadRequest, Msg};

/// Routing layer seam: the only navigation the view performs is "back".
pub trait Navigator: Send {
    fn back(&mut self);
}

/// Navigator that ignores back requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn back(&mut self) {
        debug!("back navigation ignored");
    }
}

/// In-memory history stack.
#[derive(Debug, Default, Clone)]
pub struct HistoryNavigator {
    entries: Vec<String>,
    back_requests: usize,
}

impl HistoryNavigator {
    pub fn with_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
            back_requests: 0,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of back requests received, including ones at the first entry.
    pub fn back_requests(&self) -> usize {
        self.back_requests
    }
}

impl Navigator for HistoryNavigator {
    fn back(&mut self) {
        self.back_requests += 1;
        if self.entries.len() > 1 {
            self.entries.pop();
        }
        debug!(current = ?self.current(), "navigated back");
    }
}

/// Drives one view: dispatches messages and runs the commands they produce.
pub struct ViewHost<S: ?Sized, N> {
    view: BugDetailView,
    source: Arc<S>,
    navigator: N,
    tx: Sender<Msg>,
    rx: Receiver<Msg>,
    workers: Vec<JoinHandle<()>>,
}

impl<S, N> ViewHost<S, N>
where
    S: BugSource + ?Sized + 'static,
    N: Navigator,
{
    pub fn new(source: Arc<S>, navigator: N) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            view: BugDetailView::new(),
            source,
            navigator,
            tx,
            rx,
            workers: Vec::new(),
        }
    }

    pub fn view(&self) -> &BugDetailView {
        &self.view
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn mount(&mut self, id: BugId) {
        self.dispatch(Msg::Mount(id));
    }

    /// Route parameter changed.
    pub fn navigate(&mut self, id: BugId) {
        self.dispatch(Msg::IdChanged(id));
    }

    pub fn unmount(&mut self) {
        self.dispatch(Msg::Unmount);
    }

    /// Apply a message to the view and run the resulting command.
    pub fn dispatch(&mut self, msg: Msg) {
        debug!(msg = msg.name(), "dispatch");
        let cmd = self.view.update(msg);
        self.run(cmd);
    }

    /// Apply every completion already delivered; never blocks.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.dispatch(msg);
            applied += 1;
        }
        applied
    }

    /// Block until the view leaves the loading phase.
    ///
    /// Returns `false` if `deadline` passed first or no fetch is pending.
    /// The view stays loading in that case; the deadline bounds only the
    /// caller's wait.
    pub fn wait_settled(&mut self, deadline: Option<Instant>) -> bool {
        loop {
            self.pump();
            if !self.view.is_loading() {
                return true;
            }
            if self.view.pending_ticket().is_none() {
                return false;
            }
            let msg = match deadline {
                None => match self.rx.recv() {
                    Ok(msg) => msg,
                    Err(_) => return false,
                },
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    match self.rx.recv_timeout(deadline - now) {
                        Ok(msg) => msg,
                        Err(RecvTimeoutError::Timeout) => return false,
                        Err(RecvTimeoutError::Disconnected) => return false,
                    }
                }
            };
            self.dispatch(msg);
        }
    }

    /// Render the current state and feed image failures back to the view.
    pub fn render(&mut self, generator: &PageGenerator) -> bv_render::Result<RenderedPage> {
        let page = generator.render(&self.view.page_model())?;
        for failure in &page.asset_failures {
            self.dispatch(Msg::AssetFailed {
                path: failure.path.clone(),
                kind: failure.kind,
            });
        }
        Ok(page)
    }

    /// Fetch workers that have not finished yet.
    pub fn in_flight(&mut self) -> usize {
        self.workers.retain(|worker| !worker.is_finished());
        self.workers.len()
    }

    fn run(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Fetch(request) => self.spawn_fetch(request),
            Cmd::NavigateBack => self.navigator.back(),
        }
    }

    fn spawn_fetch(&mut self, request: LoadRequest) {
        self.workers.retain(|worker| !worker.is_finished());

        let ticket = request.ticket.clone();
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let name = format!("bv-fetch-{}", ticket.generation());

        let spawned = thread::Builder::new().name(name).spawn(move || {
            debug!(
                event = event_names::FETCH_STARTED,
                stage = %Stage::Fetch,
                bug_id = %request.id,
                resource = request.resource(),
                source = %source.describe(),
                "fetching bug list"
            );
            let outcome = source.fetch_list();
            if request.ticket.is_cancelled() {
                debug!(
                    event = event_names::LOAD_STALE,
                    generation = request.ticket.generation(),
                    "fetch finished after cancellation"
                );
                return;
            }
            // The host may be gone; nothing is waiting for this result then.
            let _ = tx.send(Msg::ListFetched {
                ticket: request.ticket,
                outcome,
            });
        });

        match spawned {
            Ok(worker) => self.workers.push(worker),
            Err(err) => {
                error!(error = %err, "failed to spawn fetch worker");
                self.dispatch(Msg::ListFetched {
                    ticket,
                    outcome: Err(LoadError::Transport(format!(
                        "failed to spawn fetch worker: {}",
                        err
                    ))),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bv_common::{parse_bug_list, BugList};
    use std::time::Duration;

    struct StaticSource(&'static str);

    impl BugSource for StaticSource {
        fn fetch_list(&self) -> Result<BugList, LoadError> {
            Ok(parse_bug_list(self.0)?)
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    #[test]
    fn test_mount_and_settle() {
        let source = Arc::new(StaticSource(r#"[{"id":"1","title":"T"}]"#));
        let mut host = ViewHost::new(source, NoopNavigator);
        host.mount(BugId::new("1"));
        assert!(host.wait_settled(Some(Instant::now() + Duration::from_secs(5))));
        assert_eq!(host.view().snapshot().unwrap().title(), Some("T"));
    }

    #[test]
    fn test_back_goes_to_navigator() {
        let source = Arc::new(StaticSource("[]"));
        let mut host = ViewHost::new(
            source,
            HistoryNavigator::with_entries(["/bugs", "/bugs/1"]),
        );
        host.dispatch(Msg::NavigateBack);
        assert_eq!(host.navigator().current(), Some("/bugs"));
        host.dispatch(Msg::NavigateBack);
        assert_eq!(host.navigator().current(), Some("/bugs"));
        assert_eq!(host.navigator().back_requests(), 2);
        assert_eq!(host.navigator().entries(), ["/bugs"]);
    }

    #[test]
    fn test_wait_without_fetch_returns() {
        let source = Arc::new(StaticSource("[]"));
        let mut host = ViewHost::new(source, NoopNavigator);
        assert!(!host.wait_settled(None));
    }
}
