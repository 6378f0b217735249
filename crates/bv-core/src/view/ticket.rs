//! Load tickets: one per data-loading cycle.
//!
//! A ticket pairs a monotonically increasing generation with a shared
//! cancellation flag. The worker checks the flag before delivering a
//! result; the view checks both before committing one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bv_common::{BugId, RESOURCE_PATH};

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Identity of one load cycle.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    token: CancelToken,
}

impl LoadTicket {
    pub(crate) fn new(generation: u64) -> Self {
        Self {
            generation,
            token: CancelToken::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether `other` was issued for the same load cycle.
    pub fn same_cycle(&self, other: &LoadTicket) -> bool {
        self.generation == other.generation
    }
}

/// A fetch the host must perform on behalf of the view.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub id: BugId,
    pub ticket: LoadTicket,
}

impl LoadRequest {
    /// Resource the fetch targets; fixed for every request.
    pub fn resource(&self) -> &'static str {
        RESOURCE_PATH
    }
}
