//! Bug-detail view.
//!
//! Elm-style: the view owns its state, [`BugDetailView::update`] applies a
//! [`Msg`] and returns a [`Cmd`] for the host to run. The only suspending
//! operation is the bug list fetch; its completion comes back as
//! [`Msg::ListFetched`] carrying the [`LoadTicket`] it was issued with.

pub mod model;
pub mod msg;
pub mod overlay;
pub mod ticket;

pub use model::{resolve, BugDetailView, Phase};
pub use msg::{Cmd, FetchOutcome, Msg};
pub use overlay::Overlay;
pub use ticket::{CancelToken, LoadRequest, LoadTicket};
