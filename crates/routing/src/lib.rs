//! Maps inbound text and postback events to bot actions.
//!
//! All cross-turn state (the current page) travels inside postback payloads,
//! so routing is a pure function of the event.

pub mod action;
pub mod postback;
pub mod router;

pub use {
    action::{Action, ActionKind, OPEN_LINK_LABEL},
    postback::{PageParam, PaginationToken, PostbackParams},
    router::{Ignored, Route, route},
};
