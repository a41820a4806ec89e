//! Webhook server: verifies LINE callbacks, routes every event to an action
//! and replies with the rendered template.

pub mod dispatch;
pub mod server;
pub mod state;

pub use {
    dispatch::{dispatch_events, handle_event},
    server::{build_router, serve},
    state::AppState,
};

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod test_support;
