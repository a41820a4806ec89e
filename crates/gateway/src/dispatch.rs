use {
    pttbot_common::{EventKind, InboundEvent},
    pttbot_line::{OutboundMessage, UNKNOWN_DISPLAY_NAME},
    pttbot_routing::{Route, route},
    tracing::{error, info, warn},
};

use crate::state::AppState;

/// Handle events one after another, in delivery order. A failing event
/// does not stop the rest.
pub async fn dispatch_events(state: &AppState, events: Vec<InboundEvent>) {
    for event in events {
        handle_event(state, event).await;
    }
}

pub async fn handle_event(state: &AppState, event: InboundEvent) {
    let source = &event.source;
    let display_name = match (&event.kind, source.user_id.as_deref()) {
        (EventKind::Text(_), Some(user_id)) => state.messenger.display_name(user_id).await,
        _ => UNKNOWN_DISPLAY_NAME.to_string(),
    };
    info!(
        event = event.kind.name(),
        user = %display_name,
        user_id = source.user_id.as_deref().unwrap_or_default(),
        room_id = source.room_id.as_deref().unwrap_or_default(),
        group_id = source.group_id.as_deref().unwrap_or_default(),
        "received event"
    );
    match &event.kind {
        EventKind::Text(text) => info!(text = %text, "text message"),
        EventKind::Postback(data) => info!(data = %data, "postback"),
        EventKind::Other(_) => {},
    }

    let action = match route(&event.kind) {
        Route::Dispatch(action) => action,
        Route::Ignore(reason) => {
            warn!(reason = %reason, "event ignored");
            return;
        },
    };
    info!(action = %action, "selected action");

    let Some(reply_token) = event.reply_token.as_deref() else {
        warn!(action = %action, "event has no reply token, dropping reply");
        return;
    };

    let template = state.replier.get_reply(&action).await;
    let kind = template.kind();
    let message = OutboundMessage::template(state.alt_text(), template);
    match state.messenger.reply(reply_token, &[message]).await {
        Ok(()) => info!(action = %action, template = kind, "reply sent"),
        Err(e) => error!(action = %action, error = %e, "reply failed"),
    }
}
