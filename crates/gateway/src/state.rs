use std::sync::Arc;

use {
    pttbot_auto_reply::AutoReplier,
    pttbot_line::Messenger,
    secrecy::{ExposeSecret, Secret},
};

/// Shared by every request. Read-only after startup.
pub struct AppState {
    pub messenger: Arc<dyn Messenger>,
    pub replier: AutoReplier,
    channel_secret: Secret<String>,
}

impl AppState {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        replier: AutoReplier,
        channel_secret: Secret<String>,
    ) -> Self {
        Self {
            messenger,
            replier,
            channel_secret,
        }
    }

    pub fn channel_secret(&self) -> &str {
        self.channel_secret.expose_secret()
    }

    pub fn alt_text(&self) -> &str {
        &self.replier.templates().config().alt_text
    }
}
