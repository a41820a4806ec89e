//! Reply and profile calls against the LINE Messaging API.

use {
    async_trait::async_trait,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
    tracing::{debug, warn},
};

use crate::{error::LineError, message::OutboundMessage};

/// Display name used when the profile lookup fails.
pub const UNKNOWN_DISPLAY_NAME: &str = "Unknown";

/// Outbound side of the messaging platform.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver messages against a single-use reply token.
    async fn reply(&self, reply_token: &str, messages: &[OutboundMessage]) -> Result<(), LineError>;

    /// The user's display name, or [`UNKNOWN_DISPLAY_NAME`].
    async fn display_name(&self, user_id: &str) -> String;
}

pub struct LineClient {
    client: reqwest::Client,
    access_token: Secret<String>,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [OutboundMessage],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Profile {
    display_name: String,
}

impl LineClient {
    pub fn new(access_token: Secret<String>, base_url: impl AsRef<str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token,
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn profile(&self, user_id: &str) -> Result<Profile, LineError> {
        let resp = self
            .client
            .get(self.endpoint(&format!("/v2/bot/profile/{user_id}")))
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await?;
        Ok(check(resp).await?.json::<Profile>().await?)
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, LineError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(LineError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl Messenger for LineClient {
    async fn reply(&self, reply_token: &str, messages: &[OutboundMessage]) -> Result<(), LineError> {
        let resp = self
            .client
            .post(self.endpoint("/v2/bot/message/reply"))
            .bearer_auth(self.access_token.expose_secret())
            .json(&ReplyRequest {
                reply_token,
                messages,
            })
            .send()
            .await?;
        check(resp).await?;
        debug!(count = messages.len(), "reply delivered");
        Ok(())
    }

    async fn display_name(&self, user_id: &str) -> String {
        match self.profile(user_id).await {
            Ok(profile) => profile.display_name,
            Err(e) => {
                warn!(user_id, error = %e, "profile lookup failed");
                UNKNOWN_DISPLAY_NAME.to_string()
            },
        }
    }
}
