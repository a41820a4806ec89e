use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

/// One ingested board post.
///
/// Records are written by the crawler (or `pttbot import`); the bot itself
/// only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Stable external identifier, unique within the store (e.g. `M.1514736000.A.123`).
    pub article_id: String,
    pub title: String,
    /// Canonical link to the post.
    pub url: String,
    /// Post body. Used for keyword matching and as a thumbnail source.
    #[serde(default)]
    pub content: String,
    /// Image links in post order; the first one is the carousel thumbnail.
    #[serde(default)]
    pub image_links: Vec<String>,
    #[serde(default)]
    pub push_count: u32,
    #[serde(default)]
    pub boo_count: u32,
    pub posted_at: DateTime<Utc>,
}

/// How "hot" records are ranked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Push count alone.
    #[default]
    Push,
    /// Push count minus boo count.
    PushMinusBoo,
}

/// Where an inbound event came from. Only `user_id` is set for 1:1 chats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSource {
    pub user_id: Option<String>,
    pub group_id: Option<String>,
    pub room_id: Option<String>,
}

/// The payload of an inbound event, normalized across event types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A plain text message typed by the user.
    Text(String),
    /// The `data` string of a tapped postback action.
    Postback(String),
    /// Anything else (follow, join, sticker messages, ...), with a short
    /// description of what it was.
    Other(String),
}

/// A single event from a platform callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Absent for events that cannot be replied to (e.g. unfollow).
    pub reply_token: Option<String>,
    pub source: EventSource,
    pub kind: EventKind,
}

impl EventKind {
    pub fn name(&self) -> &str {
        match self {
            Self::Text(_) => "message",
            Self::Postback(_) => "postback",
            Self::Other(kind) => kind,
        }
    }
}
