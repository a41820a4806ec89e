//! Fakes shared by the gateway tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    pttbot_articles::ArticleStore,
    pttbot_auto_reply::AutoReplier,
    pttbot_common::{ArticleRecord, RankingPolicy},
    pttbot_config::ReplyConfig,
    pttbot_line::{LineError, Messenger, OutboundMessage, UNKNOWN_DISPLAY_NAME},
    secrecy::Secret,
};

use crate::state::AppState;

pub const SECRET: &str = "test-channel-secret";

#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(String, Vec<OutboundMessage>)>>,
    lookups: Mutex<Vec<String>>,
}

impl RecordingMessenger {
    pub fn sent(&self) -> Vec<(String, Vec<OutboundMessage>)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn reply(&self, reply_token: &str, messages: &[OutboundMessage]) -> Result<(), LineError> {
        self.sent
            .lock()
            .unwrap()
            .push((reply_token.to_string(), messages.to_vec()));
        Ok(())
    }

    async fn display_name(&self, user_id: &str) -> String {
        self.lookups.lock().unwrap().push(user_id.to_string());
        "tester".into()
    }
}

/// Rejects every reply, as with an expired reply token.
#[derive(Default)]
pub struct FailingMessenger {
    attempts: AtomicUsize,
}

impl FailingMessenger {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Messenger for FailingMessenger {
    async fn reply(&self, _reply_token: &str, _messages: &[OutboundMessage]) -> Result<(), LineError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(LineError::Api {
            status: 400,
            body: "Invalid reply token".into(),
        })
    }

    async fn display_name(&self, _user_id: &str) -> String {
        UNKNOWN_DISPLAY_NAME.into()
    }
}

struct MemoryStore {
    records: Vec<ArticleRecord>,
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn newest(&self, page: u32, page_size: usize) -> anyhow::Result<Vec<ArticleRecord>> {
        Ok(self
            .records
            .iter()
            .skip(page as usize * page_size)
            .take(page_size)
            .cloned()
            .collect())
    }

    async fn most_liked(
        &self,
        since: DateTime<Utc>,
        limit: usize,
        _ranking: RankingPolicy,
    ) -> anyhow::Result<Vec<ArticleRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.posted_at >= since)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn random(&self, limit: usize, keyword: Option<&str>) -> anyhow::Result<Vec<ArticleRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| keyword.is_none_or(|k| r.title.contains(k)))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get(&self, article_id: &str) -> anyhow::Result<Option<ArticleRecord>> {
        Ok(self.records.iter().find(|r| r.article_id == article_id).cloned())
    }

    async fn upsert(&self, _record: &ArticleRecord) -> anyhow::Result<()> {
        Ok(())
    }
}

pub fn article(id: &str, images: usize) -> ArticleRecord {
    ArticleRecord {
        article_id: id.into(),
        title: format!("[正妹] {id}"),
        url: format!("https://www.ptt.cc/bbs/Beauty/{id}.html"),
        content: String::new(),
        image_links: (0..images)
            .map(|i| format!("https://i.imgur.com/{id}-{i}.jpg"))
            .collect(),
        push_count: 5,
        boo_count: 1,
        posted_at: Utc::now(),
    }
}

pub fn state_with(messenger: Arc<dyn Messenger>, records: Vec<ArticleRecord>) -> AppState {
    let replier = AutoReplier::new(Arc::new(MemoryStore { records }), ReplyConfig::default());
    AppState::new(messenger, replier, Secret::new(SECRET.to_string()))
}
