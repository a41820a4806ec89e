use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    pttbot_common::{ArticleRecord, RankingPolicy},
};

/// Read side of the article collection, plus the upsert used by imports.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Most recent first; `page` is zero-based.
    async fn newest(&self, page: u32, page_size: usize) -> anyhow::Result<Vec<ArticleRecord>>;

    /// Top `limit` records posted at or after `since`, best first.
    async fn most_liked(
        &self,
        since: DateTime<Utc>,
        limit: usize,
        ranking: RankingPolicy,
    ) -> anyhow::Result<Vec<ArticleRecord>>;

    /// Up to `limit` uniformly sampled records. With a keyword, only records
    /// whose title or content contains it are eligible; a blank keyword
    /// matches nothing.
    async fn random(&self, limit: usize, keyword: Option<&str>)
    -> anyhow::Result<Vec<ArticleRecord>>;

    async fn get(&self, article_id: &str) -> anyhow::Result<Option<ArticleRecord>>;

    async fn upsert(&self, record: &ArticleRecord) -> anyhow::Result<()>;
}
