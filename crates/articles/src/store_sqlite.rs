use {
    anyhow::Context,
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    pttbot_common::{ArticleRecord, RankingPolicy},
    sqlx::SqlitePool,
    tracing::debug,
};

use crate::{schema::ArticleRow, store::ArticleStore};

const COLUMNS: &str =
    "article_id, title, url, content, image_links, push_count, boo_count, posted_at";

pub struct SqliteArticleStore {
    pool: SqlitePool,
}

impl SqliteArticleStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TryFrom<ArticleRow> for ArticleRecord {
    type Error = anyhow::Error;

    fn try_from(row: ArticleRow) -> anyhow::Result<Self> {
        let image_links: Vec<String> = serde_json::from_str(&row.image_links)
            .with_context(|| format!("bad image_links for {}", row.article_id))?;
        let posted_at = DateTime::<Utc>::from_timestamp(row.posted_at, 0)
            .with_context(|| format!("bad posted_at for {}", row.article_id))?;
        Ok(Self {
            article_id: row.article_id,
            title: row.title,
            url: row.url,
            content: row.content,
            image_links,
            push_count: u32::try_from(row.push_count).unwrap_or(0),
            boo_count: u32::try_from(row.boo_count).unwrap_or(0),
            posted_at,
        })
    }
}

fn into_records(rows: Vec<ArticleRow>) -> anyhow::Result<Vec<ArticleRecord>> {
    rows.into_iter().map(ArticleRecord::try_from).collect()
}

/// `%keyword%` with LIKE wildcards in the keyword escaped.
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// The popularity score of a row under `ranking`, as SQL.
fn score_expr(ranking: RankingPolicy) -> &'static str {
    match ranking {
        RankingPolicy::Push => "push_count",
        RankingPolicy::PushMinusBoo => "(push_count - boo_count)",
    }
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl ArticleStore for SqliteArticleStore {
    async fn newest(&self, page: u32, page_size: usize) -> anyhow::Result<Vec<ArticleRecord>> {
        let limit = limit_param(page_size);
        let offset = limit.saturating_mul(i64::from(page));
        let sql = format!(
            "SELECT {COLUMNS} FROM articles ORDER BY posted_at DESC, article_id DESC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        debug!(page, page_size, found = rows.len(), "newest query");
        into_records(rows)
    }

    async fn most_liked(
        &self,
        since: DateTime<Utc>,
        limit: usize,
        ranking: RankingPolicy,
    ) -> anyhow::Result<Vec<ArticleRecord>> {
        let score = score_expr(ranking);
        let sql = format!(
            "SELECT {COLUMNS} FROM articles WHERE posted_at >= ? \
             ORDER BY {score} DESC, posted_at DESC LIMIT ?"
        );
        let rows = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(since.timestamp())
            .bind(limit_param(limit))
            .fetch_all(&self.pool)
            .await?;
        debug!(%since, limit, ?ranking, found = rows.len(), "most liked query");
        into_records(rows)
    }

    async fn random(
        &self,
        limit: usize,
        keyword: Option<&str>,
    ) -> anyhow::Result<Vec<ArticleRecord>> {
        let keyword = keyword.map(str::trim);
        if keyword.is_some_and(str::is_empty) {
            debug!("blank keyword matches nothing");
            return Ok(Vec::new());
        }
        let rows = match keyword {
            Some(keyword) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM articles \
                     WHERE title LIKE ?1 ESCAPE '\\' OR content LIKE ?1 ESCAPE '\\' \
                     ORDER BY RANDOM() LIMIT ?2"
                );
                sqlx::query_as::<_, ArticleRow>(&sql)
                    .bind(like_pattern(keyword))
                    .bind(limit_param(limit))
                    .fetch_all(&self.pool)
                    .await?
            },
            None => {
                let sql = format!("SELECT {COLUMNS} FROM articles ORDER BY RANDOM() LIMIT ?");
                sqlx::query_as::<_, ArticleRow>(&sql)
                    .bind(limit_param(limit))
                    .fetch_all(&self.pool)
                    .await?
            },
        };
        debug!(limit, ?keyword, found = rows.len(), "random query");
        into_records(rows)
    }

    async fn get(&self, article_id: &str) -> anyhow::Result<Option<ArticleRecord>> {
        let sql = format!("SELECT {COLUMNS} FROM articles WHERE article_id = ?");
        let row = sqlx::query_as::<_, ArticleRow>(&sql)
            .bind(article_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(ArticleRecord::try_from).transpose()
    }

    async fn upsert(&self, record: &ArticleRecord) -> anyhow::Result<()> {
        let image_links = serde_json::to_string(&record.image_links)?;
        sqlx::query(
            r#"INSERT INTO articles
                (article_id, title, url, content, image_links, push_count, boo_count, posted_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(article_id) DO UPDATE SET
                 title = excluded.title,
                 url = excluded.url,
                 content = excluded.content,
                 image_links = excluded.image_links,
                 push_count = excluded.push_count,
                 boo_count = excluded.boo_count,
                 posted_at = excluded.posted_at"#,
        )
        .bind(&record.article_id)
        .bind(&record.title)
        .bind(&record.url)
        .bind(&record.content)
        .bind(image_links)
        .bind(i64::from(record.push_count))
        .bind(i64::from(record.boo_count))
        .bind(record.posted_at.timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
