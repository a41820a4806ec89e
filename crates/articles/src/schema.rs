use sqlx::SqlitePool;

const MIGRATIONS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS articles (
        article_id  TEXT PRIMARY KEY,
        title       TEXT NOT NULL,
        url         TEXT NOT NULL,
        content     TEXT NOT NULL DEFAULT '',
        image_links TEXT NOT NULL DEFAULT '[]',
        push_count  INTEGER NOT NULL DEFAULT 0,
        boo_count   INTEGER NOT NULL DEFAULT 0,
        posted_at   INTEGER NOT NULL
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_articles_posted_at ON articles(posted_at)",
];

/// Create the article table and indexes. Safe to run on every start.
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    for statement in MIGRATIONS {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Row shape of the `articles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRow {
    pub article_id: String,
    pub title: String,
    pub url: String,
    pub content: String,
    /// JSON array of strings.
    pub image_links: String,
    pub push_count: i64,
    pub boo_count: i64,
    /// Unix seconds.
    pub posted_at: i64,
}
