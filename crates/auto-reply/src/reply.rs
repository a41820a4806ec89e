use std::sync::Arc;

use {
    chrono::{DateTime, Duration, Utc},
    pttbot_articles::ArticleStore,
    pttbot_common::{ArticleRecord, MAX_CAROUSEL_COLUMNS, ReplyTemplate},
    pttbot_config::{MonthlyHotMode, ReplyConfig},
    pttbot_routing::Action,
    rand::seq::IndexedRandom,
    tracing::{debug, info, warn},
};

use crate::template::{NEWEST_PAGE_SIZE, TemplateBuilder};

/// Records per hot/random/keyword carousel.
pub const RESULT_LIMIT: usize = MAX_CAROUSEL_COLUMNS;

/// Trailing popularity windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotWindow {
    Day,
    Month,
    Year,
}

impl HotWindow {
    pub fn duration(self) -> Duration {
        match self {
            Self::Day => Duration::days(1),
            Self::Month => Duration::days(30),
            Self::Year => Duration::days(365),
        }
    }
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Runs actions against the article store and renders the reply.
///
/// Query failures are logged and treated as empty results. Empty results
/// always produce the help menu, so every action yields a template.
pub struct AutoReplier {
    store: Arc<dyn ArticleStore>,
    templates: TemplateBuilder,
    clock: Clock,
}

impl AutoReplier {
    pub fn new(store: Arc<dyn ArticleStore>, config: ReplyConfig) -> Self {
        Self {
            store,
            templates: TemplateBuilder::new(config),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock used to compute popularity windows.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn templates(&self) -> &TemplateBuilder {
        &self.templates
    }

    /// Main entry point: produce the reply for a routed action.
    pub async fn get_reply(&self, action: &Action) -> ReplyTemplate {
        info!(action = %action, "handling action");
        let reply = match action {
            Action::Newest { page } => self.newest(*page).await,
            Action::DailyHot => self.hot(HotWindow::Day).await,
            Action::MonthlyHot => self.monthly_hot().await,
            Action::YearHot => self.hot(HotWindow::Year).await,
            Action::Random => self.random(None).await,
            Action::KeywordSearch { keyword } => self.random(Some(keyword)).await,
            Action::ShowAllImages { article_id } => self.all_images(article_id).await,
            Action::Help => None,
        };
        reply.unwrap_or_else(|| self.templates.help_menu())
    }

    async fn newest(&self, page: u32) -> Option<ReplyTemplate> {
        let records = or_empty(
            self.store.newest(page, NEWEST_PAGE_SIZE).await,
            "newest",
        );
        self.templates
            .newest_carousel(&records, page)
            .map(ReplyTemplate::ArticleCarousel)
    }

    async fn hot(&self, window: HotWindow) -> Option<ReplyTemplate> {
        let records = self.most_liked(window, RESULT_LIMIT).await;
        self.carousel(&records)
    }

    async fn monthly_hot(&self) -> Option<ReplyTemplate> {
        match self.templates.config().monthly_hot {
            MonthlyHotMode::Ranked => self.hot(HotWindow::Month).await,
            MonthlyHotMode::Sample { pool } => {
                let candidates = self.most_liked(HotWindow::Month, pool).await;
                let picked = sample(&candidates, RESULT_LIMIT);
                debug!(pool, candidates = candidates.len(), picked = picked.len(), "monthly sample");
                self.carousel(&picked)
            },
        }
    }

    async fn random(&self, keyword: Option<&str>) -> Option<ReplyTemplate> {
        let records = or_empty(self.store.random(RESULT_LIMIT, keyword).await, "random");
        if records.is_empty()
            && let Some(keyword) = keyword
        {
            info!(keyword, "no records match keyword");
        }
        self.carousel(&records)
    }

    async fn all_images(&self, article_id: &str) -> Option<ReplyTemplate> {
        let record = match self.store.get(article_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!(article_id, "article not found");
                return None;
            },
            Err(e) => {
                warn!(article_id, error = %e, "article lookup failed");
                return None;
            },
        };
        self.templates
            .image_carousel(&record)
            .map(ReplyTemplate::ImageCarousel)
    }

    async fn most_liked(&self, window: HotWindow, limit: usize) -> Vec<ArticleRecord> {
        let since = (self.clock)() - window.duration();
        let ranking = self.templates.config().ranking;
        or_empty(
            self.store.most_liked(since, limit, ranking).await,
            "most_liked",
        )
    }

    fn carousel(&self, records: &[ArticleRecord]) -> Option<ReplyTemplate> {
        self.templates
            .article_carousel(records)
            .map(ReplyTemplate::ArticleCarousel)
    }
}

fn or_empty(result: anyhow::Result<Vec<ArticleRecord>>, query: &'static str) -> Vec<ArticleRecord> {
    result.unwrap_or_else(|e| {
        warn!(query, error = %e, "article query failed, treating as empty");
        Vec::new()
    })
}

fn sample(records: &[ArticleRecord], amount: usize) -> Vec<ArticleRecord> {
    records
        .choose_multiple(&mut rand::rng(), amount)
        .cloned()
        .collect()
}
