//! Pure template construction from query results.

use {
    pttbot_common::{
        ArticleCarousel, ArticleRecord, ButtonMenu, CarouselColumn, ImageCarousel, ImageColumn,
        MAX_CAROUSEL_COLUMNS, ReplyTemplate, TemplateAction,
    },
    pttbot_config::ReplyConfig,
    pttbot_routing::{
        ActionKind, OPEN_LINK_LABEL, PaginationToken,
        postback::{encode_action, encode_show_images},
    },
    tracing::debug,
};

use crate::thumbnail::ThumbnailResolver;

/// Titles this long or longer are cut.
pub const TITLE_TRUNCATE_AT: usize = 40;
/// Characters kept from a cut title.
pub const TITLE_KEEP: usize = 39;
/// Article columns on a `Newest` page; the pagination column fills the last slot.
pub const NEWEST_PAGE_SIZE: usize = MAX_CAROUSEL_COLUMNS - 1;

const CONTINUE_PROMPT: &str = "繼續看？";

/// Hard cut to [`TITLE_KEEP`] characters for titles of [`TITLE_TRUNCATE_AT`]
/// characters or more.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() >= TITLE_TRUNCATE_AT {
        title.chars().take(TITLE_KEEP).collect()
    } else {
        title.to_string()
    }
}

pub fn reaction_text(push: u32, boo: u32) -> String {
    format!("{push} 😍\t{boo} 😡")
}

pub fn show_images_label(count: usize) -> String {
    format!("{} ({count})", ActionKind::ShowAllImages.label())
}

#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    config: ReplyConfig,
    thumbnails: ThumbnailResolver,
}

impl TemplateBuilder {
    pub fn new(config: ReplyConfig) -> Self {
        let thumbnails = ThumbnailResolver::new(config.default_image.clone());
        Self { config, thumbnails }
    }

    pub fn config(&self) -> &ReplyConfig {
        &self.config
    }

    /// The menu offered on "help", on empty results and on failures.
    pub fn help_menu(&self) -> ReplyTemplate {
        let newest = PaginationToken::new(ActionKind::Newest, 0);
        let options = [ActionKind::DailyHot, ActionKind::YearHot, ActionKind::Random];
        let mut actions = vec![TemplateAction::postback(
            ActionKind::Newest.label(),
            newest.encode(),
        )];
        actions.extend(
            options
                .into_iter()
                .map(|kind| TemplateAction::postback(kind.label(), encode_action(kind))),
        );
        ReplyTemplate::ButtonMenu(ButtonMenu {
            thumbnail_url: self.config.default_thumbnail.clone(),
            title: self.config.title.clone(),
            text: self.config.prompt.clone(),
            actions,
        })
    }

    pub fn article_column(&self, record: &ArticleRecord) -> CarouselColumn {
        let (thumbnail, source) = self.thumbnails.resolve(record);
        debug!(article_id = %record.article_id, ?source, "thumbnail resolved");
        CarouselColumn {
            thumbnail_url: thumbnail.to_string(),
            title: truncate_title(&record.title),
            text: reaction_text(record.push_count, record.boo_count),
            actions: vec![
                TemplateAction::uri(OPEN_LINK_LABEL, record.url.clone()),
                TemplateAction::postback(
                    ActionKind::Random.label(),
                    encode_action(ActionKind::Random),
                ),
                TemplateAction::postback(
                    show_images_label(record.image_links.len()),
                    encode_show_images(&record.article_id),
                ),
            ],
        }
    }

    /// One column per record, at most [`MAX_CAROUSEL_COLUMNS`]. `None` when
    /// there are no records.
    pub fn article_carousel(&self, records: &[ArticleRecord]) -> Option<ArticleCarousel> {
        ArticleCarousel::new(
            records
                .iter()
                .take(MAX_CAROUSEL_COLUMNS)
                .map(|r| self.article_column(r))
                .collect(),
        )
    }

    /// Previous/next controls for `token.page`.
    pub fn pagination_column(&self, token: PaginationToken) -> CarouselColumn {
        let previous = token.previous();
        let next = token.next();
        CarouselColumn {
            thumbnail_url: self.config.default_thumbnail.clone(),
            title: self.config.title.clone(),
            text: CONTINUE_PROMPT.into(),
            actions: vec![
                TemplateAction::message(ActionKind::Help.label(), ActionKind::Help.label()),
                TemplateAction::postback(format!("上一頁 {}", previous.page), previous.encode()),
                TemplateAction::postback(format!("下一頁 {}", next.page), next.encode()),
            ],
        }
    }

    /// A page of newest records followed by the pagination column.
    pub fn newest_carousel(&self, records: &[ArticleRecord], page: u32) -> Option<ArticleCarousel> {
        let mut carousel = self.article_carousel(&records[..records.len().min(NEWEST_PAGE_SIZE)])?;
        carousel.push_trailing(self.pagination_column(PaginationToken::new(ActionKind::Newest, page)));
        Some(carousel)
    }

    /// The first [`MAX_CAROUSEL_COLUMNS`] images of an article. Every column
    /// opens the article, not the image.
    pub fn image_carousel(&self, record: &ArticleRecord) -> Option<ImageCarousel> {
        ImageCarousel::new(
            record
                .image_links
                .iter()
                .filter(|link| !link.trim().is_empty())
                .take(MAX_CAROUSEL_COLUMNS)
                .map(|link| ImageColumn {
                    image_url: link.clone(),
                    action: TemplateAction::uri(OPEN_LINK_LABEL, record.url.clone()),
                })
                .collect(),
        )
    }
}
