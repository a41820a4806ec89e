//! Thumbnail selection for article columns.
//!
//! Sources, most trusted first: the stored first image link, the first
//! `https` URL in the post body whose path ends in `.jpg`, the configured
//! default image. Thumbnails must be `https`.

use std::sync::LazyLock;

use {pttbot_common::ArticleRecord, regex::Regex};

#[allow(clippy::expect_used)]
static JPG_URL: LazyLock<Regex> = LazyLock::new(|| {
    // `.jpg` must end the path: followed by a query, a fragment, a delimiter or the end
    Regex::new(r#"(?i)(https://[^\s"'<>]+?\.jpg(?:[?#][^\s"'<>]*)?)(?:[\s"'<>]|$)"#)
        .expect("valid jpg url pattern")
});

/// Where a thumbnail came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailSource {
    Stored,
    Content,
    Default,
}

#[derive(Debug, Clone)]
pub struct ThumbnailResolver {
    default_image: String,
}

impl ThumbnailResolver {
    pub fn new(default_image: impl Into<String>) -> Self {
        Self {
            default_image: default_image.into(),
        }
    }

    pub fn resolve<'a>(&'a self, record: &'a ArticleRecord) -> (&'a str, ThumbnailSource) {
        if let Some(link) = record.image_links.first().filter(|l| !l.trim().is_empty()) {
            return (link, ThumbnailSource::Stored);
        }
        if let Some(found) = JPG_URL.captures(&record.content).and_then(|c| c.get(1)) {
            return (found.as_str(), ThumbnailSource::Content);
        }
        (&self.default_image, ThumbnailSource::Default)
    }
}
