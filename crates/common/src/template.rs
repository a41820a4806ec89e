//! Reply templates: the platform-neutral shape of every templated reply.
//!
//! Carousels can only be constructed with 1 to [`MAX_CAROUSEL_COLUMNS`]
//! columns. An empty input yields `None`, so callers are forced to decide
//! what to send instead.

/// Platform limit on carousel columns, trailing control columns included.
pub const MAX_CAROUSEL_COLUMNS: usize = 10;

/// A tappable element inside a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateAction {
    /// Sends `data` back to the bot as a postback event.
    Postback { label: String, data: String },
    /// Makes the user say `text` as if typed.
    Message { label: String, text: String },
    /// Opens `uri` on the client.
    Uri { label: String, uri: String },
}

impl TemplateAction {
    pub fn postback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Postback {
            label: label.into(),
            data: data.into(),
        }
    }

    pub fn message(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Message {
            label: label.into(),
            text: text.into(),
        }
    }

    pub fn uri(label: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::Uri {
            label: label.into(),
            uri: uri.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Postback { label, .. } | Self::Message { label, .. } | Self::Uri { label, .. } => {
                label
            },
        }
    }

    /// Postback data, if this is a postback action.
    pub fn postback_data(&self) -> Option<&str> {
        match self {
            Self::Postback { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// A menu of up to four buttons under a title and prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonMenu {
    pub thumbnail_url: String,
    pub title: String,
    pub text: String,
    pub actions: Vec<TemplateAction>,
}

/// One column of an article carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselColumn {
    pub thumbnail_url: String,
    pub title: String,
    pub text: String,
    pub actions: Vec<TemplateAction>,
}

/// One column of an image carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageColumn {
    pub image_url: String,
    pub action: TemplateAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCarousel {
    columns: Vec<CarouselColumn>,
}

impl ArticleCarousel {
    /// Build a carousel, keeping at most [`MAX_CAROUSEL_COLUMNS`] columns.
    /// Returns `None` when there are no columns.
    pub fn new(mut columns: Vec<CarouselColumn>) -> Option<Self> {
        if columns.is_empty() {
            return None;
        }
        columns.truncate(MAX_CAROUSEL_COLUMNS);
        Some(Self { columns })
    }

    /// Append a trailing column. If the carousel is already full the last
    /// column is replaced so the cap still holds.
    pub fn push_trailing(&mut self, column: CarouselColumn) {
        if self.columns.len() >= MAX_CAROUSEL_COLUMNS {
            self.columns.pop();
        }
        self.columns.push(column);
    }

    pub fn columns(&self) -> &[CarouselColumn] {
        &self.columns
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCarousel {
    columns: Vec<ImageColumn>,
}

impl ImageCarousel {
    /// Same column rules as [`ArticleCarousel::new`].
    pub fn new(mut columns: Vec<ImageColumn>) -> Option<Self> {
        if columns.is_empty() {
            return None;
        }
        columns.truncate(MAX_CAROUSEL_COLUMNS);
        Some(Self { columns })
    }

    pub fn columns(&self) -> &[ImageColumn] {
        &self.columns
    }
}

/// Everything the bot can reply with besides plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyTemplate {
    ButtonMenu(ButtonMenu),
    ArticleCarousel(ArticleCarousel),
    ImageCarousel(ImageCarousel),
}

impl ReplyTemplate {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ButtonMenu(_) => "buttons",
            Self::ArticleCarousel(_) => "carousel",
            Self::ImageCarousel(_) => "image_carousel",
        }
    }
}
