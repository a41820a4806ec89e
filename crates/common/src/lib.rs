//! Types shared by every pttbot crate: article records, normalized inbound
//! events and the reply templates handed to the messaging gateway.

pub mod template;
pub mod types;

pub use {
    template::{
        ArticleCarousel, ButtonMenu, CarouselColumn, ImageCarousel, ImageColumn,
        MAX_CAROUSEL_COLUMNS, ReplyTemplate, TemplateAction,
    },
    types::{ArticleRecord, EventKind, EventSource, InboundEvent, RankingPolicy},
};
