//! Action handlers: run the query behind an action and render the reply.

pub mod reply;
pub mod template;
pub mod thumbnail;

pub use {
    reply::{AutoReplier, HotWindow},
    template::TemplateBuilder,
    thumbnail::{ThumbnailResolver, ThumbnailSource},
};
