//! Article queries: newest page, popularity window, random sample, lookup by id.

pub mod schema;
pub mod store;
pub mod store_sqlite;

pub use {store::ArticleStore, store_sqlite::SqliteArticleStore};
