//! Bot configuration: TOML file discovery, environment overrides, validation.

pub mod loader;
pub mod schema;

pub use {
    loader::{ConfigError, discover_config_path, load_config, load_config_unchecked},
    schema::{
        BotConfig, LineConfig, MonthlyHotMode, ReplyConfig, RunMode, ServerConfig, StoreConfig,
    },
};
