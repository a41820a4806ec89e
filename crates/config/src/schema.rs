//! Config schema types. Every section is optional in the file and falls
//! back to the defaults the bot has always shipped with.

use std::{fmt, path::PathBuf, str::FromStr};

use {
    pttbot_common::RankingPolicy,
    secrecy::Secret,
    serde::Deserialize,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub line: LineConfig,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub reply: ReplyConfig,
}

/// LINE Messaging API credentials.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    pub channel_secret: Secret<String>,
    pub channel_access_token: Secret<String>,
    /// Override for tests and proxies.
    pub api_base_url: String,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_secret: Secret::new(String::new()),
            channel_access_token: Secret::new(String::new()),
            api_base_url: "https://api.line.me".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Http,
    Https,
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" | "" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(format!("unknown run mode '{other}'")),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Https => f.write_str("https"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub mode: RunMode,
    pub tls_cert_path: PathBuf,
    pub tls_key_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
            mode: RunMode::Http,
            tls_cert_path: PathBuf::from("/etc/dehydrated/certs/nt1.me/fullchain.pem"),
            tls_key_path: PathBuf::from("/etc/dehydrated/certs/nt1.me/privkey.pem"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// sqlx connection string.
    pub database_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:pttbot.db?mode=rwc".into(),
        }
    }
}

/// What `MonthlyHot` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MonthlyHotMode {
    /// The month's top records, like the other hot windows.
    #[default]
    Ranked,
    /// A random carousel drawn from the month's top `pool` records.
    Sample {
        #[serde(default = "default_sample_pool")]
        pool: usize,
    },
}

fn default_sample_pool() -> usize {
    100
}

/// Fixed texts and art used when rendering replies.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReplyConfig {
    /// Menu title, also used on the pagination column.
    pub title: String,
    /// Menu prompt under the title.
    pub prompt: String,
    /// Shown by clients that cannot render templates.
    pub alt_text: String,
    /// Article thumbnail when a record has no usable image.
    pub default_image: String,
    /// Art for the menu and the pagination column.
    pub default_thumbnail: String,
    pub ranking: RankingPolicy,
    pub monthly_hot: MonthlyHotMode,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            title: "💋表特看看".into(),
            prompt: "你可以試試看以下選項，或直接輸入關鍵字查詢".into(),
            alt_text: "正妹只在手機上".into(),
            default_image: "https://i.imgur.com/WAnWk7K.png".into(),
            default_thumbnail: "https://i.imgur.com/StcRAPB.png".into(),
            ranking: RankingPolicy::Push,
            monthly_hot: MonthlyHotMode::Ranked,
        }
    }
}
