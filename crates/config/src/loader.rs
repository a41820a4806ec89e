use std::path::{Path, PathBuf};

use {
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, info},
};

use crate::schema::{BotConfig, MonthlyHotMode, RunMode};

/// File name looked up in the working directory and the platform config dir.
pub const CONFIG_FILE_NAME: &str = "pttbot.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {0} does not exist")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Find the config file to load.
///
/// An explicit path must exist. Otherwise `./pttbot.toml` wins over the
/// platform config directory; `None` means "run on defaults".
pub fn discover_config_path(
    explicit: Option<&Path>,
    cwd: &Path,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let local = cwd.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(Some(local));
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "pttbot") {
        let candidate = dirs.config_dir().join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Ok(Some(candidate));
        }
    }

    Ok(None)
}

/// Load, override from the process environment, and validate.
pub fn load_config(explicit: Option<&Path>) -> Result<BotConfig, ConfigError> {
    let config = load_config_unchecked(explicit)?;
    config.validate()?;
    Ok(config)
}

/// [`load_config`] without validation, for commands that never talk to LINE.
pub fn load_config_unchecked(explicit: Option<&Path>) -> Result<BotConfig, ConfigError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut config = match discover_config_path(explicit, &cwd)? {
        Some(path) => {
            info!(path = %path.display(), "loading config file");
            parse_file(&path)?
        },
        None => {
            info!("no config file found, using defaults");
            BotConfig::default()
        },
    };
    config.apply_env(|name| std::env::var(name).ok())?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<BotConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn first_set(lookup: &impl Fn(&str) -> Option<String>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| lookup(name).filter(|v| !v.is_empty()))
}

impl BotConfig {
    /// Apply environment overrides on top of the file values.
    ///
    /// `lookup` is `std::env::var` in production and a map in tests.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(secret) = first_set(&lookup, &["ChannelSecret", "PTTBOT_CHANNEL_SECRET"]) {
            debug!("channel secret taken from environment");
            self.line.channel_secret = Secret::new(secret);
        }
        if let Some(token) =
            first_set(&lookup, &["ChannelAccessToken", "PTTBOT_CHANNEL_ACCESS_TOKEN"])
        {
            debug!("channel access token taken from environment");
            self.line.channel_access_token = Secret::new(token);
        }
        if let Some(port) = first_set(&lookup, &["PORT"]) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(mode) = first_set(&lookup, &["RUNMODE"]) {
            self.server.mode = mode.parse::<RunMode>().map_err(|_| ConfigError::InvalidEnv {
                name: "RUNMODE",
                value: mode.clone(),
            })?;
        }
        if let Some(cert) = first_set(&lookup, &["SSL_CERT_PATH"]) {
            self.server.tls_cert_path = PathBuf::from(cert);
        }
        if let Some(key) = first_set(&lookup, &["SSL_KEY_PATH"]) {
            self.server.tls_key_path = PathBuf::from(key);
        }
        if let Some(url) = first_set(&lookup, &["DATABASE_URL"]) {
            self.store.database_url = url;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.line.channel_secret.expose_secret().is_empty() {
            return Err(ConfigError::Invalid("line.channel_secret is empty".into()));
        }
        if self.line.channel_access_token.expose_secret().is_empty() {
            return Err(ConfigError::Invalid(
                "line.channel_access_token is empty".into(),
            ));
        }
        if self.server.mode == RunMode::Https
            && (self.server.tls_cert_path.as_os_str().is_empty()
                || self.server.tls_key_path.as_os_str().is_empty())
        {
            return Err(ConfigError::Invalid(
                "https mode needs tls_cert_path and tls_key_path".into(),
            ));
        }
        if let MonthlyHotMode::Sample { pool: 0 } = self.reply.monthly_hot {
            return Err(ConfigError::Invalid("reply.monthly_hot.pool must be > 0".into()));
        }
        Ok(())
    }
}
