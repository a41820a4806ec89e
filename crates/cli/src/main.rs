use std::{
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    pttbot_articles::{ArticleStore, SqliteArticleStore, schema::run_migrations},
    pttbot_auto_reply::AutoReplier,
    pttbot_common::ArticleRecord,
    pttbot_config::{BotConfig, StoreConfig, load_config, load_config_unchecked},
    pttbot_gateway::{AppState, build_router, serve},
    pttbot_line::LineClient,
    sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt},
};

#[derive(Parser)]
#[command(name = "pttbot", version, about = "LINE bot for PTT Beauty board articles")]
struct Cli {
    /// Config file (default: ./pttbot.toml, then the user config dir).
    #[arg(long, global = true, env = "PTTBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `pttbot_gateway=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server (default).
    Serve,
    /// Upsert articles from a JSON array file.
    Import { file: PathBuf },
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let builder = fmt().with_env_filter(filter).with_target(true);
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

async fn open_store(config: &StoreConfig) -> anyhow::Result<SqliteArticleStore> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .with_context(|| format!("invalid database url '{}'", config.database_url))?
        .create_if_missing(true);
    let pool: SqlitePool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("failed to open article database")?;
    run_migrations(&pool).await?;
    Ok(SqliteArticleStore::new(pool))
}

async fn import_articles(store: &dyn ArticleStore, file: &Path) -> anyhow::Result<usize> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let records: Vec<ArticleRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of articles", file.display()))?;
    for record in &records {
        store
            .upsert(record)
            .await
            .with_context(|| format!("failed to store {}", record.article_id))?;
    }
    Ok(records.len())
}

async fn run_server(config: BotConfig) -> anyhow::Result<()> {
    let BotConfig {
        line,
        server,
        store,
        reply,
    } = config;
    let store = open_store(&store).await?;
    let messenger = Arc::new(LineClient::new(line.channel_access_token, &line.api_base_url));
    let replier = AutoReplier::new(Arc::new(store), reply);
    let state = Arc::new(AppState::new(messenger, replier, line.channel_secret));
    serve(&server, build_router(state)).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // before parsing, so `.env` can supply clap `env` defaults
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(&cli)?;
    info!(version = env!("CARGO_PKG_VERSION"), "pttbot starting");
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded .env");
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(load_config(cli.config.as_deref())?).await,
        Commands::Import { file } => {
            let config = load_config_unchecked(cli.config.as_deref())?;
            let store = open_store(&config.store).await?;
            let count = import_articles(&store, &file).await?;
            info!(count, file = %file.display(), "import finished");
            Ok(())
        },
    }
}
