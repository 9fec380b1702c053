#![forbid(unsafe_code)]

//! `inbox-valet` — single-user Telegram inbox bot binary.
//!
//! Bootstraps configuration, the `SQLite`-backed queue store, the
//! transcription client, and the Telegram long-polling dispatcher.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use inbox_valet::config::GlobalConfig;
use inbox_valet::driver::ControlMessageDriver;
use inbox_valet::models::ids::ChatId;
use inbox_valet::persistence::db;
use inbox_valet::persistence::inbox_repo::InboxRepo;
use inbox_valet::telegram::{client, dispatch};
use inbox_valet::transcribe::whisper::WhisperClient;
use inbox_valet::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "inbox-valet", about = "Single-user Telegram inbox bot", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the configured state directory.
    #[arg(long)]
    state_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("inbox-valet bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = GlobalConfig::load_from_path(&args.config)?;

    // Override the state dir from the CLI if provided.
    if let Some(dir) = args.state_dir {
        std::fs::create_dir_all(&dir)
            .map_err(|err| AppError::Config(format!("invalid state_dir override: {err}")))?;
        config.state_dir = dir
            .canonicalize()
            .map_err(|err| AppError::Config(format!("invalid state_dir override: {err}")))?;
    }

    // Load credentials from keyring / env vars.
    config.load_credentials().await?;

    let config = Arc::new(config);
    info!("configuration loaded");

    // ── Initialize database ─────────────────────────────
    let db = Arc::new(db::connect(&config.db_path()).await?);
    info!("database connected");

    // ── Build collaborators ─────────────────────────────
    let bot = Bot::new(config.telegram.bot_token.clone());
    let transport = Arc::new(client::TelegramTransport::new(bot.clone()));
    let transcriber = Arc::new(WhisperClient::new(&config.transcription, &config.timeouts)?);
    let driver = Arc::new(ControlMessageDriver::new(
        InboxRepo::new(Arc::clone(&db)),
        transport,
        transcriber,
    ));

    // ── Register the command menu and post the control message ──
    client::register_commands(&bot).await?;
    let chat = ChatId(operator_chat_id(&config)?);
    driver.open_control(chat).await?;
    info!(%chat, "inbox-valet ready");

    // ── Run the dispatcher until shutdown ───────────────
    dispatch::run(bot, Arc::clone(&config), driver).await;
    info!("inbox-valet shut down");

    Ok(())
}

/// Private chats share the user's numeric id, so the operator's chat id
/// is the authorized user id.
fn operator_chat_id(config: &GlobalConfig) -> Result<i64> {
    i64::try_from(config.telegram.authorized_user_id)
        .map_err(|err| AppError::Config(format!("authorized_user_id out of range: {err}")))
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
