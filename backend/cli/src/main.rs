mod check_cmd;
mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use eteon_agent::Relay;
use eteon_channels::{ChannelAdapter, TelegramAdapter};
use eteon_core::{ChatTransport, CompletionClient};
use eteon_logging::init_logger;
use eteon_providers::GeminiProvider;

use config::Config;

#[derive(Parser)]
#[command(name = "eteon")]
#[command(about = "Eteon - Telegram relay for Gemini")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot (default)
    Run,
    /// Validate configuration and print it with secrets redacted
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            init_logger(&config.logger());
            config.validate().context("Invalid configuration")?;
            run_bot(config).await?;
        }
        Commands::Check => check_cmd::run(&config)?,
    }

    Ok(())
}

async fn run_bot(config: Config) -> Result<()> {
    info!(
        model = %config.model,
        timeout_secs = config.request_timeout.as_secs(),
        "Starting Eteon relay"
    );

    let provider: Arc<dyn CompletionClient> = Arc::new(
        GeminiProvider::new(config.gemini_api_key.clone())
            .with_base_url(config.gemini_base_url.clone()),
    );
    let adapter = Arc::new(TelegramAdapter::new(config.telegram_token.clone()));
    let transport: Arc<dyn ChatTransport> = adapter.clone();

    let relay = Arc::new(Relay::new(transport, provider, config.relay_settings()));

    adapter
        .run(relay)
        .await
        .context("Telegram adapter failed")?;

    info!("Eteon relay shut down");
    Ok(())
}
