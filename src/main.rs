use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use kubewatch_discord::cli::{Cli, Commands, ConfigCommands};
use kubewatch_discord::config::{apply_flags_to_file, default_config_path, ConfigManager, FileConfigManager};
use kubewatch_discord::{DiscordWebhook, Event, Handler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config_manager = FileConfigManager::new(cli.config.clone().unwrap_or_else(default_config_path));

    match cli.command {
        Commands::Config { command: ConfigCommands::Discord(args) } => {
            let mut config = config_manager.load_config().await?;
            config.handler.discord = apply_flags_to_file(config.handler.discord, &args.into());
            config_manager.save_config(&config).await?;
        }
        Commands::Config { command: ConfigCommands::View } => {
            let config = config_manager.load_config().await?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        Commands::Send { file } => {
            let config = config_manager.load_config().await?;

            // a half-configured notifier must never run
            let webhook = match DiscordWebhook::init(&config) {
                Ok(webhook) => webhook,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            };

            let event = read_event(file).await?;
            tracing::debug!("Handling {} event for {}/{}", event.kind, event.namespace, event.name);
            webhook.handle(&event).await;
        }
    }

    Ok(())
}

/// `LOG_LEVEL` picks the level; unknown or unset values fall back to info.
fn init_logging() {
    let level = std::env::var("LOG_LEVEL").unwrap_or_default().to_lowercase();
    let level = match level.as_str() {
        "debug" | "info" | "warn" | "error" => level.as_str(),
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .init();
}

async fn read_event(file: Option<PathBuf>) -> anyhow::Result<Event> {
    let raw = match file {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read event file {:?}", path))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read event from stdin")?;
            buf
        }
    };

    serde_json::from_str(&raw).context("Failed to parse event JSON")
}
