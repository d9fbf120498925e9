//! Command-line argument parsing with clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DiscordFlags, ENV_CONFIG_PATH};

/// Relay cluster resource events to a Discord webhook.
#[derive(Parser, Debug, Clone)]
#[command(name = "kubewatch-discord")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path of the persisted configuration file.
    #[arg(long, global = true, env = ENV_CONFIG_PATH)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Modify or inspect the persisted configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Send one event, read as JSON, through the Discord handler.
    Send {
        /// File holding the event; stdin when omitted.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Specific discord configuration.
    Discord(DiscordArgs),

    /// Print the persisted configuration.
    View,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DiscordArgs {
    /// Specify Discord webhook url
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Specify Discord bot username
    #[arg(short = 'n', long)]
    pub username: Option<String>,

    /// Specify Discord bot avatar url
    #[arg(short = 'a', long = "avatar_url")]
    pub avatar_url: Option<String>,
}

impl From<DiscordArgs> for DiscordFlags {
    fn from(args: DiscordArgs) -> Self {
        DiscordFlags {
            url: args.url,
            username: args.username,
            avatar_url: args.avatar_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_discord_flags() {
        let cli = Cli::try_parse_from([
            "kubewatch-discord",
            "config",
            "discord",
            "-u",
            "https://hooks.example/x",
            "--username",
            "kubewatch",
            "--avatar_url",
            "https://cdn/a.png",
        ])
        .unwrap();

        match cli.command {
            Commands::Config { command: ConfigCommands::Discord(args) } => {
                let flags = DiscordFlags::from(args);
                assert_eq!(flags.url.as_deref(), Some("https://hooks.example/x"));
                assert_eq!(flags.username.as_deref(), Some("kubewatch"));
                assert_eq!(flags.avatar_url.as_deref(), Some("https://cdn/a.png"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_short_flags_and_absent_values() {
        let cli = Cli::try_parse_from(["kubewatch-discord", "config", "discord", "-n", "bot", "-a", "x"]).unwrap();

        let Commands::Config { command: ConfigCommands::Discord(args) } = cli.command else {
            panic!("expected config discord");
        };
        assert!(args.url.is_none());
        assert_eq!(args.username.as_deref(), Some("bot"));
        assert_eq!(args.avatar_url.as_deref(), Some("x"));
    }

    #[test]
    fn test_global_config_path() {
        let cli = Cli::try_parse_from(["kubewatch-discord", "send", "--config", "/tmp/kw.toml", "-f", "event.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/kw.toml")));
        assert!(matches!(cli.command, Commands::Send { file: Some(_) }));
    }
}
