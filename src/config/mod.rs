use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{NotifierError, Result};

pub const ENV_CONFIG_PATH: &str = "KW_CONFIG";
pub const ENV_WEBHOOK_URL: &str = "KW_DISCORD_WEBHOOK_URL";
pub const ENV_USERNAME: &str = "KW_DISCORD_USERNAME";
pub const ENV_AVATAR_URL: &str = "KW_DISCORD_AVATAR_URL";

const CONFIG_FILE_NAME: &str = ".kubewatch.toml";

/// Persisted configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub handler: HandlerConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HandlerConfig {
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscordConfig {
    pub url: String,
    pub username: String,
    pub avatar_url: String,
    /// Accept self-signed certificates on the webhook client.
    pub insecure_skip_verify: bool,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            avatar_url: String::new(),
            insecure_skip_verify: true,
        }
    }
}

/// Values supplied on the command line for `config discord`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscordFlags {
    pub url: Option<String>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

/// Delivery settings after the file has been merged with the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordSettings {
    pub url: String,
    pub username: String,
    pub avatar_url: String,
    pub insecure_skip_verify: bool,
}

/// Merges command line flags into the persisted settings.
///
/// Non-empty flags overwrite the stored value; absent or empty flags keep it.
/// The environment is never consulted here.
pub fn apply_flags_to_file(mut file: DiscordConfig, flags: &DiscordFlags) -> DiscordConfig {
    fn overwrite(field: &mut String, flag: &Option<String>) {
        if let Some(value) = flag.as_deref().filter(|v| !v.is_empty()) {
            *field = value.to_string();
        }
    }

    overwrite(&mut file.url, &flags.url);
    overwrite(&mut file.username, &flags.username);
    overwrite(&mut file.avatar_url, &flags.avatar_url);
    file
}

/// Builds runtime settings from the file, falling back to `KW_DISCORD_*`
/// variables for every field the file left empty.
pub fn resolve_runtime_settings(file: &DiscordConfig) -> DiscordSettings {
    resolve_runtime_settings_with(file, |key| env::var(key).ok())
}

pub fn resolve_runtime_settings_with<F>(file: &DiscordConfig, lookup: F) -> DiscordSettings
where
    F: Fn(&str) -> Option<String>,
{
    let pick = |stored: &str, key: &str| {
        if stored.is_empty() {
            lookup(key).unwrap_or_default()
        } else {
            stored.to_string()
        }
    };

    DiscordSettings {
        url: pick(&file.url, ENV_WEBHOOK_URL),
        username: pick(&file.username, ENV_USERNAME),
        avatar_url: pick(&file.avatar_url, ENV_AVATAR_URL),
        insecure_skip_verify: file.insecure_skip_verify,
    }
}

/// Location of the config file: `KW_CONFIG`, then `$HOME/.kubewatch.toml`,
/// then the working directory.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = env::var_os(ENV_CONFIG_PATH).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    match dirs::home_dir() {
        Some(home) => home.join(CONFIG_FILE_NAME),
        None => PathBuf::from(CONFIG_FILE_NAME),
    }
}

#[async_trait::async_trait]
pub trait ConfigManager {
    async fn load_config(&self) -> Result<Config>;
    async fn save_config(&self, config: &Config) -> Result<()>;
}

pub struct FileConfigManager {
    config_path: PathBuf,
}

impl FileConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }
}

#[async_trait::async_trait]
impl ConfigManager for FileConfigManager {
    async fn load_config(&self) -> Result<Config> {
        info!("Loading configuration from {:?}", self.config_path);

        // a missing file is an empty config, the env fallback may still fill it
        if !self.config_path.exists() {
            warn!("Configuration file not found at {:?}, using defaults", self.config_path);
            return Ok(Config::default());
        }

        let config_content = fs::read_to_string(&self.config_path)
            .map_err(|e| NotifierError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&config_content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    async fn save_config(&self, config: &Config) -> Result<()> {
        info!("Saving configuration to {:?}", self.config_path);

        let toml_content = toml::to_string_pretty(config)?;

        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| NotifierError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        fs::write(&self.config_path, toml_content)
            .map_err(|e| NotifierError::Config(format!("Failed to write config file: {}", e)))?;

        info!("Configuration saved successfully");
        Ok(())
    }
}
