use crate::config::{resolve_runtime_settings, Config, DiscordSettings, ENV_AVATAR_URL, ENV_USERNAME, ENV_WEBHOOK_URL};
use crate::error::{NotifierError, Result};
use crate::event::{Event, Severity};
use crate::handlers::Handler;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};

pub const DEFAULT_AVATAR_URL: &str = "https://i.imgur.com/oBPXx0D.png";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// Green, Yellow, Red
const COLOR_INFO: u32 = 5763719;
const COLOR_WARNING: u32 = 16776960;
const COLOR_CRITICAL: u32 = 15548997;

pub const MISSING_URL: &str = "Missing Discord webhook url";
pub const MISSING_USERNAME: &str = "Missing Discord bot username";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscordEmbed {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscordMessage {
    pub username: String,
    pub content: String,
    pub avatar_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<DiscordEmbed>>,
}

/// Relays events to a Discord webhook.
///
/// A value of this type only exists once configuration has been validated;
/// settings are read-only afterwards so `handle` may run concurrently.
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    client: Client,
    settings: DiscordSettings,
}

impl DiscordWebhook {
    /// Resolves settings from the persisted config plus environment and
    /// validates them.
    pub fn init(config: &Config) -> Result<Self> {
        Self::from_settings(resolve_runtime_settings(&config.handler.discord))
    }

    pub fn from_settings(mut settings: DiscordSettings) -> Result<Self> {
        check_missing_discord_vars(&mut settings)?;

        // relaxed verification stays on this client, other HTTP in the process is untouched
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(settings.insecure_skip_verify)
            .build()
            .map_err(|e| NotifierError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &DiscordSettings {
        &self.settings
    }

    pub fn prepare_message(&self, event: &Event, now: DateTime<Utc>) -> DiscordMessage {
        let content = format!("```md\n{}\n```", format_event_content(event, now));

        DiscordMessage {
            username: self.settings.username.clone(),
            content,
            avatar_url: self.settings.avatar_url.clone(),
            embeds: Some(vec![prepare_embed(event)]),
        }
    }

    /// Sends one event. Exactly one request is made; nothing is retried.
    pub async fn deliver(&self, event: &Event) -> Result<()> {
        let message = self.prepare_message(event, Utc::now());
        self.post_message(&message).await
    }

    async fn post_message(&self, message: &DiscordMessage) -> Result<()> {
        let body = serde_json::to_vec(message)?;
        debug!("Marshaled JSON message: {}", String::from_utf8_lossy(&body));

        let response = self
            .client
            .post(&self.settings.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| NotifierError::Network(format!("Error sending HTTP request: {}", e)))?;

        let status = response.status();
        // some API versions answer 200, others 204
        if status == StatusCode::OK || status == StatusCode::NO_CONTENT {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        debug!("Response body: {}", body);
        Err(NotifierError::UnexpectedStatus { status: status.as_u16(), body })
    }
}

#[async_trait::async_trait]
impl Handler for DiscordWebhook {
    async fn handle(&self, event: &Event) {
        match self.deliver(event).await {
            Ok(()) => info!("Message successfully sent to {} at {}", self.settings.url, Utc::now()),
            Err(e) => error!("Failed to deliver {} event for {}: {}", event.kind, event.name, e),
        }
    }
}

fn remediation(reason: &str) -> String {
    format!(
        r#"
{reason}

You need to set Discord parameters in k8s configmap or using "--url/-u, --username/-n, --avatar_url/-a" or using environment variables:

export {ENV_WEBHOOK_URL}=discord_webhook_url
export {ENV_USERNAME}=discord_username
export {ENV_AVATAR_URL}=avatar_url

Command line flags will override environment variables

"#
    )
}

fn check_missing_discord_vars(settings: &mut DiscordSettings) -> Result<()> {
    if settings.url.is_empty() {
        return Err(NotifierError::Config(remediation(MISSING_URL)));
    }
    if settings.username.is_empty() {
        return Err(NotifierError::Config(remediation(MISSING_USERNAME)));
    }
    if settings.avatar_url.is_empty() {
        debug!("Missing Discord bot avatar url, using default {}", DEFAULT_AVATAR_URL);
        settings.avatar_url = DEFAULT_AVATAR_URL.to_string();
    }
    Ok(())
}

/// Display color for a status; unknown statuses get none.
pub fn severity_color(status: &str) -> Option<u32> {
    Severity::parse(status).map(|severity| match severity {
        Severity::Info => COLOR_INFO,
        Severity::Warning => COLOR_WARNING,
        Severity::Critical => COLOR_CRITICAL,
    })
}

pub fn format_event_content(event: &Event, now: DateTime<Utc>) -> String {
    format!(
        "Kind: {}\nName: {}\nNamespace: {}\nReason: {}\nText: {}\nUTC Time: {}\n",
        event.kind,
        event.name,
        event.namespace,
        event.reason,
        event.message(),
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

fn prepare_embed(event: &Event) -> DiscordEmbed {
    DiscordEmbed {
        title: event.status.clone(),
        description: event.info_message.clone(),
        color: severity_color(&event.status),
    }
}
