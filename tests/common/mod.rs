#![allow(dead_code)]

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;

use kubewatch_discord::config::DiscordSettings;
use kubewatch_discord::{DiscordWebhook, Event};

#[derive(Clone)]
pub struct Endpoint {
    status: StatusCode,
    body: &'static str,
    pub received: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn record(State(endpoint): State<Endpoint>, headers: HeaderMap, Json(payload): Json<Value>) -> (StatusCode, &'static str) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    endpoint.received.lock().unwrap().push((content_type, payload));
    (endpoint.status, endpoint.body)
}

/// Starts a local webhook endpoint answering every POST with `status`.
pub async fn spawn_endpoint(status: StatusCode, body: &'static str) -> (String, Endpoint) {
    let endpoint = Endpoint {
        status,
        body,
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/webhook", post(record))
        .with_state(endpoint.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/webhook", addr), endpoint)
}

pub fn webhook_for(url: &str) -> DiscordWebhook {
    DiscordWebhook::from_settings(DiscordSettings {
        url: url.to_string(),
        username: "kubewatch".to_string(),
        avatar_url: String::new(),
        insecure_skip_verify: true,
    })
    .expect("valid settings")
}

pub fn oom_event() -> Event {
    Event {
        kind: "Pod".to_string(),
        name: "web-1".to_string(),
        namespace: "default".to_string(),
        reason: "Killing".to_string(),
        status: "Warning".to_string(),
        info_message: "OOMKilled".to_string(),
        ..Default::default()
    }
}

/// Log output of the current thread, captured through a scoped subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Lines at `level` that contain `needle`.
    pub fn lines_with(&self, level: &str, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(level) && line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Installs a debug-level subscriber for the current thread until the guard drops.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    (logs, tracing::subscriber::set_default(subscriber))
}
