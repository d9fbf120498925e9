use serde::{Deserialize, Serialize};

/// A single observed change to a watched cluster resource.
///
/// Events are produced by the watcher and handed to every handler by
/// reference; handlers never mutate them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub namespace: String,
    pub kind: String,
    pub api_version: String,
    pub component: String,
    pub host: String,
    pub reason: String,
    pub status: String,
    pub info_message: String,
    pub name: String,
    /// Resource after the change. Only producers look at it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obj: Option<serde_json::Value>,
    /// Resource before the change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_obj: Option<serde_json::Value>,
}

impl Event {
    /// Standard one-line rendering shared by every handler.
    pub fn message(&self) -> String {
        format!(
            "`{}` status for `{}` `{}` in namespace `{}`. Reason: `{}` Details: `{}`",
            self.status, self.kind, self.name, self.namespace, self.reason, self.info_message,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Exact, case-sensitive match on the status string.
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "Info" => Some(Severity::Info),
            "Warning" => Some(Severity::Warning),
            "Critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}
