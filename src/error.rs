use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotifierError>;

#[derive(Error, Debug)]
pub enum NotifierError {
    /// Fatal at startup; carries the full remediation text.
    #[error("{0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response status: {status}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// Conversion implementations for common error types
impl From<serde_json::Error> for NotifierError {
    fn from(err: serde_json::Error) -> Self {
        NotifierError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for NotifierError {
    fn from(err: toml::de::Error) -> Self {
        NotifierError::Config(format!("Failed to parse TOML config: {}", err))
    }
}

impl From<toml::ser::Error> for NotifierError {
    fn from(err: toml::ser::Error) -> Self {
        NotifierError::Serialization(err.to_string())
    }
}
