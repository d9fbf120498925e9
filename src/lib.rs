pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod handlers;

pub use config::{Config, DiscordSettings};
pub use error::{NotifierError, Result};
pub use event::{Event, Severity};
pub use handlers::{DiscordWebhook, Handler};
