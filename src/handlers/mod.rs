pub mod discord;

use crate::event::Event;

pub use discord::DiscordWebhook;

/// An outbound integration that relays events to one provider.
///
/// `handle` never reports failure to the caller: delivery problems are
/// logged and the event is dropped for this handler only.
#[async_trait::async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, event: &Event);
}
