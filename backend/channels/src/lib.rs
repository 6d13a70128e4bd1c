use std::sync::Arc;

use async_trait::async_trait;
use eteon_agent::Relay;

pub mod telegram;
pub mod telegram_commands;
pub mod telegram_inline;
pub mod telegram_media;

pub use telegram::TelegramAdapter;

/// All channel adapters implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Receive updates and hand them to `relay` until shut down.
    async fn run(&self, relay: Arc<Relay>) -> anyhow::Result<()>;
}
