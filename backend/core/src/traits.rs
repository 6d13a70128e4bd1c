use anyhow::Result;
use async_trait::async_trait;

use crate::channel::{ChatId, RemoteFile, SendOptions, SentMessage};
use crate::error::DeliveryError;
use crate::generation::{GenerateRequest, GenerateResponse};

/// Trait for generative completion services used by the relay.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Provider name (e.g., "gemini", "mock").
    fn name(&self) -> &str;

    /// Run one generate-content call.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse>;
}

/// Outbound side of a chat channel.
///
/// All text is sent in the channel's rich-markup dialect. Implementations must report
/// markup parse failures as [`DeliveryError::MarkupRejected`] so callers can retry
/// with escaped text.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Human-readable transport name for logging.
    fn name(&self) -> &str;

    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        options: &SendOptions,
    ) -> Result<SentMessage, DeliveryError>;

    async fn edit(
        &self,
        message: &SentMessage,
        text: &str,
        options: &SendOptions,
    ) -> Result<SentMessage, DeliveryError>;

    /// Acknowledge a pressed inline button.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), DeliveryError>;

    /// Resolve file metadata and download the contents.
    async fn download(&self, file_id: &str) -> Result<RemoteFile, DeliveryError>;
}
