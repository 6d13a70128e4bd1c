//! Outbound delivery with a plain-text fallback for rejected markup.

use tracing::warn;

use eteon_core::{ChatId, ChatTransport, DeliveryError, SendOptions, SentMessage};
use eteon_markdown::escape_markdown_v2;

/// Send `text` as rich markup; if the channel rejects the markup, resend once with
/// every reserved character escaped.
pub async fn send_with_fallback(
    transport: &dyn ChatTransport,
    chat: ChatId,
    text: &str,
    options: &SendOptions,
) -> Result<SentMessage, DeliveryError> {
    match transport.send(chat, text, options).await {
        Err(DeliveryError::MarkupRejected(reason)) => {
            warn!(chat_id = %chat, reason = %reason, "Markup rejected, resending escaped");
            transport
                .send(chat, &escape_markdown_v2(text), options)
                .await
        }
        other => other,
    }
}

/// Edit counterpart of [`send_with_fallback`].
pub async fn edit_with_fallback(
    transport: &dyn ChatTransport,
    message: &SentMessage,
    text: &str,
    options: &SendOptions,
) -> Result<SentMessage, DeliveryError> {
    match transport.edit(message, text, options).await {
        Err(DeliveryError::MarkupRejected(reason)) => {
            warn!(
                chat_id = %message.chat,
                message_id = message.message_id,
                reason = %reason,
                "Markup rejected on edit, retrying escaped"
            );
            transport
                .edit(message, &escape_markdown_v2(text), options)
                .await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;

    #[tokio::test]
    async fn test_accepted_markup_is_sent_once() {
        let transport = RecordingTransport::new();
        send_with_fallback(&transport, ChatId(1), "*bold*", &SendOptions::plain())
            .await
            .unwrap();
        assert_eq!(transport.sent_texts().await, vec!["*bold*"]);
    }

    #[tokio::test]
    async fn test_rejected_markup_is_resent_escaped() {
        let transport = RecordingTransport::new().rejecting_markup();
        let sent = send_with_fallback(&transport, ChatId(1), "a*b_c", &SendOptions::plain())
            .await
            .unwrap();
        assert_eq!(sent.chat, ChatId(1));
        assert_eq!(transport.sent_texts().await, vec!["a\\*b\\_c"]);
        assert_eq!(transport.rejections().await, 1);
    }

    #[tokio::test]
    async fn test_edit_falls_back_too() {
        let transport = RecordingTransport::new().rejecting_markup();
        let message = send_with_fallback(&transport, ChatId(2), "x", &SendOptions::plain())
            .await
            .unwrap();
        edit_with_fallback(&transport, &message, "1.5!", &SendOptions::plain())
            .await
            .unwrap();
        assert_eq!(transport.edited_texts().await, vec!["1\\.5\\!"]);
    }

    #[tokio::test]
    async fn test_other_failures_propagate() {
        let transport = RecordingTransport::new().failing_sends();
        let err = send_with_fallback(&transport, ChatId(1), "hi", &SendOptions::plain())
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
    }
}
