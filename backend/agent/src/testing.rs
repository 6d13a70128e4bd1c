//! In-memory transport used by the relay tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use eteon_core::{
    ChatId, ChatTransport, DeliveryError, RemoteFile, SendOptions, SentMessage,
};
use eteon_markdown::RESERVED_CHARS;

/// One accepted send or edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub chat: ChatId,
    pub message_id: i32,
    pub text: String,
    pub options: SendOptions,
}

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Outbound>>,
    edited: Mutex<Vec<Outbound>>,
    answered: Mutex<Vec<String>>,
    files: HashMap<String, RemoteFile>,
    rejections: Mutex<usize>,
    next_id: AtomicI32,
    reject_markup: bool,
    fail_sends: bool,
    fail_answers: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any text with an unescaped reserved character, like a strict parser.
    pub fn rejecting_markup(mut self) -> Self {
        self.reject_markup = true;
        self
    }

    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn failing_answers(mut self) -> Self {
        self.fail_answers = true;
        self
    }

    /// Make `file_id` downloadable. Unknown ids fail with `FileUnavailable`.
    pub fn with_file(mut self, file_id: &str, path: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(
            file_id.to_string(),
            RemoteFile {
                path: path.to_string(),
                bytes,
            },
        );
        self
    }

    pub async fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|o| o.text.clone()).collect()
    }

    pub async fn edited_texts(&self) -> Vec<String> {
        self.edited.lock().await.iter().map(|o| o.text.clone()).collect()
    }

    pub async fn answered(&self) -> Vec<String> {
        self.answered.lock().await.clone()
    }

    pub async fn rejections(&self) -> usize {
        *self.rejections.lock().await
    }

    async fn check(&self, text: &str) -> Result<(), DeliveryError> {
        if self.fail_sends {
            return Err(DeliveryError::Transport("connection reset".into()));
        }
        if self.reject_markup && has_unescaped_reserved(text) {
            *self.rejections.lock().await += 1;
            return Err(DeliveryError::MarkupRejected(
                "can't parse entities".into(),
            ));
        }
        Ok(())
    }
}

fn has_unescaped_reserved(text: &str) -> bool {
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if RESERVED_CHARS.contains(&c) {
            return true;
        }
    }
    false
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        options: &SendOptions,
    ) -> Result<SentMessage, DeliveryError> {
        self.check(text).await?;
        let message_id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.sent.lock().await.push(Outbound {
            chat,
            message_id,
            text: text.to_string(),
            options: options.clone(),
        });
        Ok(SentMessage { chat, message_id })
    }

    async fn edit(
        &self,
        message: &SentMessage,
        text: &str,
        options: &SendOptions,
    ) -> Result<SentMessage, DeliveryError> {
        self.check(text).await?;
        self.edited.lock().await.push(Outbound {
            chat: message.chat,
            message_id: message.message_id,
            text: text.to_string(),
            options: options.clone(),
        });
        Ok(*message)
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), DeliveryError> {
        if self.fail_answers {
            return Err(DeliveryError::Transport("query is too old".into()));
        }
        self.answered.lock().await.push(callback_id.to_string());
        Ok(())
    }

    async fn download(&self, file_id: &str) -> Result<RemoteFile, DeliveryError> {
        self.files
            .get(file_id)
            .cloned()
            .ok_or_else(|| DeliveryError::FileUnavailable(format!("no file {file_id}")))
    }
}
