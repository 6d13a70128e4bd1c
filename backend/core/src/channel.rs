//! Channel-facing types exchanged between the relay and a chat transport.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::thinking::ThinkingLevel;

/// Stable identifier of one conversation on the chat channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of attachment a user can send. Declaration order is the order attachments
/// are forwarded upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Document,
    Video,
    Audio,
    Voice,
    VideoNote,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Document => "document",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Voice => "voice",
            MediaKind::VideoNote => "video_note",
        }
    }
}

/// A file attached to an inbound message, not yet downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttachment {
    pub kind: MediaKind,
    pub file_id: String,
    /// MIME type the channel declared for the file, when it did.
    pub mime_hint: Option<String>,
}

/// A user message as received from the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat: ChatId,
    pub text: Option<String>,
    pub caption: Option<String>,
    /// Attachments in the order the relay should submit them.
    pub attachments: Vec<MediaAttachment>,
}

impl InboundMessage {
    pub fn text(chat: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat,
            text: Some(text.into()),
            caption: None,
            attachments: Vec::new(),
        }
    }
}

/// A downloaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Server-side path, used for extension-based MIME lookup.
    pub path: String,
    pub bytes: Vec<u8>,
}

/// Handle to a message the transport delivered, for later edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub chat: ChatId,
    pub message_id: i32,
}

/// Options applied to an outbound send or edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub keyboard: Option<InlineKeyboard>,
    pub link_preview: bool,
}

impl SendOptions {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn with_keyboard(keyboard: Option<InlineKeyboard>) -> Self {
        Self {
            keyboard,
            link_preview: false,
        }
    }

    pub fn with_link_preview() -> Self {
        Self {
            keyboard: None,
            link_preview: true,
        }
    }
}

/// Inline keyboard attached under a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row holding a single button.
    pub fn push_row(&mut self, button: InlineButton) {
        self.rows.push(vec![button]);
    }

    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub action: CallbackAction,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, action: CallbackAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// What a pressed inline button asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    ShowThoughts(String),
    ShowSources(String),
    ShowCode(String),
    SetThinking(ThinkingLevel),
}

impl CallbackAction {
    /// Encode as callback payload, `<action>:<argument>`.
    pub fn encode(&self) -> String {
        match self {
            CallbackAction::ShowThoughts(key) => format!("thoughts:{key}"),
            CallbackAction::ShowSources(key) => format!("sources:{key}"),
            CallbackAction::ShowCode(key) => format!("code:{key}"),
            CallbackAction::SetThinking(level) => format!("think:{}", level.as_str()),
        }
    }

    /// Decode a callback payload. Unknown actions yield `None`; unknown levels parse
    /// to the default level.
    pub fn parse(data: &str) -> Option<Self> {
        let (action, argument) = data.split_once(':')?;
        let argument = argument.to_string();
        match action {
            "thoughts" => Some(CallbackAction::ShowThoughts(argument)),
            "sources" => Some(CallbackAction::ShowSources(argument)),
            "code" => Some(CallbackAction::ShowCode(argument)),
            "think" => Some(CallbackAction::SetThinking(ThinkingLevel::parse(&argument))),
            _ => None,
        }
    }
}

/// A pressed inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEvent {
    /// Identifier used to acknowledge the press.
    pub id: String,
    pub chat: ChatId,
    pub data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_encoding() {
        assert_eq!(CallbackAction::ShowThoughts("7".into()).encode(), "thoughts:7");
        assert_eq!(
            CallbackAction::SetThinking(ThinkingLevel::High).encode(),
            "think:high"
        );
    }

    #[test]
    fn test_callback_parse() {
        assert_eq!(
            CallbackAction::parse("code:12"),
            Some(CallbackAction::ShowCode("12".into()))
        );
        assert_eq!(
            CallbackAction::parse("think:bogus"),
            Some(CallbackAction::SetThinking(ThinkingLevel::Medium))
        );
        assert_eq!(CallbackAction::parse("unknown:1"), None);
        assert_eq!(CallbackAction::parse("no-separator"), None);
    }

    #[test]
    fn test_keyboard_rows() {
        let mut keyboard = InlineKeyboard::new();
        keyboard.push_row(InlineButton::new("a", CallbackAction::ShowCode("1".into())));
        keyboard.push_row(InlineButton::new("b", CallbackAction::ShowSources("1".into())));
        assert_eq!(keyboard.rows.len(), 2);
        assert_eq!(keyboard.buttons().count(), 2);
    }
}
