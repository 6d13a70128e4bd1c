//! Telegram Media Handler
//!
//! Maps an incoming Bot API message onto the relay's inbound message: text, caption,
//! and one attachment per supported media kind, in a fixed order.

use teloxide::types::Message;

use eteon_core::{ChatId, InboundMessage, MediaAttachment, MediaKind};

pub fn inbound_message(msg: &Message) -> InboundMessage {
    InboundMessage {
        chat: ChatId(msg.chat.id.0),
        text: msg.text().map(str::to_string),
        caption: msg.caption().map(str::to_string),
        attachments: attachments(msg),
    }
}

/// Photo, document, video, audio, voice, video note. Photos use the largest size.
fn attachments(msg: &Message) -> Vec<MediaAttachment> {
    let mut found = Vec::new();

    if let Some(photo) = msg
        .photo()
        .and_then(|sizes| sizes.iter().max_by_key(|s| u64::from(s.width) * u64::from(s.height)))
    {
        found.push(attachment(MediaKind::Photo, &photo.file.id, None));
    }
    if let Some(document) = msg.document() {
        let mime = document.mime_type.as_ref().map(ToString::to_string);
        found.push(attachment(MediaKind::Document, &document.file.id, mime));
    }
    if let Some(video) = msg.video() {
        let mime = video.mime_type.as_ref().map(ToString::to_string);
        found.push(attachment(MediaKind::Video, &video.file.id, mime));
    }
    if let Some(audio) = msg.audio() {
        let mime = audio.mime_type.as_ref().map(ToString::to_string);
        found.push(attachment(MediaKind::Audio, &audio.file.id, mime));
    }
    if let Some(voice) = msg.voice() {
        let mime = voice.mime_type.as_ref().map(ToString::to_string);
        found.push(attachment(MediaKind::Voice, &voice.file.id, mime));
    }
    if let Some(note) = msg.video_note() {
        found.push(attachment(MediaKind::VideoNote, &note.file.id, None));
    }

    found
}

fn attachment(kind: MediaKind, file_id: &str, mime_hint: Option<String>) -> MediaAttachment {
    MediaAttachment {
        kind,
        file_id: file_id.to_string(),
        mime_hint,
    }
}
