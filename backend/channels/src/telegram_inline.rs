//! Telegram Inline Keyboards and Error Mapping
//!
//! Converts relay keyboards into Bot API markup and classifies Bot API failures into
//! delivery errors.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, LinkPreviewOptions};
use teloxide::{ApiError, RequestError};

use eteon_core::{DeliveryError, InlineKeyboard};
use eteon_logging::redact_sensitive_data;

/// One callback button per relay button, rows preserved.
pub fn to_markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.action.encode()))
            .collect::<Vec<_>>()
    }))
}

pub fn link_preview(enabled: bool) -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: !enabled,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

/// Entity parse failures become [`DeliveryError::MarkupRejected`]; everything else is
/// a transport failure with secrets scrubbed from the message.
pub fn classify_send_error(err: RequestError) -> DeliveryError {
    match &err {
        RequestError::Api(ApiError::CantParseEntities(message)) => {
            DeliveryError::MarkupRejected(message.clone())
        }
        RequestError::Api(ApiError::Unknown(message))
            if message.to_lowercase().contains("can't parse") =>
        {
            DeliveryError::MarkupRejected(message.clone())
        }
        _ => DeliveryError::Transport(redact_sensitive_data(&err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eteon_core::{CallbackAction, InlineButton, ThinkingLevel};
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn markup_keeps_rows_and_payloads() {
        let mut keyboard = InlineKeyboard::new();
        keyboard.push_row(InlineButton::new(
            "Show thoughts",
            CallbackAction::ShowThoughts("7".into()),
        ));
        keyboard.push_row(InlineButton::new(
            "High",
            CallbackAction::SetThinking(ThinkingLevel::High),
        ));

        let markup = to_markup(&keyboard);
        assert_eq!(markup.inline_keyboard.len(), 2);
        let button = &markup.inline_keyboard[0][0];
        assert_eq!(button.text, "Show thoughts");
        assert_eq!(
            button.kind,
            InlineKeyboardButtonKind::CallbackData("thoughts:7".into())
        );
        assert_eq!(
            markup.inline_keyboard[1][0].kind,
            InlineKeyboardButtonKind::CallbackData("think:high".into())
        );
    }

    #[test]
    fn link_preview_toggle() {
        assert!(link_preview(false).is_disabled);
        assert!(!link_preview(true).is_disabled);
    }

    #[test]
    fn classifies_markup_rejections() {
        let typed = RequestError::Api(ApiError::CantParseEntities(
            "Bad Request: can't parse entities: character '.' is reserved".into(),
        ));
        assert!(classify_send_error(typed).is_markup_rejection());

        let untyped = RequestError::Api(ApiError::Unknown(
            "Bad Request: can't parse entities in message text".into(),
        ));
        assert!(classify_send_error(untyped).is_markup_rejection());

        let blocked = RequestError::Api(ApiError::BotBlocked);
        assert!(matches!(
            classify_send_error(blocked),
            DeliveryError::Transport(_)
        ));
    }
}
