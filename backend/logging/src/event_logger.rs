//! Relay Event Logger
//!
//! Structured lifecycle events for each relayed message, emitted on the
//! `relay_events` target so they can be filtered or shipped separately.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayEvent {
    MessageReceived {
        text_parts: usize,
        media_parts: usize,
    },
    CompletionFinished {
        latency_ms: u64,
        reply_chars: usize,
        thoughts: usize,
        sources: usize,
        code_snippets: usize,
    },
    CompletionFailed {
        error_msg: String,
    },
    RequestBlocked {
        reason: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub chat_id: i64,
    pub timestamp: DateTime<Utc>,
    pub event: RelayEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Logs a relay event, redacting free-text fields first.
    pub fn log_event(chat_id: i64, event: RelayEvent) {
        let entry = Self::entry(chat_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "relay_events", chat_id, event = %json, "Relay event");
    }

    fn entry(chat_id: i64, mut event: RelayEvent) -> EventLogEntry {
        if let RelayEvent::CompletionFailed { error_msg } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }
        EventLogEntry {
            chat_id,
            timestamp: Utc::now(),
            event,
        }
    }
}
