//! Log Redaction Layer
//!
//! Scrubs bot tokens, API keys and bearer tokens from strings prior to logging.
//! Transport errors often echo the request URL, which embeds the bot token.

use regex::Regex;
use std::sync::LazyLock;

static BOT_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{5,}:[A-Za-z0-9_-]{30,}").unwrap());
static GOOGLE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AIza[0-9A-Za-z_-]{30,}").unwrap());
static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = BOT_TOKEN_RE.replace_all(input, "[REDACTED_BOT_TOKEN]");
    let redacted = GOOGLE_KEY_RE.replace_all(&redacted, "[REDACTED_API_KEY]");
    BEARER_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}
