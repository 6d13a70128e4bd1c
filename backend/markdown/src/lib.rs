//! Outgoing Text Formatting for Telegram MarkdownV2
//!
//! Escapes model output for the channel's markup dialect, condenses reasoning traces
//! into short summaries, and renders executed-code transcripts.

pub mod code_block;
pub mod escape;
pub mod summary;

pub use code_block::CodeBlockFormatter;
pub use escape::{escape_code, escape_markdown_v2, RESERVED_CHARS};
pub use summary::{summarize_thoughts, TRUNCATION_MARKER};
