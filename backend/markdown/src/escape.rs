//! MarkdownV2 Escaping
//!
//! Telegram rejects MarkdownV2 text where a reserved character appears unescaped.
//! Escaping is not idempotent: escape raw text exactly once.

/// Characters MarkdownV2 treats as markup.
pub const RESERVED_CHARS: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.',
    '!',
];

/// Prefix every reserved character with a backslash.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        if RESERVED_CHARS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escape text placed inside a fenced code block, where only `\` and `` ` `` are special.
pub fn escape_code(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`")
}
