//! MIME type detection for downloaded attachments.
//!
//! Resolution order: the type the channel declared, then the file extension, then
//! the leading bytes of the payload.

use std::path::Path;

use tracing::debug;

/// Fallback when nothing else identifies the payload.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Pick the MIME type for a downloaded file.
pub fn resolve_mime_type(explicit: Option<&str>, file_path: &str, data: &[u8]) -> String {
    if let Some(mime) = explicit.map(str::trim).filter(|m| !m.is_empty()) {
        return mime.to_string();
    }
    if let Some(mime) = mime_from_extension(file_path) {
        debug!(path = %file_path, mime = %mime, "MIME resolved from extension");
        return mime;
    }
    let sniffed = sniff_mime_type(data);
    debug!(path = %file_path, mime = %sniffed, "MIME resolved from content");
    sniffed.to_string()
}

/// Look a MIME type up by (case-insensitive) file extension.
pub fn mime_from_extension(file_path: &str) -> Option<String> {
    if file_path.is_empty() {
        return None;
    }
    let lowered = file_path.to_lowercase();
    mime_guess::from_path(Path::new(&lowered))
        .first_raw()
        .map(str::to_string)
}

/// Identify common media formats by their signature bytes.
pub fn sniff_mime_type(data: &[u8]) -> &'static str {
    match data {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => "image/png",
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => "audio/wave",
        [b'B', b'M', ..] => "image/bmp",
        [b'%', b'P', b'D', b'F', b'-', ..] => "application/pdf",
        [b'O', b'g', b'g', b'S', ..] => "application/ogg",
        [b'I', b'D', b'3', ..] => "audio/mpeg",
        [0xFF, second, ..] if second & 0xE0 == 0xE0 => "audio/mpeg",
        [b'f', b'L', b'a', b'C', ..] => "audio/flac",
        [_, _, _, _, b'f', b't', b'y', b'p', ..] => "video/mp4",
        [0x1A, 0x45, 0xDF, 0xA3, ..] => "video/webm",
        [b'P', b'K', 0x03, 0x04, ..] => "application/zip",
        _ if looks_like_text(data) => "text/plain; charset=utf-8",
        _ => OCTET_STREAM,
    }
}

fn looks_like_text(data: &[u8]) -> bool {
    !data.is_empty()
        && std::str::from_utf8(data).is_ok_and(|text| {
            !text
                .chars()
                .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t' | '\x0C'))
        })
}
