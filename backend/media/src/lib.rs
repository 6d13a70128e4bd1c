pub mod mime_detect;

pub use mime_detect::{mime_from_extension, resolve_mime_type, sniff_mime_type, OCTET_STREAM};

/// Downloaded attachment bytes labelled with their resolved MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl MediaPayload {
    /// Label `data` using the channel's declared type, the file path, or the bytes.
    pub fn resolve(mime_hint: Option<&str>, file_path: &str, data: Vec<u8>) -> Self {
        let mime_type = resolve_mime_type(mime_hint, file_path, &data);
        Self { mime_type, data }
    }
}
