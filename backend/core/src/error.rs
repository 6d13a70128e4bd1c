use thiserror::Error;

/// Failures reported by a [`ChatTransport`](crate::traits::ChatTransport).
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The channel refused the text because its rich markup did not parse.
    #[error("markup rejected: {0}")]
    MarkupRejected(String),

    /// File metadata or contents could not be fetched.
    #[error("file unavailable: {0}")]
    FileUnavailable(String),

    #[error("delivery failed: {0}")]
    Transport(String),
}

impl DeliveryError {
    pub fn is_markup_rejection(&self) -> bool {
        matches!(self, DeliveryError::MarkupRejected(_))
    }
}

/// Top-level error type for the Eteon relay.
#[derive(Debug, Error)]
pub enum EteonError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("media retrieval failed: {0}")]
    MediaRetrieval(String),

    #[error("completion provider error ({provider}): {message}")]
    Completion { provider: String, message: String },

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
