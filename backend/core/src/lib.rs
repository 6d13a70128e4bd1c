pub mod artifact;
pub mod channel;
pub mod content;
pub mod error;
pub mod generation;
pub mod thinking;
pub mod traits;

pub use artifact::{CodeSnippet, ResponseArtifacts, SourceRef};
pub use channel::{
    CallbackAction, CallbackEvent, ChatId, InboundMessage, InlineButton, InlineKeyboard,
    MediaAttachment, MediaKind, RemoteFile, SendOptions, SentMessage,
};
pub use content::{Blob, CodeExecutionResult, Content, ExecutableCode, Part, Role};
pub use error::{DeliveryError, EteonError};
pub use generation::{
    Candidate, Citation, CitationMetadata, GenerateRequest, GenerateResponse, GenerationConfig,
    GroundingChunk, GroundingMetadata, PromptFeedback, ThinkingConfig, Tool, WebChunk,
};
pub use thinking::{ThinkingBudget, ThinkingLevel};
pub use traits::{ChatTransport, CompletionClient};
