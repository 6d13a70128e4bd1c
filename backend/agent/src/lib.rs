//! Eteon Relay Orchestration
//!
//! Conversation sessions, the artifact store, response rendering, and the relay that
//! ties a chat transport to a completion service.

pub mod artifacts;
pub mod context_window;
pub mod delivery;
pub mod relay;
pub mod render;
pub mod session_state;
pub mod system_prompt;
#[cfg(test)]
pub mod testing;

pub use artifacts::ArtifactStore;
pub use context_window::{ContextWindow, MAX_HISTORY_ENTRIES};
pub use delivery::{edit_with_fallback, send_with_fallback};
pub use relay::{Relay, RelaySettings, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT};
pub use render::{render_response, RenderedReply};
pub use session_state::{Session, SessionState, SessionStore};
pub use system_prompt::PromptBuilder;
