//! Telemetry and structured logging components for Eteon.
//!
//! Handles subscriber setup, log redaction, and relay lifecycle events.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, RelayEvent};
pub use logger::{init_logger, LogFormat, LoggerConfig};
pub use redact::redact_sensitive_data;
