//! Sliding history window.
//!
//! History is bounded by entry count, not tokens: once over the limit the oldest
//! entries are dropped and the newest kept in their original order.

/// Maximum number of history entries kept per conversation.
pub const MAX_HISTORY_ENTRIES: usize = 20;

pub struct ContextWindow;

impl ContextWindow {
    /// Drop entries from the front until at most `limit` remain.
    pub fn retain_recent<T>(entries: &mut Vec<T>, limit: usize) {
        if entries.len() > limit {
            let excess = entries.len() - limit;
            entries.drain(..excess);
        }
    }
}
