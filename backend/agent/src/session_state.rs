//! Per-conversation session state.
//!
//! One [`Session`] per chat, created on first contact and kept for the process
//! lifetime. Its mutex serializes every round trip for that chat.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::debug;

use eteon_core::{ChatId, Content, ThinkingLevel};

use crate::context_window::{ContextWindow, MAX_HISTORY_ENTRIES};

/// Mutable state of one conversation.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    history: Vec<Content>,
    thinking: Option<ThinkingLevel>,
}

impl SessionState {
    pub fn new(thinking: ThinkingLevel) -> Self {
        Self {
            history: Vec::new(),
            thinking: Some(thinking),
        }
    }

    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// History followed by `user`, leaving stored history untouched.
    pub fn conversation_with(&self, user: &Content) -> Vec<Content> {
        let mut conversation = Vec::with_capacity(self.history.len() + 1);
        conversation.extend_from_slice(&self.history);
        conversation.push(user.clone());
        conversation
    }

    /// Record a completed exchange, then trim to the history window.
    pub fn append_turn(&mut self, user: Option<Content>, model: Option<Content>) {
        self.history.extend(user);
        self.history.extend(model);
        ContextWindow::retain_recent(&mut self.history, MAX_HISTORY_ENTRIES);
    }

    /// Current thinking level, repairing an unset value to the default.
    pub fn current_thinking(&mut self) -> ThinkingLevel {
        *self.thinking.get_or_insert_with(ThinkingLevel::default)
    }

    pub fn set_thinking(&mut self, level: ThinkingLevel) {
        self.thinking = Some(level);
    }
}

/// A conversation's state behind its exclusive lock.
#[derive(Debug)]
pub struct Session {
    state: Mutex<SessionState>,
}

impl Session {
    fn new(thinking: ThinkingLevel) -> Self {
        Self {
            state: Mutex::new(SessionState::new(thinking)),
        }
    }

    /// Wait for exclusive access to the conversation.
    pub async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }
}

/// Process-wide table of sessions keyed by chat.
pub struct SessionStore {
    sessions: RwLock<HashMap<ChatId, Arc<Session>>>,
    default_thinking: ThinkingLevel,
}

impl SessionStore {
    pub fn new(default_thinking: ThinkingLevel) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            default_thinking,
        }
    }

    /// Return the chat's session, creating it on first use.
    pub async fn get_or_create(&self, chat: ChatId) -> Arc<Session> {
        if let Some(session) = self.sessions.read().await.get(&chat) {
            return Arc::clone(session);
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(chat).or_insert_with(|| {
            debug!(chat_id = %chat, "Creating session");
            Arc::new(Session::new(self.default_thinking))
        });
        Arc::clone(session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(ThinkingLevel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eteon_core::Part;

    fn turn(text: &str) -> Content {
        Content::user(vec![Part::text(text)])
    }

    #[test]
    fn test_history_window_keeps_most_recent_pairs() {
        for pairs in [1usize, 9, 10, 11, 37] {
            let mut state = SessionState::default();
            let mut all = Vec::new();
            for i in 0..pairs {
                let user = turn(&format!("u{i}"));
                let model = Content::model(vec![Part::text(format!("m{i}"))]);
                all.push(user.clone());
                all.push(model.clone());
                state.append_turn(Some(user), Some(model));
                assert!(state.history().len() <= MAX_HISTORY_ENTRIES);
            }
            let expected = &all[all.len() - (pairs * 2).min(MAX_HISTORY_ENTRIES)..];
            assert_eq!(state.history(), expected);
        }
    }

    #[test]
    fn test_conversation_with_does_not_mutate() {
        let mut state = SessionState::default();
        state.append_turn(Some(turn("hi")), None);
        let conversation = state.conversation_with(&turn("again"));
        assert_eq!(conversation.len(), 2);
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_append_turn_accepts_missing_model() {
        let mut state = SessionState::default();
        state.append_turn(Some(turn("only user")), None);
        assert_eq!(state.history(), &[turn("only user")]);
    }

    #[test]
    fn test_thinking_repairs_unset_level() {
        let mut state = SessionState::default();
        assert_eq!(state.current_thinking(), ThinkingLevel::Medium);
        state.set_thinking(ThinkingLevel::High);
        assert_eq!(state.current_thinking(), ThinkingLevel::High);
    }

    #[tokio::test]
    async fn test_store_returns_same_session() {
        let store = SessionStore::new(ThinkingLevel::Low);
        let a = store.get_or_create(ChatId(1)).await;
        let b = store.get_or_create(ChatId(1)).await;
        let c = store.get_or_create(ChatId(2)).await;
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(store.len().await, 2);
        assert_eq!(a.lock().await.current_thinking(), ThinkingLevel::Low);
    }

    #[tokio::test]
    async fn test_concurrent_first_contact_shares_session() {
        let store = Arc::new(SessionStore::default());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.get_or_create(ChatId(9)).await })
            })
            .collect();

        let mut sessions = Vec::new();
        for handle in handles {
            sessions.push(handle.await.unwrap());
        }
        assert!(sessions.iter().all(|s| Arc::ptr_eq(s, &sessions[0])));
        assert_eq!(store.len().await, 1);
    }
}
