//! In-memory conversation registry keyed by session id.

use std::sync::Arc;

use dashmap::DashMap;
use nirvana_types::chat::Conversation;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Shared handle to one conversation. The lock is held for a whole turn.
pub type ConversationHandle = Arc<Mutex<Conversation>>;

/// Owns every live conversation for the process lifetime.
#[derive(Default)]
pub struct ConversationStore {
    conversations: DashMap<Uuid, ConversationHandle>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the conversation for `id`, seeding a new one with
    /// `system_prompt` on first use.
    pub fn get_or_create(&self, id: Uuid, system_prompt: &str) -> ConversationHandle {
        let entry = self.conversations.entry(id).or_insert_with(|| {
            debug!(session_id = %id, "Starting conversation");
            Arc::new(Mutex::new(Conversation::new(id, system_prompt)))
        });
        Arc::clone(entry.value())
    }

    pub fn get(&self, id: &Uuid) -> Option<ConversationHandle> {
        self.conversations
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Drop a conversation. Returns whether it existed.
    pub fn remove(&self, id: &Uuid) -> bool {
        self.conversations.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_create_reuses_existing() {
        let store = ConversationStore::new();
        let id = Uuid::now_v7();

        let first = store.get_or_create(id, "prompt");
        first
            .lock()
            .await
            .push_exchange("hi".to_string(), "hello".to_string());

        let second = store.get_or_create(id, "a different prompt");
        let convo = second.lock().await;
        assert_eq!(convo.turns(), 1);
        assert_eq!(convo.messages()[0].content, "prompt");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_and_get() {
        let store = ConversationStore::new();
        let id = Uuid::now_v7();
        assert!(store.get(&id).is_none());

        store.get_or_create(id, "prompt");
        assert!(store.get(&id).is_some());
        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(store.is_empty());
    }
}
