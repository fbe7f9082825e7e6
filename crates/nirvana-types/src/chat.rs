//! Conversation types for Nirvana.
//!
//! A conversation is an ordered log of role-tagged messages seeded with the
//! assistant's system prompt. Each one is owned by a session id; nothing is
//! shared between sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm::{Message, MessageRole};

/// Metadata key under which chat turns are tagged with their session.
pub const SESSION_METADATA_KEY: &str = "session_id";

/// Metadata key under which chat turns are tagged with their role.
pub const ROLE_METADATA_KEY: &str = "role";

/// An append-only message log for one chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    messages: Vec<Message>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Start a conversation seeded with the given system prompt.
    pub fn new(id: Uuid, system_prompt: &str) -> Self {
        let now = Utc::now();
        Self {
            id,
            messages: vec![Message::system(system_prompt)],
            started_at: now,
            updated_at: now,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Record one completed exchange: the user's message and the reply.
    pub fn push_exchange(&mut self, user: String, assistant: String) {
        self.messages.push(Message::user(user));
        self.messages.push(Message::assistant(assistant));
        self.updated_at = Utc::now();
    }

    /// Number of completed user/assistant exchanges.
    pub fn turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count()
    }
}

/// Result of a single chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub session_id: Uuid,
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_is_seeded_with_system_prompt() {
        let convo = Conversation::new(Uuid::now_v7(), "You are Nirvana.");
        assert_eq!(convo.messages().len(), 1);
        assert_eq!(convo.messages()[0].role, MessageRole::System);
        assert_eq!(convo.messages()[0].content, "You are Nirvana.");
        assert_eq!(convo.turns(), 0);
    }

    #[test]
    fn test_push_exchange_keeps_role_alternation() {
        let mut convo = Conversation::new(Uuid::now_v7(), "prompt");
        convo.push_exchange("hi".into(), "hello".into());
        convo.push_exchange("how are you".into(), "well".into());

        let roles: Vec<MessageRole> = convo.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant,
            ]
        );
        assert_eq!(convo.turns(), 2);
        assert!(convo.updated_at >= convo.started_at);
    }
}
