//! Chat service: one user message in, one assistant reply out.
//!
//! Each turn runs under its conversation's lock, so concurrent requests on
//! the same session serialize and the log keeps strict user/assistant
//! alternation. A turn that fails anywhere leaves the log untouched.

use std::sync::Arc;

use nirvana_types::chat::{ChatTurn, ROLE_METADATA_KEY, SESSION_METADATA_KEY};
use nirvana_types::error::BackendError;
use nirvana_types::llm::{Message, MessageRole, RemoteServiceError};
use nirvana_types::retrieval::Metadata;
use tracing::{debug, info};
use uuid::Uuid;

use crate::chat::conversation::ConversationStore;
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::settings::GenerationSettings;
use crate::retrieval::store::RetrievalStore;

/// Header of the system message carrying retrieved context.
const CONTEXT_HEADER: &str = "Relevant context from earlier entries:";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Remote(#[from] RemoteServiceError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Orchestrates chat turns against the remote model.
pub struct ChatService {
    provider: Arc<BoxLlmProvider>,
    settings: GenerationSettings,
    system_prompt: String,
    conversations: ConversationStore,
    retrieval: Option<Arc<RetrievalStore>>,
    use_context: bool,
}

impl ChatService {
    pub fn new(
        provider: Arc<BoxLlmProvider>,
        settings: GenerationSettings,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            settings,
            system_prompt: system_prompt.into(),
            conversations: ConversationStore::new(),
            retrieval: None,
            use_context: false,
        }
    }

    /// Attach a retrieval store. Every completed turn is indexed into it;
    /// when `use_context` is set, each turn also queries it for context.
    pub fn with_retrieval(mut self, store: Arc<RetrievalStore>, use_context: bool) -> Self {
        self.retrieval = Some(store);
        self.use_context = use_context;
        self
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// Send `message` on `session_id`, or on a fresh session when `None`.
    #[tracing::instrument(
        name = "chat_turn",
        skip(self, message),
        fields(provider = %self.provider.name())
    )]
    pub async fn send(
        &self,
        session_id: Option<Uuid>,
        message: &str,
    ) -> Result<ChatTurn, ChatError> {
        let session_id = session_id.unwrap_or_else(Uuid::now_v7);
        let handle = self
            .conversations
            .get_or_create(session_id, &self.system_prompt);
        let mut conversation = handle.lock().await;

        let mut messages = conversation.messages().to_vec();
        if let Some(context) = self.retrieve_context(session_id, message).await? {
            // Directly after the seeded system prompt.
            messages.insert(1, Message::system(context));
        }
        messages.push(Message::user(message));

        let request = self.settings.request(messages);
        let response = self.provider.complete(&request).await?;
        let reply = response.content;

        if let Some(store) = &self.retrieval {
            store
                .add(message, turn_metadata(session_id, MessageRole::User))
                .await?;
            store
                .add(reply.clone(), turn_metadata(session_id, MessageRole::Assistant))
                .await?;
        }

        conversation.push_exchange(message.to_string(), reply.clone());
        info!(
            session_id = %session_id,
            turns = conversation.turns(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Chat turn completed"
        );

        Ok(ChatTurn { session_id, reply })
    }

    /// Snapshot of a session's message log.
    pub async fn history(&self, session_id: &Uuid) -> Option<Vec<Message>> {
        let handle = self.conversations.get(session_id)?;
        let conversation = handle.lock().await;
        Some(conversation.messages().to_vec())
    }

    /// Forget a session. Returns whether it existed.
    pub fn reset(&self, session_id: &Uuid) -> bool {
        let removed = self.conversations.remove(session_id);
        if removed {
            info!(session_id = %session_id, "Conversation reset");
        }
        removed
    }

    async fn retrieve_context(
        &self,
        session_id: Uuid,
        message: &str,
    ) -> Result<Option<String>, BackendError> {
        let Some(store) = self.retrieval.as_ref().filter(|_| self.use_context) else {
            return Ok(None);
        };

        let session = session_id.to_string();
        let mut metadata = Metadata::new();
        metadata.insert(SESSION_METADATA_KEY.to_string(), session.clone());

        // The unfiltered fallback may return turns of other sessions.
        let records = store.query_records(message, &metadata).await?;
        let hits = records.len();
        let documents: Vec<String> = records
            .into_iter()
            .filter(|record| {
                record
                    .metadata
                    .get(SESSION_METADATA_KEY)
                    .is_none_or(|owner| *owner == session)
            })
            .map(|record| record.document)
            .collect();

        if documents.len() < hits {
            debug!(
                dropped = hits - documents.len(),
                "Dropped chat turns owned by other sessions"
            );
        }
        if documents.is_empty() {
            return Ok(None);
        }

        debug!(documents = documents.len(), "Adding retrieved context");
        let mut context = String::from(CONTEXT_HEADER);
        for document in &documents {
            context.push_str("\n- ");
            context.push_str(document);
        }
        Ok(Some(context))
    }
}

fn turn_metadata(session_id: Uuid, role: MessageRole) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert(SESSION_METADATA_KEY.to_string(), session_id.to_string());
    metadata.insert(ROLE_METADATA_KEY.to_string(), role.to_string());
    metadata
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use nirvana_types::llm::{CompletionRequest, CompletionResponse, StopReason, Usage};
    use nirvana_types::retrieval::{MetadataFilter, Record, ScoredRecord};
    use tokio::sync::RwLock;

    use super::*;
    use crate::llm::provider::LlmProvider;
    use crate::retrieval::box_embedder::BoxEmbedder;
    use crate::retrieval::box_index::BoxVectorIndex;
    use crate::retrieval::embedder::Embedder;
    use crate::retrieval::index::VectorIndex;

    /// Replies "reply N" and records every request it receives.
    #[derive(Clone, Default)]
    struct MockProvider {
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
        fail: bool,
    }

    impl MockProvider {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, RemoteServiceError> {
            let n = {
                let mut requests = self.requests.lock().unwrap();
                requests.push(request.clone());
                requests.len()
            };
            if self.fail {
                return Err(RemoteServiceError::RateLimited {
                    retry_after_ms: None,
                });
            }
            Ok(CompletionResponse {
                id: format!("resp-{n}"),
                content: format!("reply {n}"),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            })
        }
    }

    /// Every text maps to the same vector; ranking is insertion order.
    struct ConstantEmbedder;

    impl Embedder for ConstantEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn model_name(&self) -> &str {
            "constant"
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    #[derive(Clone, Default)]
    struct VecIndex {
        records: Arc<RwLock<Vec<Record>>>,
    }

    impl VectorIndex for VecIndex {
        async fn upsert(&self, record: Record, _embedding: Vec<f32>) -> Result<(), BackendError> {
            self.records.write().await.push(record);
            Ok(())
        }

        async fn search(
            &self,
            _query: &[f32],
            filter: Option<&MetadataFilter>,
            limit: usize,
        ) -> Result<Vec<ScoredRecord>, BackendError> {
            Ok(self
                .records
                .read()
                .await
                .iter()
                .filter(|r| filter.is_none_or(|f| f.matches(&r.metadata)))
                .take(limit)
                .map(|r| ScoredRecord {
                    record: r.clone(),
                    similarity: 1.0,
                })
                .collect())
        }

        async fn len(&self) -> Result<usize, BackendError> {
            Ok(self.records.read().await.len())
        }
    }

    fn settings() -> GenerationSettings {
        GenerationSettings {
            model: "test-model".to_string(),
            temperature: Some(0.5),
            max_tokens: None,
        }
    }

    fn service(provider: MockProvider) -> ChatService {
        ChatService::new(
            Arc::new(BoxLlmProvider::new(provider)),
            settings(),
            "You are a journaling companion.",
        )
    }

    fn store(index: VecIndex) -> Arc<RetrievalStore> {
        Arc::new(RetrievalStore::new(
            "nirvana",
            BoxEmbedder::new(ConstantEmbedder),
            BoxVectorIndex::new(index),
        ))
    }

    #[tokio::test]
    async fn test_first_turn_sends_system_prompt_and_user_message() {
        let provider = MockProvider::default();
        let chat = service(provider.clone());

        let turn = chat.send(None, "I slept badly").await.unwrap();
        assert_eq!(turn.reply, "reply 1");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let sent = &requests[0];
        assert_eq!(sent.model, "test-model");
        assert_eq!(sent.temperature, Some(0.5));
        assert_eq!(sent.messages.len(), 2);
        assert_eq!(sent.messages[0].role, MessageRole::System);
        assert_eq!(sent.messages[0].content, "You are a journaling companion.");
        assert_eq!(sent.messages[1], Message::user("I slept badly"));
    }

    #[tokio::test]
    async fn test_history_alternates_across_turns() {
        let provider = MockProvider::default();
        let chat = service(provider.clone());

        let first = chat.send(None, "one").await.unwrap();
        let second = chat.send(Some(first.session_id), "two").await.unwrap();
        assert_eq!(first.session_id, second.session_id);

        // Second request carries the whole first exchange.
        let sent = &provider.requests()[1];
        let contents: Vec<&str> = sent.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["You are a journaling companion.", "one", "reply 1", "two"]
        );

        let history = chat.history(&first.session_id).await.unwrap();
        let roles: Vec<MessageRole> = history.iter().map(|m| m.role).collect();
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
    }

    #[tokio::test]
    async fn test_failed_call_leaves_history_unchanged() {
        let chat = service(MockProvider::failing());
        let session_id = Uuid::now_v7();

        let result = chat.send(Some(session_id), "hello").await;
        assert!(matches!(
            result,
            Err(ChatError::Remote(RemoteServiceError::RateLimited { .. }))
        ));

        let history = chat.history(&session_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, MessageRole::System);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let provider = MockProvider::default();
        let chat = service(provider.clone());

        let alice = chat.send(None, "alice secret").await.unwrap();
        let bob = chat.send(None, "bob question").await.unwrap();
        assert_ne!(alice.session_id, bob.session_id);

        let bob_request = &provider.requests()[1];
        assert!(
            bob_request
                .messages
                .iter()
                .all(|m| m.content != "alice secret")
        );
        assert_eq!(chat.conversations().len(), 2);
    }

    #[tokio::test]
    async fn test_context_never_includes_other_sessions_turns() {
        let provider = MockProvider::default();
        let index = VecIndex::default();
        let chat = service(provider.clone()).with_retrieval(store(index.clone()), true);

        let alice = chat.send(None, "alice secret diagnosis").await.unwrap();
        let bob = chat.send(None, "hello").await.unwrap();
        assert_ne!(alice.session_id, bob.session_id);
        assert_eq!(index.records.read().await.len(), 4);

        let bob_request = &provider.requests()[1];
        let contents: Vec<&str> = bob_request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["You are a journaling companion.", "hello"]);
    }

    #[tokio::test]
    async fn test_context_keeps_own_turns_and_untagged_entries() {
        let provider = MockProvider::default();
        let index = VecIndex::default();
        let store = store(index);
        store
            .add("Went hiking on Sunday", Metadata::new())
            .await
            .unwrap();
        let chat = service(provider.clone()).with_retrieval(store, true);

        chat.send(None, "alice secret diagnosis").await.unwrap();
        // Bob's first turn falls back to the whole collection.
        chat.send(None, "hello").await.unwrap();

        let context = &provider.requests()[1].messages[1];
        assert_eq!(context.role, MessageRole::System);
        assert!(context.content.contains("Went hiking on Sunday"));
        assert!(!context.content.contains("alice secret diagnosis"));
        assert!(!context.content.contains("reply 1"));
    }

    #[tokio::test]
    async fn test_reset_drops_conversation() {
        let chat = service(MockProvider::default());
        let turn = chat.send(None, "hi").await.unwrap();

        assert!(chat.reset(&turn.session_id));
        assert!(chat.history(&turn.session_id).await.is_none());
        assert!(!chat.reset(&turn.session_id));
    }

    #[tokio::test]
    async fn test_completed_turns_are_indexed_with_session_and_role() {
        let index = VecIndex::default();
        let chat = service(MockProvider::default()).with_retrieval(store(index.clone()), false);

        let turn = chat.send(None, "walked by the river").await.unwrap();

        let records = index.records.read().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].document, "walked by the river");
        assert_eq!(records[0].metadata["role"], "user");
        assert_eq!(records[1].document, "reply 1");
        assert_eq!(records[1].metadata["role"], "assistant");
        assert!(
            records
                .iter()
                .all(|r| r.metadata["session_id"] == turn.session_id.to_string())
        );
    }

    #[tokio::test]
    async fn test_retrieved_context_is_sent_when_enabled() {
        let provider = MockProvider::default();
        let index = VecIndex::default();
        let store = store(index);
        store
            .add("Went hiking on Sunday", Metadata::new())
            .await
            .unwrap();

        let chat = service(provider.clone()).with_retrieval(store, true);
        let turn = chat.send(None, "what did I do this weekend?").await.unwrap();

        let sent = &provider.requests()[0];
        assert_eq!(sent.messages.len(), 3);
        assert_eq!(sent.messages[1].role, MessageRole::System);
        assert!(sent.messages[1].content.starts_with(CONTEXT_HEADER));
        assert!(sent.messages[1].content.contains("Went hiking on Sunday"));
        assert_eq!(sent.messages[2].role, MessageRole::User);

        // Context is per request, never part of the stored log.
        let history = chat.history(&turn.session_id).await.unwrap();
        assert!(history.iter().all(|m| !m.content.starts_with(CONTEXT_HEADER)));
    }

    #[tokio::test]
    async fn test_no_context_message_on_empty_store() {
        let provider = MockProvider::default();
        let chat =
            service(provider.clone()).with_retrieval(store(VecIndex::default()), true);

        chat.send(None, "first entry").await.unwrap();
        assert_eq!(provider.requests()[0].messages.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_turns_on_one_session_serialize() {
        let provider = MockProvider::default();
        let chat = Arc::new(service(provider.clone()));
        let session_id = Uuid::now_v7();

        let mut handles = Vec::new();
        for i in 0..10 {
            let chat = Arc::clone(&chat);
            handles.push(tokio::spawn(async move {
                chat.send(Some(session_id), &format!("message {i}")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let history = chat.history(&session_id).await.unwrap();
        assert_eq!(history.len(), 21);
        for pair in history[1..].chunks(2) {
            assert_eq!(pair[0].role, MessageRole::User);
            assert_eq!(pair[1].role, MessageRole::Assistant);
        }
    }
}
