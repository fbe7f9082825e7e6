//! LlmProvider trait definition.
//!
//! The remote chat-completion service the chat and insights flows call.
//! Uses RPITIT for `complete`.

use nirvana_types::llm::{CompletionRequest, CompletionResponse, RemoteServiceError};

/// Trait for chat-completion backends (Groq, OpenAI, Gemini, ...).
///
/// Implementations live in nirvana-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "groq", "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, RemoteServiceError>> + Send;
}
