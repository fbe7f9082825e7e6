//! Application state wiring all services together.
//!
//! AppState holds the service instances shared by every HTTP handler. One
//! retrieval store backs both the retrieval endpoints and chat context.

use std::sync::Arc;

use nirvana_core::chat::service::ChatService;
use nirvana_core::insights::InsightsService;
use nirvana_core::llm::box_provider::BoxLlmProvider;
use nirvana_core::llm::settings::GenerationSettings;
use nirvana_core::retrieval::box_embedder::BoxEmbedder;
use nirvana_core::retrieval::box_index::BoxVectorIndex;
use nirvana_core::retrieval::store::RetrievalStore;
use nirvana_infra::config::{PromptSet, load_prompts};
use nirvana_infra::llm::create_provider;
use nirvana_infra::secret::resolve_api_key;
use nirvana_infra::vector::create_embedder;
use nirvana_infra::vector::memory::InMemoryVectorIndex;
use nirvana_types::config::AppConfig;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub insights: Arc<InsightsService>,
    pub retrieval: Arc<RetrievalStore>,
}

impl AppState {
    /// Resolve the API key, load prompts and the embedder, wire services.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let api_key = resolve_api_key(&config.llm)?;
        let prompts = load_prompts(&config.prompts).await?;
        let provider = Arc::new(create_provider(&config.llm, api_key));
        let embedder = create_embedder(&config.retrieval).await?;

        Ok(Self::from_parts(config, provider, embedder, prompts))
    }

    /// Wire services from already-built parts.
    pub fn from_parts(
        config: &AppConfig,
        provider: Arc<BoxLlmProvider>,
        embedder: BoxEmbedder,
        prompts: PromptSet,
    ) -> Self {
        let retrieval = Arc::new(
            RetrievalStore::new(
                config.retrieval.collection.clone(),
                embedder,
                BoxVectorIndex::new(InMemoryVectorIndex::new()),
            )
            .with_limit(config.retrieval.result_limit),
        );

        let settings = GenerationSettings::from(&config.llm);
        let chat = ChatService::new(Arc::clone(&provider), settings.clone(), prompts.assistant)
            .with_retrieval(Arc::clone(&retrieval), config.retrieval.chat_context);
        let insights = InsightsService::new(provider, settings, prompts.insights);

        Self {
            chat: Arc::new(chat),
            insights: Arc::new(insights),
            retrieval,
        }
    }
}
