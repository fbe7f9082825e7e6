//! FastEmbed-based local embedding generator.
//!
//! Implements the `Embedder` trait from `nirvana-core` using fastembed's
//! all-MiniLM-L6-v2 model (384 dimensions) with ONNX runtime inference.
//! Inference is CPU-bound, so every call runs on a blocking thread.

use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use nirvana_core::retrieval::embedder::Embedder;
use nirvana_types::error::BackendError;
use tracing::info;

/// Output dimension of all-MiniLM-L6-v2.
pub const FASTEMBED_DIMENSION: usize = 384;

const MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Local sentence embedder backed by fastembed.
pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedder {
    /// Load the model, downloading it into fastembed's cache on first use.
    ///
    /// Blocking; call from `spawn_blocking` inside async contexts.
    pub fn new() -> Result<Self, BackendError> {
        let options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
        let model = TextEmbedding::try_new(options)
            .map_err(|e| BackendError::Embedding(format!("failed to load {MODEL_NAME}: {e}")))?;
        info!(model = MODEL_NAME, "Embedding model loaded");
        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

impl Embedder for FastEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();
        let expected = texts.len();

        let vectors = tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| BackendError::Embedding("embedding model lock poisoned".to_string()))?;
            model
                .embed(texts, None)
                .map_err(|e| BackendError::Embedding(e.to_string()))
        })
        .await
        .map_err(|e| BackendError::Embedding(format!("embedding task failed: {e}")))??;

        if vectors.len() != expected {
            return Err(BackendError::Embedding(format!(
                "expected {expected} vectors, got {}",
                vectors.len()
            )));
        }
        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn dimension(&self) -> usize {
        FASTEMBED_DIMENSION
    }
}
