//! Vector infrastructure for the retrieval store.
//!
//! An in-process brute-force cosine index plus two embedders: fastembed's
//! local ONNX model and an offline feature-hashing embedder.

pub mod embedder;
pub mod hashing;
pub mod memory;

use nirvana_core::retrieval::box_embedder::BoxEmbedder;
use nirvana_types::config::{EmbedderKind, RetrievalConfig};
use nirvana_types::error::BackendError;

use self::embedder::FastEmbedder;
use self::hashing::HashingEmbedder;

/// Build the embedder selected by `[retrieval] embedder`.
///
/// Loading the fastembed model may download it on first use, so this runs
/// on a blocking thread.
pub async fn create_embedder(config: &RetrievalConfig) -> Result<BoxEmbedder, BackendError> {
    match config.embedder {
        EmbedderKind::Fastembed => {
            let embedder = tokio::task::spawn_blocking(FastEmbedder::new)
                .await
                .map_err(|e| BackendError::Embedding(format!("model loader panicked: {e}")))??;
            Ok(BoxEmbedder::new(embedder))
        }
        EmbedderKind::Hashing => Ok(BoxEmbedder::new(HashingEmbedder::new(
            config.hashing_dimension,
        )?)),
    }
}
