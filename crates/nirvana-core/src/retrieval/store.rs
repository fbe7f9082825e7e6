//! Retrieval store: document upsert and two-tier similarity search.
//!
//! `query` first ranks only the records whose metadata shares at least one
//! `(key, value)` pair with the caller's metadata. If that tier yields
//! nothing (no match, empty collection, or empty caller metadata) it ranks
//! the whole collection instead.

use nirvana_types::error::BackendError;
use nirvana_types::retrieval::{Document, Metadata, MetadataFilter, Record, ScoredRecord};
use tracing::{debug, info};
use uuid::Uuid;

use super::box_embedder::BoxEmbedder;
use super::box_index::BoxVectorIndex;

/// Maximum number of documents a query returns unless overridden.
pub const DEFAULT_RESULT_LIMIT: usize = 3;

/// A single named collection of embedded documents.
pub struct RetrievalStore {
    collection: String,
    embedder: BoxEmbedder,
    index: BoxVectorIndex,
    limit: usize,
}

impl RetrievalStore {
    /// Create an empty store over the given embedder and index.
    pub fn new(
        collection: impl Into<String>,
        embedder: BoxEmbedder,
        index: BoxVectorIndex,
    ) -> Self {
        let collection = collection.into();
        info!(
            collection = %collection,
            model = embedder.model_name(),
            dimension = embedder.dimension(),
            "Retrieval store initialized"
        );
        Self {
            collection,
            embedder,
            index,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    /// Override the maximum number of documents per query (at least 1).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of records in the collection.
    pub async fn len(&self) -> Result<usize, BackendError> {
        self.index.len().await
    }

    pub async fn is_empty(&self) -> Result<bool, BackendError> {
        Ok(self.len().await? == 0)
    }

    /// Embed and index `document` under a freshly generated id.
    ///
    /// Returns once the document is queryable.
    #[tracing::instrument(
        name = "retrieval_add",
        skip(self, document, metadata),
        fields(collection = %self.collection)
    )]
    pub async fn add(
        &self,
        document: impl Into<Document>,
        metadata: Metadata,
    ) -> Result<Uuid, BackendError> {
        if metadata.keys().any(|key| key.trim().is_empty()) {
            return Err(BackendError::InvalidMetadata(
                "metadata keys must be non-empty".to_string(),
            ));
        }

        let document = document.into();
        let embedding = self.embedder.embed_one(&document).await?;
        let record = Record::new(document, metadata);
        let id = record.id;

        self.index.upsert(record, embedding).await?;
        debug!(%id, "Document indexed");
        Ok(id)
    }

    /// Return up to `limit` documents most similar to `text`, preferring
    /// records that share a metadata pair with `metadata`.
    pub async fn query(
        &self,
        text: &str,
        metadata: &Metadata,
    ) -> Result<Vec<Document>, BackendError> {
        let records = self.query_records(text, metadata).await?;
        Ok(records.into_iter().map(|record| record.document).collect())
    }

    /// Same two-tier search as [`query`](Self::query), keeping each hit's
    /// id and metadata.
    #[tracing::instrument(
        name = "retrieval_query",
        skip(self, text, metadata),
        fields(collection = %self.collection, filter_pairs = metadata.len())
    )]
    pub async fn query_records(
        &self,
        text: &str,
        metadata: &Metadata,
    ) -> Result<Vec<Record>, BackendError> {
        let embedding = self.embedder.embed_one(text).await?;

        if let Some(filter) = MetadataFilter::any_of(metadata) {
            let hits = self
                .index
                .search(&embedding, Some(&filter), self.limit)
                .await?;
            if !hits.is_empty() {
                debug!(results = hits.len(), "Filtered search matched");
                return Ok(into_records(hits));
            }
            debug!("No records matched metadata filter, falling back to unfiltered search");
        }

        let hits = self.index.search(&embedding, None, self.limit).await?;
        debug!(results = hits.len(), "Unfiltered search");
        Ok(into_records(hits))
    }
}

fn into_records(hits: Vec<ScoredRecord>) -> Vec<Record> {
    hits.into_iter().map(|hit| hit.record).collect()
}
