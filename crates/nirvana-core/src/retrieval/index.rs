//! Vector index trait.
//!
//! Defines the interface for storing embedded records and ranking them by
//! similarity to a query vector. Implementations live in nirvana-infra.

use nirvana_types::error::BackendError;
use nirvana_types::retrieval::{MetadataFilter, Record, ScoredRecord};

/// Trait for vector-indexed record storage with semantic search.
///
/// Implementations must tolerate concurrent `upsert` and `search` calls:
/// no upsert may be lost, and a search must never observe a partially
/// written record.
pub trait VectorIndex: Send + Sync {
    /// Insert `record`, or replace the record already stored under its id.
    fn upsert(
        &self,
        record: Record,
        embedding: Vec<f32>,
    ) -> impl std::future::Future<Output = Result<(), BackendError>> + Send;

    /// Return up to `limit` records ranked by descending similarity to
    /// `query`. When `filter` is set, only matching records are ranked.
    fn search(
        &self,
        query: &[f32],
        filter: Option<&MetadataFilter>,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredRecord>, BackendError>> + Send;

    /// Number of records in the index.
    fn len(&self) -> impl std::future::Future<Output = Result<usize, BackendError>> + Send;
}
