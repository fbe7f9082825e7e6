//! In-memory vector index.
//!
//! Records live in a `Vec` behind a tokio `RwLock`: upserts take the write
//! lock, searches take the read lock and rank a consistent snapshot by
//! exact cosine similarity. The first upsert fixes the index dimension.

use nirvana_core::retrieval::index::VectorIndex;
use nirvana_types::error::BackendError;
use nirvana_types::retrieval::{MetadataFilter, Record, ScoredRecord};
use tokio::sync::RwLock;
use tracing::debug;

struct IndexedRecord {
    record: Record,
    embedding: Vec<f32>,
    norm: f32,
}

#[derive(Default)]
struct Inner {
    dimension: Option<usize>,
    records: Vec<IndexedRecord>,
}

/// Brute-force cosine index held entirely in process memory.
#[derive(Default)]
pub struct InMemoryVectorIndex {
    inner: RwLock<Inner>,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The dimension fixed by the first upsert, if any.
    pub async fn dimension(&self) -> Option<usize> {
        self.inner.read().await.dimension
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity in `[-1, 1]`; 0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    cosine_with_norms(a, l2_norm(a), b, l2_norm(b))
}

fn cosine_with_norms(a: &[f32], norm_a: f32, b: &[f32], norm_b: f32) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (norm_a * norm_b)
}

fn check_dimension(expected: Option<usize>, actual: usize) -> Result<(), BackendError> {
    match expected {
        Some(expected) if expected != actual => {
            Err(BackendError::DimensionMismatch { expected, actual })
        }
        _ => Ok(()),
    }
}

impl VectorIndex for InMemoryVectorIndex {
    async fn upsert(&self, record: Record, embedding: Vec<f32>) -> Result<(), BackendError> {
        if embedding.is_empty() {
            return Err(BackendError::Index("embedding must not be empty".to_string()));
        }
        if embedding.iter().any(|x| !x.is_finite()) {
            return Err(BackendError::Index(
                "embedding contains non-finite values".to_string(),
            ));
        }

        let mut inner = self.inner.write().await;
        check_dimension(inner.dimension, embedding.len())?;
        inner.dimension = Some(embedding.len());

        let norm = l2_norm(&embedding);
        let entry = IndexedRecord {
            record,
            embedding,
            norm,
        };

        match inner
            .records
            .iter()
            .position(|existing| existing.record.id == entry.record.id)
        {
            Some(slot) => {
                debug!(id = %entry.record.id, "Replacing record");
                inner.records[slot] = entry;
            }
            None => inner.records.push(entry),
        }
        Ok(())
    }

    async fn search(
        &self,
        query: &[f32],
        filter: Option<&MetadataFilter>,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>, BackendError> {
        let inner = self.inner.read().await;
        if inner.records.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        check_dimension(inner.dimension, query.len())?;

        let query_norm = l2_norm(query);
        let mut hits: Vec<(f32, &IndexedRecord)> = inner
            .records
            .iter()
            .filter(|entry| filter.is_none_or(|f| f.matches(&entry.record.metadata)))
            .map(|entry| {
                let similarity =
                    cosine_with_norms(query, query_norm, &entry.embedding, entry.norm);
                (similarity, entry)
            })
            .collect();

        hits.sort_by(|a, b| b.0.total_cmp(&a.0));
        hits.truncate(limit);

        Ok(hits
            .into_iter()
            .map(|(similarity, entry)| ScoredRecord {
                record: entry.record.clone(),
                similarity,
            })
            .collect())
    }

    async fn len(&self) -> Result<usize, BackendError> {
        Ok(self.inner.read().await.records.len())
    }
}
