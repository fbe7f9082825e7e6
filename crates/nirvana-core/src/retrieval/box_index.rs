//! BoxVectorIndex -- object-safe dynamic dispatch wrapper for VectorIndex.
//!
//! Same blanket-impl pattern as BoxEmbedder and BoxLlmProvider.

use std::future::Future;
use std::pin::Pin;

use nirvana_types::error::BackendError;
use nirvana_types::retrieval::{MetadataFilter, Record, ScoredRecord};

use super::index::VectorIndex;

/// Object-safe version of [`VectorIndex`] with boxed futures.
pub trait VectorIndexDyn: Send + Sync {
    fn upsert_boxed<'a>(
        &'a self,
        record: Record,
        embedding: Vec<f32>,
    ) -> Pin<Box<dyn Future<Output = Result<(), BackendError>> + Send + 'a>>;

    fn search_boxed<'a>(
        &'a self,
        query: &'a [f32],
        filter: Option<&'a MetadataFilter>,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ScoredRecord>, BackendError>> + Send + 'a>>;

    fn len_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<usize, BackendError>> + Send + 'a>>;
}

impl<T: VectorIndex> VectorIndexDyn for T {
    fn upsert_boxed<'a>(
        &'a self,
        record: Record,
        embedding: Vec<f32>,
    ) -> Pin<Box<dyn Future<Output = Result<(), BackendError>> + Send + 'a>> {
        Box::pin(self.upsert(record, embedding))
    }

    fn search_boxed<'a>(
        &'a self,
        query: &'a [f32],
        filter: Option<&'a MetadataFilter>,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ScoredRecord>, BackendError>> + Send + 'a>>
    {
        Box::pin(self.search(query, filter, limit))
    }

    fn len_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<usize, BackendError>> + Send + 'a>> {
        Box::pin(self.len())
    }
}

/// Type-erased vector index.
///
/// Since `VectorIndex` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxVectorIndex` provides equivalent methods that delegate
/// to the inner `VectorIndexDyn` trait object.
pub struct BoxVectorIndex {
    inner: Box<dyn VectorIndexDyn + Send + Sync>,
}

impl BoxVectorIndex {
    pub fn new<T: VectorIndex + 'static>(index: T) -> Self {
        Self {
            inner: Box::new(index),
        }
    }

    pub async fn upsert(&self, record: Record, embedding: Vec<f32>) -> Result<(), BackendError> {
        self.inner.upsert_boxed(record, embedding).await
    }

    pub async fn search(
        &self,
        query: &[f32],
        filter: Option<&MetadataFilter>,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>, BackendError> {
        self.inner.search_boxed(query, filter, limit).await
    }

    pub async fn len(&self) -> Result<usize, BackendError> {
        self.inner.len_boxed().await
    }
}
