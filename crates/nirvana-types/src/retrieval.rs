//! Retrieval types for Nirvana.
//!
//! A collection holds records: an opaque text document, caller-defined
//! string metadata, and a store-generated id. Queries may carry a
//! [`MetadataFilter`] that narrows the candidate records before ranking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque text blob (a chat turn, a journal entry, ...).
pub type Document = String;

/// Caller-defined provenance tags attached to a document at insertion time.
///
/// Ordered so filters and serialized output are deterministic.
pub type Metadata = BTreeMap<String, String>;

/// Name of the collection used when configuration does not override it.
pub const DEFAULT_COLLECTION: &str = "nirvana";

/// A document stored in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Generated by the store on insertion, never supplied by callers.
    pub id: Uuid,
    pub document: Document,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Record {
    /// Create a record with a freshly generated id.
    pub fn new(document: impl Into<Document>, metadata: Metadata) -> Self {
        Self {
            id: Uuid::now_v7(),
            document: document.into(),
            metadata,
        }
    }
}

/// A record returned from a similarity search together with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub record: Record,
    /// Cosine similarity to the query vector (higher is closer).
    pub similarity: f32,
}

/// Inclusion filter over record metadata with OR semantics.
///
/// A record matches when `record.metadata[key] == value` holds for at least
/// one `(key, value)` pair of the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFilter {
    any_of: Vec<(String, String)>,
}

impl MetadataFilter {
    /// Build an OR filter from every pair of `metadata`.
    ///
    /// Returns `None` for an empty map: there is no pair that could match.
    pub fn any_of(metadata: &Metadata) -> Option<Self> {
        if metadata.is_empty() {
            return None;
        }
        Some(Self {
            any_of: metadata
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.any_of
            .iter()
            .any(|(key, value)| metadata.get(key) == Some(value))
    }
}
