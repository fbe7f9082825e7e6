//! Semantic retrieval for Nirvana.
//!
//! - `Embedder`: text-to-vector port (implemented in nirvana-infra)
//! - `VectorIndex`: vector storage + nearest-neighbour search port
//! - `BoxEmbedder` / `BoxVectorIndex`: object-safe wrappers for runtime selection
//! - `RetrievalStore`: `add` / two-tier `query` over the two ports

pub mod box_embedder;
pub mod box_index;
pub mod embedder;
pub mod index;
pub mod store;
