//! Infrastructure layer for Nirvana.
//!
//! Implements the ports defined in `nirvana-core`: the in-memory vector
//! index, fastembed and feature-hashing embedders, and the
//! OpenAI-compatible chat-completion provider. Also loads configuration,
//! prompt files and the API key.

pub mod config;
pub mod llm;
pub mod secret;
pub mod vector;
