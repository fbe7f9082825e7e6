//! Business logic and port trait definitions for Nirvana.
//!
//! This crate defines the "ports" (embedder, vector index, LLM provider)
//! that the infrastructure layer implements, plus the services built on
//! them. It depends only on `nirvana-types` -- never on `nirvana-infra`
//! or any model/HTTP client crate.

pub mod chat;
pub mod insights;
pub mod llm;
pub mod retrieval;
