//! Shared domain types for Nirvana.
//!
//! This crate contains the core domain types used across the service:
//! retrieval records and metadata filters, LLM request/response shapes,
//! conversation transcripts, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod retrieval;
