//! HTTP request handlers.

pub mod chat;
pub mod insights;
pub mod retrieval;
