//! HTTP API layer for Nirvana.
//!
//! Axum router with CORS (any origin) and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
