//! Observability setup for Nirvana: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;
