//! Observability bootstrap for Keeper: structured logging through
//! `tracing-subscriber` with optional OpenTelemetry span export.

pub mod tracing_setup;
