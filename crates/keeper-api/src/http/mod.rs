//! HTTP/REST API layer for Keeper.
//!
//! Axum-based REST API at `/api/v1/` that decodes requests into gateway
//! envelopes and renders outcomes in the envelope response format.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
