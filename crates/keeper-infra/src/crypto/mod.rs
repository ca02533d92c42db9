//! Cryptographic adapters for Keeper.
//!
//! - `cipher`: AES-256-GCM field encryption
//! - `token`: HMAC-SHA256 session tokens

pub mod cipher;
pub mod token;
