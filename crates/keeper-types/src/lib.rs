//! Shared domain types for Keeper.
//!
//! This crate contains the core domain types used across the vault:
//! identities, session tokens, vault items and their sealed (encrypted)
//! form, configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror, secrecy.

pub mod config;
pub mod error;
pub mod identity;
pub mod item;
pub mod session;
