//! Infrastructure layer for Keeper.
//!
//! Contains implementations of the ports defined in `keeper-core`: the
//! in-memory and SQLite vault stores, AES-256-GCM field encryption and
//! HMAC-SHA256 session tokens, plus the TOML configuration loader.

pub mod config;
pub mod crypto;
pub mod memory;
pub mod sqlite;

#[cfg(test)]
mod store_contract;
