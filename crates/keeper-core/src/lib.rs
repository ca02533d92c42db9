//! Business logic and port definitions for Keeper.
//!
//! This crate defines the "ports" (store, cipher and token traits) that the
//! infrastructure layer implements, the services that orchestrate them, and
//! the interceptor pipeline every operation passes through. It depends only
//! on `keeper-types` -- never on `keeper-infra` or any database/crypto crate.

pub mod gateway;
pub mod pipeline;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
