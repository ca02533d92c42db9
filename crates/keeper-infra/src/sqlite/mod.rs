//! SQLite relational backend.

pub mod pool;
pub mod store;

pub use pool::DatabasePool;
pub use store::SqliteVaultStore;
