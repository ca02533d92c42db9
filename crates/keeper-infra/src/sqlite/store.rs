//! SQLite vault store implementation.
//!
//! Implements `VaultStore` from `keeper-core` using sqlx with split read/write
//! pools. Duplicate detection is left to the `(login, name)` primary keys; a
//! constraint violation becomes `AlreadyExists`.

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use keeper_core::repository::store::VaultStore;
use keeper_types::error::StoreError;
use keeper_types::identity::Identity;
use keeper_types::item::{Ciphertext, ItemKind, SealedItem};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `VaultStore`.
pub struct SqliteVaultStore {
    pool: DatabasePool,
}

impl SqliteVaultStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn table(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Credential => "credentials",
        ItemKind::Card => "cards",
        ItemKind::Text => "texts",
    }
}

/// Connection-level failures mean the database is unreachable; everything
/// else is unexpected. Driver text stays in the log, callers get a fixed
/// message.
fn map_err(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::warn!(error = %e, "database unreachable");
            StoreError::Unavailable("database unreachable".to_string())
        }
        other => {
            tracing::warn!(error = %other, "database error");
            StoreError::Internal("database error".to_string())
        }
    }
}

fn map_insert_err(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE") => {
            StoreError::AlreadyExists
        }
        sqlx::Error::Database(db_err) if db_err.message().contains("FOREIGN KEY") => {
            StoreError::Internal("owner is not registered".to_string())
        }
        other => map_err(other),
    }
}

fn blob(row: &SqliteRow, column: &str) -> Result<Ciphertext, StoreError> {
    row.try_get::<Vec<u8>, _>(column)
        .map(Ciphertext::new)
        .map_err(map_err)
}

fn sealed_from_row(kind: ItemKind, row: &SqliteRow) -> Result<SealedItem, StoreError> {
    let name: String = row.try_get("name").map_err(map_err)?;
    Ok(match kind {
        ItemKind::Credential => SealedItem::Credential {
            name,
            login: blob(row, "username")?,
            secret: blob(row, "secret")?,
        },
        ItemKind::Card => SealedItem::Card {
            name,
            number: blob(row, "number")?,
            holder: blob(row, "holder")?,
            expiry: blob(row, "expiry")?,
            cvv: blob(row, "cvv")?,
        },
        ItemKind::Text => SealedItem::Text {
            name,
            body: blob(row, "body")?,
        },
    })
}

impl VaultStore for SqliteVaultStore {
    async fn create(&self, owner: &Identity, item: SealedItem) -> Result<(), StoreError> {
        let query = match &item {
            SealedItem::Credential {
                name,
                login,
                secret,
            } => sqlx::query(
                "INSERT INTO credentials (login, name, username, secret) VALUES (?, ?, ?, ?)",
            )
            .bind(owner.as_str())
            .bind(name.as_str())
            .bind(login.as_bytes())
            .bind(secret.as_bytes()),
            SealedItem::Card {
                name,
                number,
                holder,
                expiry,
                cvv,
            } => sqlx::query(
                "INSERT INTO cards (login, name, number, holder, expiry, cvv) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(owner.as_str())
            .bind(name.as_str())
            .bind(number.as_bytes())
            .bind(holder.as_bytes())
            .bind(expiry.as_bytes())
            .bind(cvv.as_bytes()),
            SealedItem::Text { name, body } => {
                sqlx::query("INSERT INTO texts (login, name, body) VALUES (?, ?, ?)")
                    .bind(owner.as_str())
                    .bind(name.as_str())
                    .bind(body.as_bytes())
            }
        };

        query
            .execute(&self.pool.writer)
            .await
            .map_err(map_insert_err)?;
        Ok(())
    }

    async fn get(&self, owner: &Identity, kind: ItemKind, name: &str) -> Result<SealedItem, StoreError> {
        let sql = format!("SELECT * FROM {} WHERE login = ? AND name = ?", table(kind));
        let row = sqlx::query(&sql)
            .bind(owner.as_str())
            .bind(name)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_err)?;

        match row {
            Some(row) => sealed_from_row(kind, &row),
            None => Err(StoreError::NotFound),
        }
    }

    async fn list(&self, owner: &Identity, kind: ItemKind) -> Result<Vec<String>, StoreError> {
        let sql = format!("SELECT name FROM {} WHERE login = ?", table(kind));
        sqlx::query_scalar::<_, String>(&sql)
            .bind(owner.as_str())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_err)
    }

    async fn user_exists(&self, owner: &Identity) -> Result<bool, StoreError> {
        let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM users WHERE login = ?")
            .bind(owner.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_err)?;
        Ok(found.is_some())
    }

    async fn create_user(&self, owner: &Identity, secret: Ciphertext) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO users (login, secret) VALUES (?, ?)")
            .bind(owner.as_str())
            .bind(secret.as_bytes())
            .execute(&self.pool.writer)
            .await
            .map_err(map_insert_err)?;
        Ok(())
    }

    async fn get_user_secret(&self, owner: &Identity) -> Result<Ciphertext, StoreError> {
        sqlx::query_scalar::<_, Vec<u8>>("SELECT secret FROM users WHERE login = ?")
            .bind(owner.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_err)?
            .map(Ciphertext::new)
            .ok_or(StoreError::NotFound)
    }
}
