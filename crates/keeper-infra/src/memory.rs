//! In-memory vault store.
//!
//! Implements `VaultStore` from `keeper-core` with one `tokio::sync::RwLock`
//! around every table. Check-and-insert runs under the write lock, so two
//! racing creates on the same key resolve to one success and one
//! `AlreadyExists`. Nothing survives a restart.

use std::collections::HashMap;

use tokio::sync::RwLock;

use keeper_core::repository::store::VaultStore;
use keeper_types::error::StoreError;
use keeper_types::identity::Identity;
use keeper_types::item::{Ciphertext, ItemKind, SealedItem};

/// owner -> name -> sealed item
type ItemTable = HashMap<String, HashMap<String, SealedItem>>;

#[derive(Default)]
struct Tables {
    users: HashMap<String, Ciphertext>,
    credentials: ItemTable,
    cards: ItemTable,
    texts: ItemTable,
}

impl Tables {
    fn items(&self, kind: ItemKind) -> &ItemTable {
        match kind {
            ItemKind::Credential => &self.credentials,
            ItemKind::Card => &self.cards,
            ItemKind::Text => &self.texts,
        }
    }

    fn items_mut(&mut self, kind: ItemKind) -> &mut ItemTable {
        match kind {
            ItemKind::Credential => &mut self.credentials,
            ItemKind::Card => &mut self.cards,
            ItemKind::Text => &mut self.texts,
        }
    }
}

#[derive(Default)]
pub struct MemoryVaultStore {
    tables: RwLock<Tables>,
}

impl MemoryVaultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VaultStore for MemoryVaultStore {
    async fn create(&self, owner: &Identity, item: SealedItem) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(owner.as_str()) {
            return Err(StoreError::Internal("owner is not registered".to_string()));
        }

        let names = tables
            .items_mut(item.kind())
            .entry(owner.to_string())
            .or_default();
        if names.contains_key(item.name()) {
            return Err(StoreError::AlreadyExists);
        }
        names.insert(item.name().to_string(), item);
        Ok(())
    }

    async fn get(&self, owner: &Identity, kind: ItemKind, name: &str) -> Result<SealedItem, StoreError> {
        self.tables
            .read()
            .await
            .items(kind)
            .get(owner.as_str())
            .and_then(|names| names.get(name))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self, owner: &Identity, kind: ItemKind) -> Result<Vec<String>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .items(kind)
            .get(owner.as_str())
            .map(|names| names.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn user_exists(&self, owner: &Identity) -> Result<bool, StoreError> {
        Ok(self.tables.read().await.users.contains_key(owner.as_str()))
    }

    async fn create_user(&self, owner: &Identity, secret: Ciphertext) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(owner.as_str()) {
            return Err(StoreError::AlreadyExists);
        }
        tables.users.insert(owner.to_string(), secret);
        Ok(())
    }

    async fn get_user_secret(&self, owner: &Identity) -> Result<Ciphertext, StoreError> {
        self.tables
            .read()
            .await
            .users
            .get(owner.as_str())
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store_contract;

    #[tokio::test]
    async fn test_user_lifecycle() {
        store_contract::user_lifecycle(&MemoryVaultStore::new()).await;
    }

    #[tokio::test]
    async fn test_create_get_list() {
        store_contract::create_get_list(&MemoryVaultStore::new()).await;
    }

    #[tokio::test]
    async fn test_duplicate_keeps_original() {
        store_contract::duplicate_keeps_original(&MemoryVaultStore::new()).await;
    }

    #[tokio::test]
    async fn test_scoping() {
        store_contract::scoping(&MemoryVaultStore::new()).await;
    }

    #[tokio::test]
    async fn test_unknown_owner_cannot_create() {
        store_contract::unknown_owner_cannot_create(&MemoryVaultStore::new()).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create() {
        store_contract::concurrent_create(std::sync::Arc::new(MemoryVaultStore::new())).await;
    }
}
