//! Vault store trait definition and its type-erased wrapper.
//!
//! `VaultStore` uses RPITIT (native async fn in traits), so it cannot be a
//! trait object directly. `BoxVaultStore` follows the blanket-impl pattern:
//! 1. An object-safe `VaultStoreDyn` trait with boxed futures
//! 2. Blanket-impl `VaultStoreDyn` for all `T: VaultStore`
//! 3. `BoxVaultStore` wraps `Arc<dyn VaultStoreDyn>` and itself implements `VaultStore`
//!
//! The backend is chosen once at startup and erased into a `BoxVaultStore`;
//! call sites never know which implementation they talk to.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use keeper_types::error::StoreError;
use keeper_types::identity::Identity;
use keeper_types::item::{Ciphertext, ItemKind, SealedItem};

/// Storage port for users and sealed vault items.
///
/// Every implementation must honor the same error semantics:
/// - `create` never overwrites; an existing (owner, kind, name) is `AlreadyExists`
/// - `get` on an absent key is `NotFound`
/// - `list` on an owner with no items of a kind is an empty vector
pub trait VaultStore: Send + Sync {
    /// Insert a sealed item under `owner`. The kind is carried by the item variant.
    fn create(
        &self,
        owner: &Identity,
        item: SealedItem,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Fetch a sealed item by kind and name.
    fn get(
        &self,
        owner: &Identity,
        kind: ItemKind,
        name: &str,
    ) -> impl Future<Output = Result<SealedItem, StoreError>> + Send;

    /// Names of every item of `kind` held by `owner`. Ordering unspecified.
    fn list(
        &self,
        owner: &Identity,
        kind: ItemKind,
    ) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    fn user_exists(&self, owner: &Identity) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Register a user with an already-encrypted secret.
    fn create_user(
        &self,
        owner: &Identity,
        secret: Ciphertext,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn get_user_secret(
        &self,
        owner: &Identity,
    ) -> impl Future<Output = Result<Ciphertext, StoreError>> + Send;
}

/// Object-safe version of [`VaultStore`] with boxed futures.
pub trait VaultStoreDyn: Send + Sync {
    fn create_boxed<'a>(
        &'a self,
        owner: &'a Identity,
        item: SealedItem,
    ) -> BoxFuture<'a, Result<(), StoreError>>;

    fn get_boxed<'a>(
        &'a self,
        owner: &'a Identity,
        kind: ItemKind,
        name: &'a str,
    ) -> BoxFuture<'a, Result<SealedItem, StoreError>>;

    fn list_boxed<'a>(
        &'a self,
        owner: &'a Identity,
        kind: ItemKind,
    ) -> BoxFuture<'a, Result<Vec<String>, StoreError>>;

    fn user_exists_boxed<'a>(&'a self, owner: &'a Identity) -> BoxFuture<'a, Result<bool, StoreError>>;

    fn create_user_boxed<'a>(
        &'a self,
        owner: &'a Identity,
        secret: Ciphertext,
    ) -> BoxFuture<'a, Result<(), StoreError>>;

    fn get_user_secret_boxed<'a>(
        &'a self,
        owner: &'a Identity,
    ) -> BoxFuture<'a, Result<Ciphertext, StoreError>>;
}

impl<T: VaultStore> VaultStoreDyn for T {
    fn create_boxed<'a>(
        &'a self,
        owner: &'a Identity,
        item: SealedItem,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(self.create(owner, item))
    }

    fn get_boxed<'a>(
        &'a self,
        owner: &'a Identity,
        kind: ItemKind,
        name: &'a str,
    ) -> BoxFuture<'a, Result<SealedItem, StoreError>> {
        Box::pin(self.get(owner, kind, name))
    }

    fn list_boxed<'a>(
        &'a self,
        owner: &'a Identity,
        kind: ItemKind,
    ) -> BoxFuture<'a, Result<Vec<String>, StoreError>> {
        Box::pin(self.list(owner, kind))
    }

    fn user_exists_boxed<'a>(&'a self, owner: &'a Identity) -> BoxFuture<'a, Result<bool, StoreError>> {
        Box::pin(self.user_exists(owner))
    }

    fn create_user_boxed<'a>(
        &'a self,
        owner: &'a Identity,
        secret: Ciphertext,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(self.create_user(owner, secret))
    }

    fn get_user_secret_boxed<'a>(
        &'a self,
        owner: &'a Identity,
    ) -> BoxFuture<'a, Result<Ciphertext, StoreError>> {
        Box::pin(self.get_user_secret(owner))
    }
}

/// Type-erased vault store for runtime backend selection.
#[derive(Clone)]
pub struct BoxVaultStore {
    inner: Arc<dyn VaultStoreDyn>,
    backend: &'static str,
}

impl BoxVaultStore {
    /// Wrap a concrete store. `backend` is a short label used in logs.
    pub fn new<T: VaultStore + 'static>(store: T, backend: &'static str) -> Self {
        Self {
            inner: Arc::new(store),
            backend,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }
}

impl std::fmt::Debug for BoxVaultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxVaultStore")
            .field("backend", &self.backend)
            .finish()
    }
}

impl VaultStore for BoxVaultStore {
    async fn create(&self, owner: &Identity, item: SealedItem) -> Result<(), StoreError> {
        self.inner.create_boxed(owner, item).await
    }

    async fn get(&self, owner: &Identity, kind: ItemKind, name: &str) -> Result<SealedItem, StoreError> {
        self.inner.get_boxed(owner, kind, name).await
    }

    async fn list(&self, owner: &Identity, kind: ItemKind) -> Result<Vec<String>, StoreError> {
        self.inner.list_boxed(owner, kind).await
    }

    async fn user_exists(&self, owner: &Identity) -> Result<bool, StoreError> {
        self.inner.user_exists_boxed(owner).await
    }

    async fn create_user(&self, owner: &Identity, secret: Ciphertext) -> Result<(), StoreError> {
        self.inner.create_user_boxed(owner, secret).await
    }

    async fn get_user_secret(&self, owner: &Identity) -> Result<Ciphertext, StoreError> {
        self.inner.get_user_secret_boxed(owner).await
    }
}
