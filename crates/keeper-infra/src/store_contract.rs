//! Behavior every `VaultStore` backend must share.
//!
//! Each backend's tests call these against a fresh store so the memory and
//! SQLite implementations are held to the same error semantics.

use std::sync::Arc;

use keeper_core::repository::store::VaultStore;
use keeper_types::error::StoreError;
use keeper_types::identity::Identity;
use keeper_types::item::{Ciphertext, ItemKind, SealedItem};

fn id(login: &str) -> Identity {
    Identity::new(login).unwrap()
}

fn ct(bytes: &[u8]) -> Ciphertext {
    Ciphertext::new(bytes.to_vec())
}

fn credential(name: &str, secret: &[u8]) -> SealedItem {
    SealedItem::Credential {
        name: name.into(),
        login: ct(b"login"),
        secret: ct(secret),
    }
}

fn card(name: &str) -> SealedItem {
    SealedItem::Card {
        name: name.into(),
        number: ct(b"n"),
        holder: ct(b"h"),
        expiry: ct(b"e"),
        cvv: ct(b"c"),
    }
}

fn text(name: &str) -> SealedItem {
    SealedItem::Text {
        name: name.into(),
        body: ct(b"body"),
    }
}

pub async fn user_lifecycle<S: VaultStore>(store: &S) {
    let alice = id("alice");

    assert!(!store.user_exists(&alice).await.unwrap());
    assert_eq!(
        store.get_user_secret(&alice).await.unwrap_err(),
        StoreError::NotFound
    );

    store.create_user(&alice, ct(b"sealed-pw")).await.unwrap();
    assert!(store.user_exists(&alice).await.unwrap());
    assert_eq!(store.get_user_secret(&alice).await.unwrap(), ct(b"sealed-pw"));

    assert_eq!(
        store.create_user(&alice, ct(b"other")).await.unwrap_err(),
        StoreError::AlreadyExists
    );
    assert_eq!(store.get_user_secret(&alice).await.unwrap(), ct(b"sealed-pw"));
}

pub async fn create_get_list<S: VaultStore>(store: &S) {
    let alice = id("alice");
    store.create_user(&alice, ct(b"pw")).await.unwrap();

    for kind in ItemKind::ALL {
        assert!(store.list(&alice, kind).await.unwrap().is_empty());
    }

    for item in [credential("email", b"p1"), card("visa"), text("note")] {
        store.create(&alice, item.clone()).await.unwrap();
        assert_eq!(store.get(&alice, item.kind(), item.name()).await.unwrap(), item);
    }
    store.create(&alice, credential("bank", b"p2")).await.unwrap();

    let mut names = store.list(&alice, ItemKind::Credential).await.unwrap();
    names.sort();
    assert_eq!(names, vec!["bank", "email"]);
    assert_eq!(store.list(&alice, ItemKind::Card).await.unwrap(), vec!["visa"]);
    assert_eq!(store.list(&alice, ItemKind::Text).await.unwrap(), vec!["note"]);

    assert_eq!(
        store.get(&alice, ItemKind::Card, "missing").await.unwrap_err(),
        StoreError::NotFound
    );
}

pub async fn duplicate_keeps_original<S: VaultStore>(store: &S) {
    let alice = id("alice");
    store.create_user(&alice, ct(b"pw")).await.unwrap();

    store.create(&alice, credential("email", b"first")).await.unwrap();
    assert_eq!(
        store
            .create(&alice, credential("email", b"second"))
            .await
            .unwrap_err(),
        StoreError::AlreadyExists
    );
    assert_eq!(
        store.get(&alice, ItemKind::Credential, "email").await.unwrap(),
        credential("email", b"first")
    );
}

/// Names are unique per (owner, kind), not globally.
pub async fn scoping<S: VaultStore>(store: &S) {
    let alice = id("alice");
    let bob = id("bob");
    store.create_user(&alice, ct(b"pw")).await.unwrap();
    store.create_user(&bob, ct(b"pw")).await.unwrap();

    store.create(&alice, credential("shared", b"a")).await.unwrap();
    store.create(&alice, text("shared")).await.unwrap();
    store.create(&bob, credential("shared", b"b")).await.unwrap();

    assert_eq!(
        store.get(&bob, ItemKind::Credential, "shared").await.unwrap(),
        credential("shared", b"b")
    );
    assert_eq!(
        store.get(&bob, ItemKind::Text, "shared").await.unwrap_err(),
        StoreError::NotFound
    );
    assert!(store.list(&bob, ItemKind::Text).await.unwrap().is_empty());
}

pub async fn unknown_owner_cannot_create<S: VaultStore>(store: &S) {
    let ghost = id("ghost");
    assert!(store.create(&ghost, text("note")).await.is_err());
    assert!(store.list(&ghost, ItemKind::Text).await.unwrap().is_empty());
}

pub async fn concurrent_create<S: VaultStore + 'static>(store: Arc<S>) {
    let alice = id("alice");
    store.create_user(&alice, ct(b"pw")).await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            let alice = alice.clone();
            tokio::spawn(async move {
                store
                    .create(&alice, credential("race", format!("v{i}").as_bytes()))
                    .await
            })
        })
        .collect();

    let mut ok = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => ok += 1,
            Err(StoreError::AlreadyExists) => {}
            Err(e) => panic!("unexpected error {e:?}"),
        }
    }
    assert_eq!(ok, 1);
}
