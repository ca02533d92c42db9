//! In-crate fakes for the store, cipher and token ports.
//!
//! keeper-core cannot depend on keeper-infra, so service and pipeline tests
//! run against these. They honor the same error contracts as the real
//! adapters but make no attempt at real cryptography.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};

use keeper_types::error::{CipherError, SessionError, StoreError};
use keeper_types::identity::Identity;
use keeper_types::item::{Ciphertext, ItemKind, SealedItem};
use keeper_types::session::{SessionClaims, SessionToken};

use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::repository::store::VaultStore;
use crate::service::cipher::FieldCipher;
use crate::service::token::TokenCodec;

/// HashMap-backed store that counts every call.
#[derive(Default)]
pub struct FakeStore {
    users: Mutex<HashMap<String, Ciphertext>>,
    items: Mutex<HashMap<(String, ItemKind, String), SealedItem>>,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Direct access to the stored sealed item, bypassing counters.
    pub fn raw(&self, owner: &str, kind: ItemKind, name: &str) -> Option<SealedItem> {
        self.items
            .lock()
            .unwrap()
            .get(&(owner.to_string(), kind, name.to_string()))
            .cloned()
    }

    /// Replace a stored item, bypassing the no-overwrite rule.
    pub fn tamper(&self, owner: &str, item: SealedItem) {
        self.items
            .lock()
            .unwrap()
            .insert((owner.to_string(), item.kind(), item.name().to_string()), item);
    }
}

impl VaultStore for FakeStore {
    async fn create(&self, owner: &Identity, item: SealedItem) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let key = (owner.to_string(), item.kind(), item.name().to_string());
        let mut items = self.items.lock().unwrap();
        if items.contains_key(&key) {
            return Err(StoreError::AlreadyExists);
        }
        items.insert(key, item);
        Ok(())
    }

    async fn get(&self, owner: &Identity, kind: ItemKind, name: &str) -> Result<SealedItem, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.items
            .lock()
            .unwrap()
            .get(&(owner.to_string(), kind, name.to_string()))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self, owner: &Identity, kind: ItemKind) -> Result<Vec<String>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .items
            .lock()
            .unwrap()
            .keys()
            .filter(|(o, k, _)| o == owner.as_str() && *k == kind)
            .map(|(_, _, name)| name.clone())
            .collect())
    }

    async fn user_exists(&self, owner: &Identity) -> Result<bool, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.lock().unwrap().contains_key(owner.as_str()))
    }

    async fn create_user(&self, owner: &Identity, secret: Ciphertext) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut users = self.users.lock().unwrap();
        if users.contains_key(owner.as_str()) {
            return Err(StoreError::AlreadyExists);
        }
        users.insert(owner.to_string(), secret);
        Ok(())
    }

    async fn get_user_secret(&self, owner: &Identity) -> Result<Ciphertext, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.users
            .lock()
            .unwrap()
            .get(owner.as_str())
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

/// Store whose every call fails as unreachable.
pub struct DownStore;

impl VaultStore for DownStore {
    async fn create(&self, _owner: &Identity, _item: SealedItem) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn get(&self, _owner: &Identity, _kind: ItemKind, _name: &str) -> Result<SealedItem, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn list(&self, _owner: &Identity, _kind: ItemKind) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn user_exists(&self, _owner: &Identity) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn create_user(&self, _owner: &Identity, _secret: Ciphertext) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn get_user_secret(&self, _owner: &Identity) -> Result<Ciphertext, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

/// Toy cipher: `key || counter || plaintext ^ key`.
///
/// Randomized through the counter and fails on a key mismatch, which is all
/// the service tests need.
pub struct FakeCipher {
    key: u8,
    counter: AtomicU64,
}

impl FakeCipher {
    pub fn new(key: u8) -> Self {
        Self {
            key,
            counter: AtomicU64::new(0),
        }
    }
}

impl FieldCipher for FakeCipher {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Ciphertext, CipherError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let mut out = Vec::with_capacity(9 + plaintext.len());
        out.push(self.key);
        out.extend_from_slice(&n.to_be_bytes());
        out.extend(plaintext.iter().map(|b| b ^ self.key));
        Ok(Ciphertext::new(out))
    }

    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Vec<u8>, CipherError> {
        let bytes = ciphertext.as_bytes();
        if bytes.len() < 9 {
            return Err(CipherError::CiphertextTooShort);
        }
        if bytes[0] != self.key {
            return Err(CipherError::DecryptionFailed);
        }
        Ok(bytes[9..].iter().map(|b| b ^ self.key).collect())
    }
}

/// Toy token codec: `login|issued|expires|key`.
pub struct FakeTokenCodec {
    key: String,
    ttl: Duration,
}

impl FakeTokenCodec {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ttl: Duration::hours(1),
        }
    }
}

impl TokenCodec for FakeTokenCodec {
    fn issue(&self, identity: &Identity, issued_at: DateTime<Utc>) -> Result<SessionToken, SessionError> {
        let expires_at = issued_at + self.ttl;
        Ok(SessionToken::new(format!(
            "{}|{}|{}|{}",
            identity,
            issued_at.timestamp(),
            expires_at.timestamp(),
            self.key
        )))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError> {
        let parts: Vec<&str> = token.split('|').collect();
        if parts.len() != 4 || parts[3] != self.key {
            return Err(SessionError::InvalidToken);
        }
        let identity = Identity::new(parts[0]).map_err(|_| SessionError::InvalidToken)?;
        let issued_at = parse_secs(parts[1])?;
        let expires_at = parse_secs(parts[2])?;
        if expires_at <= now {
            return Err(SessionError::Expired);
        }
        Ok(SessionClaims {
            identity,
            issued_at,
            expires_at,
        })
    }
}

fn parse_secs(s: &str) -> Result<DateTime<Utc>, SessionError> {
    let secs: i64 = s.parse().map_err(|_| SessionError::InvalidToken)?;
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or(SessionError::InvalidToken)
}

/// Captured tracing events, one `field=value` line per event.
pub type Events = Arc<Mutex<Vec<String>>>;

/// Route this thread's tracing events into a shared buffer until the guard
/// drops. Works with the current-thread runtime `#[tokio::test]` uses.
pub fn capture_events() -> (Events, DefaultGuard) {
    let events = Events::default();
    let subscriber = tracing_subscriber::registry().with(Capture(events.clone()));
    (events, tracing::subscriber::set_default(subscriber))
}

struct Capture(Events);

impl<S: tracing::Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut line = Line(String::new());
        event.record(&mut line);
        self.0.lock().unwrap().push(line.0);
    }
}

struct Line(String);

impl Visit for Line {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let _ = write!(self.0, "{}={:?} ", field.name(), value);
    }
}
