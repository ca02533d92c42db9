//! TokenCodec trait for minting and verifying session tokens.
//!
//! The `HmacTokenCodec` adapter lives in keeper-infra. Time is passed in
//! explicitly so expiry handling stays deterministic under test.

use chrono::{DateTime, Utc};

use keeper_types::error::SessionError;
use keeper_types::identity::Identity;
use keeper_types::session::{SessionClaims, SessionToken};

/// Signs and verifies self-contained session tokens.
pub trait TokenCodec: Send + Sync {
    /// Mint a token for `identity`, valid from `issued_at` for the codec's TTL.
    fn issue(&self, identity: &Identity, issued_at: DateTime<Utc>) -> Result<SessionToken, SessionError>;

    /// Verify signature first, then expiry against `now`.
    ///
    /// Fails `InvalidToken` on malformed input or signature mismatch and
    /// `Expired` when the signature is good but the expiry has passed.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError>;
}
