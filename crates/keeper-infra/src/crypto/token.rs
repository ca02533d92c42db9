//! HMAC-SHA256 session tokens.
//!
//! Compact JWS layout: `base64url(header).base64url(claims).base64url(mac)`
//! with header `{"alg":"HS256","typ":"JWT"}` and claims `{sub, iat, exp}`.
//! The MAC is checked in constant time before the claims are parsed.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use keeper_core::service::token::TokenCodec;
use keeper_types::config::KEY_LEN;
use keeper_types::error::SessionError;
use keeper_types::identity::Identity;
use keeper_types::session::{SessionClaims, SessionToken};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

pub struct HmacTokenCodec {
    key: [u8; KEY_LEN],
    ttl: Duration,
}

impl HmacTokenCodec {
    pub fn new(key: &[u8; KEY_LEN], ttl: Duration) -> Self {
        Self { key: *key, ttl }
    }

    fn mac(&self) -> Result<HmacSha256, SessionError> {
        HmacSha256::new_from_slice(&self.key).map_err(|e| SessionError::Signing(e.to_string()))
    }
}

impl TokenCodec for HmacTokenCodec {
    fn issue(&self, identity: &Identity, issued_at: DateTime<Utc>) -> Result<SessionToken, SessionError> {
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };
        let claims = Claims {
            sub: identity.to_string(),
            iat: issued_at.timestamp(),
            exp: issued_at
                .checked_add_signed(self.ttl)
                .ok_or_else(|| SessionError::Signing("token expiry out of range".to_string()))?
                .timestamp(),
        };

        let signing_input = format!("{}.{}", encode_json(&header)?, encode_json(&claims)?);
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(SessionToken::new(format!("{signing_input}.{signature}")))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError> {
        let mut parts = token.split('.');
        let (Some(header), Some(claims), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(SessionError::InvalidToken);
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| SessionError::InvalidToken)?;
        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(claims.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| SessionError::InvalidToken)?;

        let header: Header = decode_json(header)?;
        if header.alg != ALGORITHM {
            return Err(SessionError::InvalidToken);
        }
        let claims: Claims = decode_json(claims)?;

        let identity = Identity::new(&claims.sub).map_err(|_| SessionError::InvalidToken)?;
        let issued_at = timestamp(claims.iat)?;
        let expires_at = timestamp(claims.exp)?;
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

fn encode_json<T: Serialize>(value: &T) -> Result<String, SessionError> {
    let json = serde_json::to_vec(value).map_err(|e| SessionError::Signing(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_json<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, SessionError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| SessionError::InvalidToken)?;
    serde_json::from_slice(&bytes).map_err(|_| SessionError::InvalidToken)
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, SessionError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or(SessionError::InvalidToken)
}
