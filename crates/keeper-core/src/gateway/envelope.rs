//! Decoded operations and their results.
//!
//! The wire layer turns whatever it receives into an [`Envelope`] and gets a
//! [`VaultResponse`] or a tagged `VaultError` back.

use std::fmt;

use keeper_types::item::{Card, Credential, SyncSnapshot, Text};
use keeper_types::session::SessionToken;

/// One inbound operation plus the token presented with it, if any.
#[derive(Debug)]
pub struct Envelope {
    pub token: Option<SessionToken>,
    pub request: VaultRequest,
}

impl Envelope {
    /// An operation with no session (Register, Login).
    pub fn anonymous(request: VaultRequest) -> Self {
        Self {
            token: None,
            request,
        }
    }

    pub fn with_token(token: SessionToken, request: VaultRequest) -> Self {
        Self {
            token: Some(token),
            request,
        }
    }
}

#[derive(Clone)]
pub enum VaultRequest {
    Register { login: String, password: String },
    Login { login: String, password: String },
    SendCredential(Credential),
    GetCredential { name: String },
    SendCard(Card),
    GetCard { name: String },
    SendText(Text),
    GetText { name: String },
    Synchronize,
}

impl VaultRequest {
    /// Stable method identifier used in logs.
    pub fn method(&self) -> &'static str {
        match self {
            VaultRequest::Register { .. } => "keeper.Auth/Register",
            VaultRequest::Login { .. } => "keeper.Auth/Login",
            VaultRequest::SendCredential(_) => "keeper.Vault/SendCredential",
            VaultRequest::GetCredential { .. } => "keeper.Vault/GetCredential",
            VaultRequest::SendCard(_) => "keeper.Vault/SendCard",
            VaultRequest::GetCard { .. } => "keeper.Vault/GetCard",
            VaultRequest::SendText(_) => "keeper.Vault/SendText",
            VaultRequest::GetText { .. } => "keeper.Vault/GetText",
            VaultRequest::Synchronize => "keeper.Vault/Synchronize",
        }
    }

    /// Everything except Register and Login needs a verified session.
    pub fn requires_session(&self) -> bool {
        !matches!(
            self,
            VaultRequest::Register { .. } | VaultRequest::Login { .. }
        )
    }
}

// Payloads carry passwords and item fields; only the method is printed.
impl fmt::Debug for VaultRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VaultRequest").field(&self.method()).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultResponse {
    /// Fresh token from Register or Login.
    Session(SessionToken),
    /// A Send* operation stored its item.
    Stored,
    Credential(Credential),
    Card(Card),
    Text(Text),
    Snapshot(SyncSnapshot),
}
