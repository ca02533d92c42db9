//! Vault item endpoint handlers for the REST API.
//!
//! Every handler here forwards the bearer token untouched; the gateway's
//! authentication stage decides whether the call proceeds.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use keeper_core::gateway::envelope::{VaultRequest, VaultResponse};
use keeper_types::item::{Card, Credential, ItemKind, SyncSnapshot, Text};

use crate::http::error::AppError;
use crate::http::extractors::auth::Bearer;
use crate::http::extractors::json::ApiJson;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

use super::{dispatch, unexpected};

/// Body returned after an item is stored.
#[derive(Debug, Serialize)]
pub struct StoredBody {
    pub kind: ItemKind,
    pub name: String,
}

type Created = (StatusCode, Json<ApiResponse<StoredBody>>);

fn stored(
    timer: RequestTimer,
    kind: ItemKind,
    name: String,
    resp: VaultResponse,
) -> Result<Created, AppError> {
    match resp {
        VaultResponse::Stored => Ok((
            StatusCode::CREATED,
            Json(timer.finish(StoredBody { kind, name })),
        )),
        other => Err(unexpected(&other)),
    }
}

/// POST /api/v1/credentials - Store a login/password pair.
pub async fn send_credential(
    State(state): State<AppState>,
    Bearer(token): Bearer,
    ApiJson(credential): ApiJson<Credential>,
) -> Result<Created, AppError> {
    let timer = RequestTimer::start();
    let name = credential.name.clone();
    let resp = dispatch(&state, token, VaultRequest::SendCredential(credential)).await?;
    stored(timer, ItemKind::Credential, name, resp)
}

/// GET /api/v1/credentials/{name} - Fetch one credential.
pub async fn get_credential(
    State(state): State<AppState>,
    Bearer(token): Bearer,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Credential>>, AppError> {
    let timer = RequestTimer::start();
    match dispatch(&state, token, VaultRequest::GetCredential { name }).await? {
        VaultResponse::Credential(credential) => Ok(Json(timer.finish(credential))),
        other => Err(unexpected(&other)),
    }
}

/// POST /api/v1/cards - Store a payment card.
pub async fn send_card(
    State(state): State<AppState>,
    Bearer(token): Bearer,
    ApiJson(card): ApiJson<Card>,
) -> Result<Created, AppError> {
    let timer = RequestTimer::start();
    let name = card.name.clone();
    let resp = dispatch(&state, token, VaultRequest::SendCard(card)).await?;
    stored(timer, ItemKind::Card, name, resp)
}

/// GET /api/v1/cards/{name} - Fetch one card.
pub async fn get_card(
    State(state): State<AppState>,
    Bearer(token): Bearer,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Card>>, AppError> {
    let timer = RequestTimer::start();
    match dispatch(&state, token, VaultRequest::GetCard { name }).await? {
        VaultResponse::Card(card) => Ok(Json(timer.finish(card))),
        other => Err(unexpected(&other)),
    }
}

/// POST /api/v1/texts - Store a text note.
pub async fn send_text(
    State(state): State<AppState>,
    Bearer(token): Bearer,
    ApiJson(text): ApiJson<Text>,
) -> Result<Created, AppError> {
    let timer = RequestTimer::start();
    let name = text.name.clone();
    let resp = dispatch(&state, token, VaultRequest::SendText(text)).await?;
    stored(timer, ItemKind::Text, name, resp)
}

/// GET /api/v1/texts/{name} - Fetch one text note.
pub async fn get_text(
    State(state): State<AppState>,
    Bearer(token): Bearer,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Text>>, AppError> {
    let timer = RequestTimer::start();
    match dispatch(&state, token, VaultRequest::GetText { name }).await? {
        VaultResponse::Text(text) => Ok(Json(timer.finish(text))),
        other => Err(unexpected(&other)),
    }
}

/// GET /api/v1/sync - Names of every item the caller holds.
pub async fn synchronize(
    State(state): State<AppState>,
    Bearer(token): Bearer,
) -> Result<Json<ApiResponse<SyncSnapshot>>, AppError> {
    let timer = RequestTimer::start();
    match dispatch(&state, token, VaultRequest::Synchronize).await? {
        VaultResponse::Snapshot(snapshot) => Ok(Json(timer.finish(snapshot))),
        other => Err(unexpected(&other)),
    }
}
