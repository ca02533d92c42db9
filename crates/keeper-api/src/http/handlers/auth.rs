//! Registration and login handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use keeper_core::gateway::envelope::{VaultRequest, VaultResponse};

use crate::http::error::AppError;
use crate::http::extractors::json::ApiJson;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

use super::{dispatch, unexpected};

#[derive(Deserialize)]
pub struct AuthRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionBody {
    pub token: String,
}

/// POST /api/v1/register - Create a user and start a session.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AuthRequest>,
) -> Result<Json<ApiResponse<SessionBody>>, AppError> {
    let timer = RequestTimer::start();
    let request = VaultRequest::Register {
        login: body.login,
        password: body.password,
    };
    session(timer, dispatch(&state, None, request).await?)
}

/// POST /api/v1/login - Start a session for an existing user.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AuthRequest>,
) -> Result<Json<ApiResponse<SessionBody>>, AppError> {
    let timer = RequestTimer::start();
    let request = VaultRequest::Login {
        login: body.login,
        password: body.password,
    };
    session(timer, dispatch(&state, None, request).await?)
}

fn session(
    timer: RequestTimer,
    resp: VaultResponse,
) -> Result<Json<ApiResponse<SessionBody>>, AppError> {
    match resp {
        VaultResponse::Session(token) => Ok(Json(timer.finish(SessionBody {
            token: token.as_str().to_string(),
        }))),
        other => Err(unexpected(&other)),
    }
}
