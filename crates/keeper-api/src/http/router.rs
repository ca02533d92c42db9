//! Axum router configuration with middleware.
//!
//! All vault routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Sessions
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        // Items
        .route("/credentials", post(handlers::vault::send_credential))
        .route("/credentials/{name}", get(handlers::vault::get_credential))
        .route("/cards", post(handlers::vault::send_card))
        .route("/cards/{name}", get(handlers::vault::get_card))
        .route("/texts", post(handlers::vault::send_text))
        .route("/texts/{name}", get(handlers::vault::get_text))
        .route("/sync", get(handlers::vault::synchronize));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness probe (no session required).
async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "backend": state.backend,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
