//! HTTP routes.
//!
//! | Method | Path             | Purpose                              |
//! |--------|------------------|--------------------------------------|
//! | GET    | `/styles`        | list available citation styles       |
//! | POST   | `/format`        | render one citation                  |
//! | POST   | `/styles/reload` | rescan the style directory (admin)   |
//! | GET    | `/health`        | liveness                             |
//! | GET    | `/ready`         | readiness, fails while no catalog    |

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::error::{CitationError, CitationResult};
use crate::models::FormatRequest;
use crate::service::CitationService;

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub service: CitationService,
    /// Token required by administrative routes, if any.
    pub admin_token: Option<String>,
}

/// Create the HTTP router.
pub fn create_router(
    service: CitationService,
    admin_token: Option<String>,
    request_timeout: Duration,
) -> Router {
    let state = Arc::new(HttpState { service, admin_token });

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/styles", get(handle_list_styles))
        .route("/styles/reload", post(handle_reload))
        .route("/format", post(handle_format))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "cite-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn readiness_check(State(state): State<Arc<HttpState>>) -> Response {
    match state.service.catalog().await {
        Ok(catalog) => Json(serde_json::json!({
            "status": "ready",
            "service": "cite-server",
            "version": env!("CARGO_PKG_VERSION"),
            "styles": catalog.len(),
            "loadedAt": catalog.loaded_at()
        }))
        .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "unavailable", "error": e.to_user_message() })),
        )
            .into_response(),
    }
}

/// `GET /styles`
async fn handle_list_styles(
    State(state): State<Arc<HttpState>>,
) -> CitationResult<Json<serde_json::Value>> {
    let styles = state.service.list_styles().await?;
    Ok(Json(serde_json::json!({ "styles": styles })))
}

/// `POST /format`
async fn handle_format(
    State(state): State<Arc<HttpState>>,
    body: Result<Json<FormatRequest>, JsonRejection>,
) -> CitationResult<Json<serde_json::Value>> {
    let Json(request) = body.map_err(|e| CitationError::validation("body", e.body_text()))?;
    let formatted = state.service.format(request).await?;
    Ok(Json(formatted.to_json()))
}

/// `POST /styles/reload`
async fn handle_reload(
    State(state): State<Arc<HttpState>>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> CitationResult<Json<serde_json::Value>> {
    if let Some(expected) = &state.admin_token {
        let presented = auth.as_ref().map(|TypedHeader(header)| header.token());
        if presented != Some(expected.as_str()) {
            tracing::warn!("Rejected style reload with missing or invalid token");
            return Err(CitationError::Unauthorized);
        }
    }

    let count = state.service.reload().await?;
    Ok(Json(serde_json::json!({ "status": "reloaded", "styles": count })))
}
