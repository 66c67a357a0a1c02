//! REST API handlers for the admin server
//!
//! Routes:
//!
//! - `GET /api/health` - liveness probe, no auth
//! - `GET /api/loggers` - merged logger configuration, no auth
//! - `PUT /api/loggers/{id}?level=LEVEL` - set logger level, auth
//! - `POST /api/loggers/{id}?level=LEVEL` - add logger, auth
//! - `DELETE /api/loggers/{id}` - remove logger, auth
//! - `GET /api/schedulers` - sorted schedule listing, auth
//!
//! Failed token checks short-circuit with a `{result: "error"}` payload
//! rather than an HTTP error status; the admin UI renders the description.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::loggers::OpResult;
use super::server::AppState;

// ============================================================================
// API Types
// ============================================================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Query parameters for logger mutations
#[derive(Debug, Deserialize)]
pub struct LevelQuery {
    pub level: Option<String>,
}

// ============================================================================
// Authentication
// ============================================================================

/// Validate the bearer token against the configured admin token
///
/// Fails closed when no token is configured.
fn check_token(state: &AppState, headers: &HeaderMap) -> Result<(), String> {
    let Some(expected) = state.config.api_token.as_deref() else {
        return Err("no admin token configured".to_string());
    };

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token {
        Some(token) if token == expected => Ok(()),
        Some(_) => Err("invalid authorization token".to_string()),
        None => Err("missing authorization token".to_string()),
    }
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/loggers", get(read_loggers))
        .route(
            "/api/loggers/{id}",
            put(update_logger).post(add_logger).delete(delete_logger),
        )
        .route("/api/schedulers", get(list_schedulers))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// Merged logger configuration with live snapshots
async fn read_loggers(State(state): State<AppState>) -> Response {
    match state.loggers.read() {
        Ok(merged) => Json(merged).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "read_loggers failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(OpResult::error(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Set a logger's level
async fn update_logger(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LevelQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(text) = check_token(&state, &headers) {
        tracing::info!(%id, "update_logger: {text}");
        return Json(OpResult::error(text)).into_response();
    }

    let Some(level) = query.level else {
        return Json(OpResult::error("missing level parameter")).into_response();
    };

    Json(state.loggers.update(&id, &level).await).into_response()
}

/// Add a logger with an explicit configured level
async fn add_logger(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LevelQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(text) = check_token(&state, &headers) {
        tracing::info!(%id, "add_logger: {text}");
        return Json(OpResult::error(text)).into_response();
    }

    let Some(level) = query.level else {
        return Json(OpResult::error("missing level parameter")).into_response();
    };

    Json(state.loggers.add(&id, &level).await).into_response()
}

/// Remove a logger
async fn delete_logger(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(text) = check_token(&state, &headers) {
        tracing::info!(%id, "delete_logger: {text}");
        return Json(OpResult::error(text)).into_response();
    }

    Json(state.loggers.delete(&id).await).into_response()
}

/// Sorted schedule listing
async fn list_schedulers(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(text) = check_token(&state, &headers) {
        tracing::info!("list_schedulers: {text}");
        return Json(OpResult::error(text)).into_response();
    }

    Json(state.schedulers.list()).into_response()
}
