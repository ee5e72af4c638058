//! Cron trigger endpoint, readiness probe, and health probe.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;

use crate::publisher;
use crate::security::{AuthDecision, RequestMeta, Violation};
use crate::state::AppState;

/// Build a standardized JSON error response: `{ "error": "<message>" }`.
fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

fn request_meta(addr: &SocketAddr, headers: &HeaderMap) -> RequestMeta {
    RequestMeta {
        source: addr.ip().to_string(),
        user_agent: headers
            .get(axum::http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/health — lightweight health probe (public, no auth)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/cron/readiness — probe, no auth, no side effects
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    // A plain read doubles as the store reachability check.
    let post_count = state.posts.list().await.len();
    Json(serde_json::json!({
        "status": "ok",
        "cron_configured": state.cron_validator.is_some(),
        "ticker_enabled": state.config.cron.ticker_enabled,
        "tick_secs": state.config.cron.tick_secs,
        "post_count": post_count,
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/cron/publish
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Authenticated trigger for one publish cycle.
///
/// Rate-limited denials use 429 so callers can tell lockout apart from a
/// plain credential failure (401). A successful run returns the execution
/// report.
pub async fn trigger_publish(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let Some(validator) = &state.cron_validator else {
        return api_error(StatusCode::SERVICE_UNAVAILABLE, "cron secret not configured");
    };

    let meta = request_meta(&addr, &headers);
    let authorization = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match validator.validate(authorization, &meta, &state.attempts, &state.audit, Utc::now()) {
        AuthDecision::Denied { violation, message } => {
            let status = match violation {
                Violation::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::UNAUTHORIZED,
            };
            (
                status,
                Json(serde_json::json!({
                    "error": message,
                    "violation": violation,
                })),
            )
                .into_response()
        }
        AuthDecision::Allowed => {
            match publisher::run_publish_cycle(state.posts.as_ref()).await {
                Ok(report) => Json(serde_json::json!(report)).into_response(),
                Err(e) => {
                    // Unexpected orchestrator-boundary failure: log it, hide it.
                    tracing::error!(error = %e, "publish cycle failed");
                    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
                }
            }
        }
    }
}
