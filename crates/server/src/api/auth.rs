//! Bearer-token gate for the post management routes.
//!
//! The token is read from the env var named by `server.api_token_env` at
//! startup; `AppState` carries only its SHA-256 digest. With no token
//! configured the gate stays open (dev mode) — bootstrap has already
//! logged a warning about that.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::state::AppState;

/// Middleware guarding the post CRUD routes. Attach with
/// `axum::middleware::from_fn_with_state`.
pub async fn require_api_token(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = &state.api_token_hash else {
        return next.run(req).await;
    };

    let provided = bearer_token(req.headers()).unwrap_or("");

    // Hashing first gives both sides a fixed length, so the comparison
    // neither short-circuits nor reveals the token length.
    let digest = Sha256::digest(provided.as_bytes());
    if bool::from(digest.ct_eq(expected.as_slice())) {
        next.run(req).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({ "error": "invalid or missing API token" })),
        )
            .into_response()
    }
}

/// Pull the token out of `Authorization: Bearer <token>`, if present.
fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers_with("Bearer abc123")), Some("abc123"));
    }

    #[test]
    fn rejects_other_schemes_and_absence() {
        assert_eq!(bearer_token(&headers_with("Basic dXNlcg==")), None);
        assert_eq!(bearer_token(&headers_with("abc123")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
