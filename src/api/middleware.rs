//! HTTP middleware for API layer.

use axum::{
    body::Body,
    extract::State,
    http::{Request, Response},
    middleware::Next,
    response::IntoResponse,
};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::warn;

use crate::app::AppState;
use crate::domain::AppError;

/// Header carrying the shared API secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Constant-time comparison of two byte slices to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// API key authentication middleware.
///
/// Every request must carry an `X-API-KEY` header equal to the configured
/// secret. Anything else is answered with a 401 envelope before routing,
/// so no handler runs and no transaction is opened.
/// Uses constant-time comparison (via SHA-256 digest) to prevent timing attacks.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let api_key_header = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    let Some(provided) = api_key_header else {
        warn!(method = %request.method(), path = %request.uri().path(), "API auth failed: missing x-api-key header");
        return AppError::Authentication("missing API key".to_string()).into_response();
    };

    let expected_hash = Sha256::digest(state.api_auth_key.expose_secret().as_bytes());
    let provided_hash = Sha256::digest(provided.as_bytes());

    if !constant_time_eq(expected_hash.as_slice(), provided_hash.as_slice()) {
        warn!(method = %request.method(), path = %request.uri().path(), "API auth failed: invalid x-api-key");
        return AppError::Authentication("invalid API key".to_string()).into_response();
    }

    next.run(request).await
}
