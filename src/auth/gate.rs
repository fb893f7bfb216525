//! The authentication gate. Runs as middleware on every protected route:
//! extract the bearer token, verify it, resolve the subject to a stored
//! user, and hand the identity to the handler via request extensions.
//!
//! A missing token is the only failure the caller can tell apart
//! (`missing_credentials`); every verification failure — malformed,
//! forged, expired, subject-less, or a subject that no longer resolves —
//! collapses into the same `invalid_credentials` rejection.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::errors::AppError;
use crate::store::User;
use crate::AppState;

/// The resolved identity of an authenticated request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: User,
}

pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).ok_or(AppError::NoCredentials)?;

    let subject = state.tokens.verify(&token).map_err(|e| {
        tracing::debug!(reason = %e, "token rejected");
        AppError::InvalidCredentials
    })?;

    // The subject may have stopped resolving since issuance (user removed
    // through an administrative path); that credential no longer proves an
    // identity, which is the same rejection class.
    let user = state
        .accounts
        .find_by_username(&subject)
        .await?
        .ok_or_else(|| {
            tracing::debug!(subject = %subject, "token subject does not resolve");
            AppError::InvalidCredentials
        })?;

    req.extensions_mut().insert(Identity { user });
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth = headers.get("authorization")?.to_str().ok()?;
    // The scheme name is case-insensitive (RFC 7235); clients send
    // "Bearer", "bearer", and worse.
    let (scheme, token) = auth.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
