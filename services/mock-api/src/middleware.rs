//! Request counting, failure injection and bearer authentication

use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use common::models::User;
use serde_json::json;
use tracing::{info, warn};

use crate::error::MockApiError;
use crate::state::MockState;

/// Count every request and answer it with an injected failure if one is queued
pub async fn observe(State(state): State<MockState>, req: Request, next: Next) -> Response {
    state.record_request();
    info!("{} {}", req.method(), req.uri().path());

    if let Some(status) = state.take_failure(req.method(), req.uri().path()) {
        warn!("Injected {} for {} {}", status, req.method(), req.uri().path());
        return (status, Json(json!({ "error": "Injected failure" }))).into_response();
    }

    next.run(req).await
}

/// Authenticated user, available to handlers behind [`require_user`]
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Resolve the bearer token to a user or reject with 401
pub async fn require_user(
    State(state): State<MockState>,
    mut req: Request,
    next: Next,
) -> Result<Response, MockApiError> {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or_else(|| MockApiError::Unauthorized("Missing bearer token".to_string()))?;

    let user = state
        .read()
        .await
        .user_by_access_token(token)
        .cloned()
        .ok_or_else(|| MockApiError::Unauthorized("Session expired".to_string()))?;

    req.extensions_mut().insert(AuthUser(user));
    Ok(next.run(req).await)
}
