//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::web::state::AppState;

/// The verified username of the caller, inserted into request extensions by
/// [`require_auth`].
#[derive(Clone)]
pub struct AuthUser(pub String);

/// Middleware that validates the `Authorization: Bearer <token>` header.
///
/// If valid, inserts the token's username into request extensions for
/// handlers to use. If missing, malformed, expired, or signed with the wrong
/// key, returns 401 Unauthorized before the handler runs.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let username = state.tokens.verify(token).ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(AuthUser(username));
    Ok(next.run(req).await)
}
