//! services/api/src/web/users.rs
//!
//! User endpoints: unauthenticated account creation and login, plus
//! authenticated lookups by id or username.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use commerce_core::domain::User;
use commerce_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::web::port_error_response;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub id: i64,
    pub username: String,
    pub cart_id: i64,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            cart_id: user.cart_id,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/user/create - Register a new user account.
#[utoipa::path(
    post,
    path = "/api/user/create",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created successfully", body = UserBody),
        (status = 400, description = "Username taken, or weak/mismatched password")
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = state
        .accounts
        .create(&req.username, &req.password, &req.confirm_password)
        .await
        .map_err(|e| {
            error!("Unable to create user {}: {}", req.username, e);
            port_error_response(e)
        })?;

    info!("User {} created successfully", user.username);
    Ok(Json(UserBody::from(user)))
}

/// POST /api/user/login - Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = state
        .accounts
        .login(&req.username, &req.password)
        .await
        .map_err(|e| match e {
            PortError::Validation(msg) => (StatusCode::UNAUTHORIZED, msg),
            other => port_error_response(other),
        })?;

    let token = state.tokens.issue(&user.username).map_err(|e| {
        error!("Failed to issue token: {}", e);
        port_error_response(e)
    })?;

    Ok(Json(TokenResponse { token }))
}

/// GET /api/user/id/{id} - Look up a user by numeric id.
#[utoipa::path(
    get,
    path = "/api/user/id/{id}",
    params(("id" = i64, Path, description = "The user's numeric id")),
    responses(
        (status = 200, description = "User found", body = UserBody),
        (status = 404, description = "No user with this id")
    )
)]
pub async fn find_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = state
        .accounts
        .find_by_id(id)
        .await
        .map_err(port_error_response)?;
    Ok(Json(UserBody::from(user)))
}

/// GET /api/user/{username} - Look up a user by username.
#[utoipa::path(
    get,
    path = "/api/user/{username}",
    params(("username" = String, Path, description = "The user's unique username")),
    responses(
        (status = 200, description = "User found", body = UserBody),
        (status = 404, description = "No user with this username")
    )
)]
pub async fn find_by_username(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = state
        .accounts
        .find_by_username(&username)
        .await
        .map_err(|e| {
            if matches!(e, PortError::NotFound(_)) {
                error!("Cannot find user with username: {}", username);
            }
            port_error_response(e)
        })?;
    Ok(Json(UserBody::from(user)))
}
