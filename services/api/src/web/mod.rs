//! services/api/src/web/mod.rs
//!
//! The HTTP layer: route table, the OpenAPI master definition, and the shared
//! mapping from port errors to HTTP responses.

pub mod auth;
pub mod cart;
pub mod items;
pub mod middleware;
pub mod orders;
pub mod state;
pub mod users;

use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use commerce_core::ports::PortError;
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;

pub use middleware::require_auth;
use state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        users::create_user,
        users::login,
        users::find_by_id,
        users::find_by_username,
        items::list_items,
        items::find_item,
        items::find_by_name,
        cart::add_to_cart,
        cart::remove_from_cart,
        orders::submit_order,
        orders::order_history,
    ),
    components(schemas(
        users::CreateUserRequest,
        users::LoginRequest,
        users::TokenResponse,
        users::UserBody,
        items::ItemBody,
        cart::ModifyCartRequest,
        cart::CartLineBody,
        cart::CartBody,
        orders::OrderLineBody,
        orders::OrderBody,
    )),
    tags(
        (name = "Commerce API", description = "User accounts, item catalog, carts, and orders.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Router
//=========================================================================================

/// Builds the full route table. Account creation and login are public; every
/// other route sits behind the bearer-token middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/api/user/create", post(users::create_user))
        .route("/api/user/login", post(users::login));

    let protected_routes = Router::new()
        .route("/api/user/id/{id}", get(users::find_by_id))
        .route("/api/user/{username}", get(users::find_by_username))
        .route("/api/item", get(items::list_items))
        .route("/api/item/{id}", get(items::find_item))
        .route("/api/item/name/{name}", get(items::find_by_name))
        .route("/api/cart/addToCart", post(cart::add_to_cart))
        .route("/api/cart/removeFromCart", post(cart::remove_from_cart))
        .route("/api/order/submit/{username}", post(orders::submit_order))
        .route("/api/order/history/{username}", get(orders::order_history))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Maps a port error to an HTTP response per the error taxonomy: validation
/// failures are 400s with a message, missing entities are 404s, and anything
/// unexpected is logged and surfaced as a bare 500.
pub(crate) fn port_error_response(err: PortError) -> (StatusCode, String) {
    match err {
        PortError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::Unexpected(msg) => {
            error!("Unexpected port error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            )
        }
    }
}
