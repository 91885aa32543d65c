//! services/api/src/web/cart.rs
//!
//! Cart endpoints: add and remove quantities of catalog items.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use commerce_core::domain::Cart;
use commerce_core::validate::check_quantity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::web::items::ItemBody;
use crate::web::port_error_response;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModifyCartRequest {
    pub username: String,
    pub item_id: i64,
    pub quantity: i64,
}

#[derive(Serialize, ToSchema)]
pub struct CartLineBody {
    pub item: ItemBody,
    pub quantity: u32,
}

#[derive(Serialize, ToSchema)]
pub struct CartBody {
    pub id: i64,
    pub items: Vec<CartLineBody>,
    #[schema(value_type = String)]
    pub total: Decimal,
}

impl From<Cart> for CartBody {
    fn from(cart: Cart) -> Self {
        Self {
            id: cart.id,
            items: cart
                .lines
                .into_iter()
                .map(|l| CartLineBody {
                    item: ItemBody::from(l.item),
                    quantity: l.quantity,
                })
                .collect(),
            total: cart.total,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/cart/addToCart - Add units of an item to the user's cart.
#[utoipa::path(
    post,
    path = "/api/cart/addToCart",
    request_body = ModifyCartRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartBody),
        (status = 400, description = "Negative quantity"),
        (status = 404, description = "User or item not found")
    )
)]
pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ModifyCartRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let quantity = check_quantity(req.quantity).map_err(port_error_response)?;
    let cart = state
        .cart
        .add_to_cart(&req.username, req.item_id, quantity)
        .await
        .map_err(port_error_response)?;
    Ok(Json(CartBody::from(cart)))
}

/// POST /api/cart/removeFromCart - Remove units of an item from the user's
/// cart. Removing more units than present clamps the line to zero.
#[utoipa::path(
    post,
    path = "/api/cart/removeFromCart",
    request_body = ModifyCartRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartBody),
        (status = 400, description = "Negative quantity"),
        (status = 404, description = "User or item not found")
    )
)]
pub async fn remove_from_cart(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ModifyCartRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let quantity = check_quantity(req.quantity).map_err(port_error_response)?;
    let cart = state
        .cart
        .remove_from_cart(&req.username, req.item_id, quantity)
        .await
        .map_err(port_error_response)?;
    Ok(Json(CartBody::from(cart)))
}
