//! services/api/src/web/orders.rs
//!
//! Order endpoints: submit the current cart as an order, and list history.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use commerce_core::domain::Order;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::port_error_response;
use crate::web::state::AppState;

//=========================================================================================
// Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineBody {
    pub item_id: i64,
    pub name: String,
    #[schema(value_type = String)]
    pub unit_price: Decimal,
    pub quantity: u32,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderBody {
    pub id: Uuid,
    pub username: String,
    pub items: Vec<OrderLineBody>,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub submitted_at: DateTime<Utc>,
}

impl From<Order> for OrderBody {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            username: order.username,
            items: order
                .lines
                .into_iter()
                .map(|l| OrderLineBody {
                    item_id: l.item_id,
                    name: l.name,
                    unit_price: l.unit_price,
                    quantity: l.quantity,
                })
                .collect(),
            total: order.total,
            submitted_at: order.submitted_at,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/order/submit/{username} - Snapshot the user's cart into an
/// immutable order and reset the cart.
#[utoipa::path(
    post,
    path = "/api/order/submit/{username}",
    params(("username" = String, Path, description = "The ordering user")),
    responses(
        (status = 200, description = "The submitted order", body = OrderBody),
        (status = 404, description = "User not found")
    )
)]
pub async fn submit_order(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let order = state
        .orders
        .submit(&username)
        .await
        .map_err(port_error_response)?;

    info!("Order {} submitted for {}", order.id, username);
    Ok(Json(OrderBody::from(order)))
}

/// GET /api/order/history/{username} - All orders the user has submitted,
/// oldest first.
#[utoipa::path(
    get,
    path = "/api/order/history/{username}",
    params(("username" = String, Path, description = "The user whose history to list")),
    responses(
        (status = 200, description = "Order history in submission order", body = [OrderBody]),
        (status = 404, description = "User not found")
    )
)]
pub async fn order_history(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let orders = state
        .orders
        .history(&username)
        .await
        .map_err(port_error_response)?;
    Ok(Json(orders.into_iter().map(OrderBody::from).collect::<Vec<_>>()))
}
