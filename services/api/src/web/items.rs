//! services/api/src/web/items.rs
//!
//! Item catalog endpoints. The catalog is read-only reference data, so the
//! handlers go straight through the store port.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use commerce_core::domain::Item;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::web::port_error_response;
use crate::web::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct ItemBody {
    pub id: i64,
    pub name: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub description: String,
}

impl From<Item> for ItemBody {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            description: item.description,
        }
    }
}

/// GET /api/item - The full catalog listing.
#[utoipa::path(
    get,
    path = "/api/item",
    responses((status = 200, description = "All purchasable items", body = [ItemBody]))
)]
pub async fn list_items(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let items = state.store.list_items().await.map_err(port_error_response)?;
    Ok(Json(items.into_iter().map(ItemBody::from).collect::<Vec<_>>()))
}

/// GET /api/item/{id} - Look up one item by id.
#[utoipa::path(
    get,
    path = "/api/item/{id}",
    params(("id" = i64, Path, description = "The item id")),
    responses(
        (status = 200, description = "Item found", body = ItemBody),
        (status = 404, description = "No item with this id")
    )
)]
pub async fn find_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let item = state.store.find_item(id).await.map_err(port_error_response)?;
    Ok(Json(ItemBody::from(item)))
}

/// GET /api/item/name/{name} - Exact-match lookup by item name.
#[utoipa::path(
    get,
    path = "/api/item/name/{name}",
    params(("name" = String, Path, description = "The exact item name")),
    responses(
        (status = 200, description = "Matching items", body = [ItemBody]),
        (status = 404, description = "No item with this name")
    )
)]
pub async fn find_by_name(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let items = state
        .store
        .find_items_by_name(&name)
        .await
        .map_err(port_error_response)?;

    if items.is_empty() {
        return Err((
            StatusCode::NOT_FOUND,
            format!("No items found with name {}", name),
        ));
    }
    Ok(Json(items.into_iter().map(ItemBody::from).collect::<Vec<_>>()))
}
