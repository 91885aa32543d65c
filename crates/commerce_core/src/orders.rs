//! crates/commerce_core/src/orders.rs
//!
//! The order service: turns a user's current cart into an immutable order
//! snapshot and serves order history.

use std::sync::Arc;

use crate::domain::Order;
use crate::ports::{PortResult, StoreService};

pub struct Orders {
    store: Arc<dyn StoreService>,
}

impl Orders {
    pub fn new(store: Arc<dyn StoreService>) -> Self {
        Self { store }
    }

    /// Snapshots the user's cart into a new order and resets the cart to
    /// empty. The store performs both writes atomically. Submitting an empty
    /// cart is allowed and yields a zero-total order.
    pub async fn submit(&self, username: &str) -> PortResult<Order> {
        let user = self.store.find_user_by_username(username).await?;
        let cart = self.store.load_cart(user.cart_id).await?;

        let order = Order::from_cart(&user.username, &cart);
        self.store
            .save_order_and_reset_cart(user.id, &order, cart.id)
            .await?;
        Ok(order)
    }

    /// All orders the user has ever submitted, oldest first.
    pub async fn history(&self, username: &str) -> PortResult<Vec<Order>> {
        let user = self.store.find_user_by_username(username).await?;
        self.store.orders_for_user(user.id).await
    }
}
