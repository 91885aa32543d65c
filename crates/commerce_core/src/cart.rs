//! crates/commerce_core/src/cart.rs
//!
//! The cart manager: resolves the user and the catalog item, applies the
//! quantity change to the cart, and persists the result.

use std::sync::Arc;

use crate::domain::Cart;
use crate::ports::{PortResult, StoreService};

pub struct CartManager {
    store: Arc<dyn StoreService>,
}

impl CartManager {
    pub fn new(store: Arc<dyn StoreService>) -> Self {
        Self { store }
    }

    /// Adds `quantity` units of the item to the user's cart, merging with an
    /// existing line, and returns the updated cart with its recomputed total.
    pub async fn add_to_cart(&self, username: &str, item_id: i64, quantity: u32) -> PortResult<Cart> {
        let user = self.store.find_user_by_username(username).await?;
        let item = self.store.find_item(item_id).await?;

        let mut cart = self.store.load_cart(user.cart_id).await?;
        cart.add(item, quantity);
        self.store.save_cart(&cart).await?;
        Ok(cart)
    }

    /// Removes up to `quantity` units of the item from the user's cart.
    /// Over-removal clamps the line to zero; the item must still exist in the
    /// catalog so a bogus id is reported as not found rather than ignored.
    pub async fn remove_from_cart(
        &self,
        username: &str,
        item_id: i64,
        quantity: u32,
    ) -> PortResult<Cart> {
        let user = self.store.find_user_by_username(username).await?;
        let item = self.store.find_item(item_id).await?;

        let mut cart = self.store.load_cart(user.cart_id).await?;
        cart.remove(item.id, quantity);
        self.store.save_cart(&cart).await?;
        Ok(cart)
    }
}
