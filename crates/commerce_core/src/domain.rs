//! crates/commerce_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Represents a registered user. Every user owns exactly one cart.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub cart_id: i64,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: i64,
    pub username: String,
    pub password_hash: String,
}

/// A purchasable item from the catalog. Read-only reference data.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub description: String,
}

/// One (item, quantity) pair within a cart.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item: Item,
    pub quantity: u32,
}

/// A user's shopping cart: an ordered collection of lines and a derived total.
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: i64,
    pub lines: Vec<CartLine>,
    pub total: Decimal,
}

impl Cart {
    /// An empty cart with the given persistence id.
    pub fn empty(id: i64) -> Self {
        Self {
            id,
            lines: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    /// Adds `quantity` units of `item`, merging with an existing line if one
    /// is present, then recomputes the total. A zero-quantity add leaves the
    /// cart unchanged; the cart never holds empty lines.
    pub fn add(&mut self, item: Item, quantity: u32) {
        match self.lines.iter_mut().find(|l| l.item.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine { item, quantity }),
        }
        self.lines.retain(|l| l.quantity > 0);
        self.recompute_total();
    }

    /// Removes up to `quantity` units of the item with `item_id`. Removal is
    /// clamped: a line never goes negative, and it is dropped entirely when
    /// its quantity reaches zero. Removing an item that is not in the cart is
    /// a no-op.
    pub fn remove(&mut self, item_id: i64, quantity: u32) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item.id == item_id) {
            line.quantity = line.quantity.saturating_sub(quantity);
        }
        self.lines.retain(|l| l.quantity > 0);
        self.recompute_total();
    }

    /// Recomputes `total` as the sum of unit price times quantity over all lines.
    fn recompute_total(&mut self) {
        self.total = self
            .lines
            .iter()
            .map(|l| l.item.price * Decimal::from(l.quantity))
            .sum();
    }
}

/// One line of an order snapshot. Carries the unit price as it was at
/// submission time, independent of later catalog changes.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub item_id: i64,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

/// An immutable snapshot of a cart taken when the user submits an order.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub username: String,
    pub lines: Vec<OrderLine>,
    pub total: Decimal,
    pub submitted_at: DateTime<Utc>,
}

impl Order {
    /// Snapshots the given cart into a new order for `username`.
    pub fn from_cart(username: &str, cart: &Cart) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            lines: cart
                .lines
                .iter()
                .map(|l| OrderLine {
                    item_id: l.item.id,
                    name: l.item.name.clone(),
                    unit_price: l.item.price,
                    quantity: l.quantity,
                })
                .collect(),
            total: cart.total,
            submitted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn widget(id: i64, price: &str) -> Item {
        Item {
            id,
            name: format!("Widget {}", id),
            price: price.parse().unwrap(),
            description: String::new(),
        }
    }

    #[test]
    fn add_merges_existing_line_and_recomputes_total() {
        let mut cart = Cart::empty(1);
        cart.add(widget(1, "2.99"), 2);
        cart.add(widget(1, "2.99"), 3);

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 5);
        assert_eq!(cart.total, "14.95".parse::<Decimal>().unwrap());
    }

    #[test]
    fn remove_restores_prior_total() {
        let mut cart = Cart::empty(1);
        cart.add(widget(1, "2.99"), 2);
        let before = cart.total;
        cart.add(widget(2, "1.99"), 4);
        cart.remove(2, 4);

        assert_eq!(cart.total, before);
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn over_removal_clamps_to_zero() {
        let mut cart = Cart::empty(1);
        cart.add(widget(1, "2.99"), 2);
        cart.remove(1, 10);

        assert!(cart.lines.is_empty());
        assert_eq!(cart.total, Decimal::ZERO);
    }

    #[test]
    fn repeated_adds_saturate_instead_of_overflowing() {
        let mut cart = Cart::empty(1);
        cart.add(widget(1, "0.01"), u32::MAX);
        cart.add(widget(1, "0.01"), 1);

        assert_eq!(cart.lines[0].quantity, u32::MAX);
        assert_eq!(
            cart.total,
            Decimal::new(1, 2) * Decimal::from(u32::MAX)
        );
    }

    #[test]
    fn removing_unknown_item_is_a_noop() {
        let mut cart = Cart::empty(1);
        cart.add(widget(1, "2.99"), 2);
        cart.remove(42, 1);

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.total, "5.98".parse::<Decimal>().unwrap());
    }

    #[test]
    fn order_snapshot_copies_lines_and_total() {
        let mut cart = Cart::empty(1);
        cart.add(widget(1, "2.99"), 2);
        cart.add(widget(2, "1.99"), 1);

        let order = Order::from_cart("alice", &cart);

        assert_eq!(order.username, "alice");
        assert_eq!(order.total, cart.total);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].unit_price, "2.99".parse().unwrap());

        // Mutating the cart afterwards must not touch the snapshot.
        cart.remove(1, 2);
        assert_eq!(order.lines.len(), 2);
    }
}
