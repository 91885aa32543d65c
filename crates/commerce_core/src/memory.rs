//! crates/commerce_core/src/memory.rs
//!
//! A lock-protected in-memory implementation of the `StoreService` port.
//! This is the substitution fake used by the service unit tests and the
//! HTTP-level integration tests; it also works for local development without
//! a database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Cart, Item, Order, User, UserCredentials};
use crate::ports::{PortError, PortResult, StoreService};

#[derive(Default)]
struct Inner {
    users: Vec<StoredUser>,
    carts: HashMap<i64, Cart>,
    items: Vec<Item>,
    orders: Vec<(i64, Order)>,
    next_user_id: i64,
    next_cart_id: i64,
}

struct StoredUser {
    user: User,
    password_hash: String,
}

/// An in-memory `StoreService`. All state lives behind one mutex; no method
/// awaits while holding the lock, so the fake is as atomic as the
/// transactional Postgres adapter it stands in for.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the given catalog items.
    pub fn with_items(items: Vec<Item>) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().items = items;
        store
    }

    /// A store seeded with the two reference widgets the migrations insert.
    pub fn with_test_items() -> Self {
        Self::with_items(vec![
            Item {
                id: 1,
                name: "Round Widget".to_string(),
                price: Decimal::new(299, 2),
                description: "A widget that is round".to_string(),
            },
            Item {
                id: 2,
                name: "Square Widget".to_string(),
                price: Decimal::new(199, 2),
                description: "A widget that is square".to_string(),
            },
        ])
    }
}

#[async_trait]
impl StoreService for InMemoryStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> PortResult<User> {
        let mut inner = self.inner.lock().unwrap();

        if inner.users.iter().any(|u| u.user.username == username) {
            return Err(PortError::Validation(
                "The username already exists".to_string(),
            ));
        }

        inner.next_cart_id += 1;
        let cart_id = inner.next_cart_id;
        inner.carts.insert(cart_id, Cart::empty(cart_id));

        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            username: username.to_string(),
            cart_id,
        };
        inner.users.push(StoredUser {
            user: user.clone(),
            password_hash: password_hash.to_string(),
        });
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> PortResult<User> {
        self.inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.user.id == id)
            .map(|u| u.user.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", id)))
    }

    async fn find_user_by_username(&self, username: &str) -> PortResult<User> {
        self.inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.user.username == username)
            .map(|u| u.user.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", username)))
    }

    async fn credentials_for(&self, username: &str) -> PortResult<UserCredentials> {
        self.inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.user.username == username)
            .map(|u| UserCredentials {
                user_id: u.user.id,
                username: u.user.username.clone(),
                password_hash: u.password_hash.clone(),
            })
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", username)))
    }

    async fn list_items(&self) -> PortResult<Vec<Item>> {
        Ok(self.inner.lock().unwrap().items.clone())
    }

    async fn find_item(&self, id: i64) -> PortResult<Item> {
        self.inner
            .lock()
            .unwrap()
            .items
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Item {} not found", id)))
    }

    async fn find_items_by_name(&self, name: &str) -> PortResult<Vec<Item>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|i| i.name == name)
            .cloned()
            .collect())
    }

    async fn load_cart(&self, cart_id: i64) -> PortResult<Cart> {
        self.inner
            .lock()
            .unwrap()
            .carts
            .get(&cart_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Cart {} not found", cart_id)))
    }

    async fn save_cart(&self, cart: &Cart) -> PortResult<()> {
        self.inner.lock().unwrap().carts.insert(cart.id, cart.clone());
        Ok(())
    }

    async fn save_order_and_reset_cart(
        &self,
        user_id: i64,
        order: &Order,
        cart_id: i64,
    ) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.orders.push((user_id, order.clone()));
        inner.carts.insert(cart_id, Cart::empty(cart_id));
        Ok(())
    }

    async fn orders_for_user(&self, user_id: i64) -> PortResult<Vec<Order>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .orders
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, order)| order.clone())
            .collect())
    }
}
