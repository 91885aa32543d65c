//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `StoreService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use commerce_core::domain::{Cart, CartLine, Item, Order, OrderLine, User, UserCredentials};
use commerce_core::ports::{PortError, PortResult, StoreService};
use rust_decimal::Decimal;
use sqlx::error::ErrorKind;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `StoreService` port.
#[derive(Clone)]
pub struct DbStore {
    pool: PgPool,
}

impl DbStore {
    /// Creates a new `DbStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found_or(e: sqlx::Error, what: String) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what),
        _ => unexpected(e),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    username: String,
    cart_id: i64,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            username: self.username,
            cart_id: self.cart_id,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: i64,
    username: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.id,
            username: self.username,
            password_hash: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct ItemRecord {
    id: i64,
    name: String,
    price: Decimal,
    description: String,
}
impl ItemRecord {
    fn to_domain(self) -> Item {
        Item {
            id: self.id,
            name: self.name,
            price: self.price,
            description: self.description,
        }
    }
}

#[derive(FromRow)]
struct CartLineRecord {
    item_id: i64,
    name: String,
    price: Decimal,
    description: String,
    quantity: i32,
}
impl CartLineRecord {
    fn to_domain(self) -> CartLine {
        CartLine {
            item: Item {
                id: self.item_id,
                name: self.name,
                price: self.price,
                description: self.description,
            },
            quantity: self.quantity as u32,
        }
    }
}

#[derive(FromRow)]
struct OrderRecord {
    id: Uuid,
    username: String,
    total: Decimal,
    submitted_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct OrderLineRecord {
    item_id: i64,
    name: String,
    unit_price: Decimal,
    quantity: i32,
}
impl OrderLineRecord {
    fn to_domain(self) -> OrderLine {
        OrderLine {
            item_id: self.item_id,
            name: self.name,
            unit_price: self.unit_price,
            quantity: self.quantity as u32,
        }
    }
}

//=========================================================================================
// `StoreService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StoreService for DbStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> PortResult<User> {
        // Cart first, then the user referencing it. One transaction, so a
        // failed user insert can never leave an orphan cart behind.
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let (cart_id,): (i64,) =
            sqlx::query_as("INSERT INTO carts (total) VALUES (0) RETURNING id")
                .fetch_one(&mut *tx)
                .await
                .map_err(unexpected)?;

        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (username, password_hash, cart_id) VALUES ($1, $2, $3) \
             RETURNING id, username, cart_id",
        )
        .bind(username)
        .bind(password_hash)
        .bind(cart_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if matches!(db.kind(), ErrorKind::UniqueViolation) => {
                PortError::Validation("The username already exists".to_string())
            }
            _ => unexpected(e),
        })?;

        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn find_user_by_id(&self, id: i64) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, cart_id FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("User {} not found", id)))?;
        Ok(record.to_domain())
    }

    async fn find_user_by_username(&self, username: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, cart_id FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("User {} not found", username)))?;
        Ok(record.to_domain())
    }

    async fn credentials_for(&self, username: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("User {} not found", username)))?;
        Ok(record.to_domain())
    }

    async fn list_items(&self) -> PortResult<Vec<Item>> {
        let records = sqlx::query_as::<_, ItemRecord>(
            "SELECT id, name, price, description FROM items ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(ItemRecord::to_domain).collect())
    }

    async fn find_item(&self, id: i64) -> PortResult<Item> {
        let record = sqlx::query_as::<_, ItemRecord>(
            "SELECT id, name, price, description FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("Item {} not found", id)))?;
        Ok(record.to_domain())
    }

    async fn find_items_by_name(&self, name: &str) -> PortResult<Vec<Item>> {
        let records = sqlx::query_as::<_, ItemRecord>(
            "SELECT id, name, price, description FROM items WHERE name = $1 ORDER BY id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(ItemRecord::to_domain).collect())
    }

    async fn load_cart(&self, cart_id: i64) -> PortResult<Cart> {
        let (total,): (Decimal,) = sqlx::query_as("SELECT total FROM carts WHERE id = $1")
            .bind(cart_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| not_found_or(e, format!("Cart {} not found", cart_id)))?;

        let lines = sqlx::query_as::<_, CartLineRecord>(
            "SELECT ci.item_id, i.name, i.price, i.description, ci.quantity \
             FROM cart_items ci JOIN items i ON i.id = ci.item_id \
             WHERE ci.cart_id = $1 ORDER BY ci.item_id",
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(Cart {
            id: cart_id,
            lines: lines.into_iter().map(CartLineRecord::to_domain).collect(),
            total,
        })
    }

    async fn save_cart(&self, cart: &Cart) -> PortResult<()> {
        // Rewrite the lines wholesale; carts are small and this keeps the
        // stored state exactly equal to the domain value.
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart.id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        for line in &cart.lines {
            sqlx::query(
                "INSERT INTO cart_items (cart_id, item_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(cart.id)
            .bind(line.item.id)
            .bind(line.quantity as i32)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }

        sqlx::query("UPDATE carts SET total = $1 WHERE id = $2")
            .bind(cart.total)
            .bind(cart.id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    async fn save_order_and_reset_cart(
        &self,
        user_id: i64,
        order: &Order,
        cart_id: i64,
    ) -> PortResult<()> {
        // Snapshot and reset must land together; a crash in between would
        // otherwise double-charge the next submission.
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query(
            "INSERT INTO orders (id, user_id, total, submitted_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(order.id)
        .bind(user_id)
        .bind(order.total)
        .bind(order.submitted_at)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        for line in &order.lines {
            sqlx::query(
                "INSERT INTO order_items (order_id, item_id, name, unit_price, quantity) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(order.id)
            .bind(line.item_id)
            .bind(&line.name)
            .bind(line.unit_price)
            .bind(line.quantity as i32)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        sqlx::query("UPDATE carts SET total = 0 WHERE id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    async fn orders_for_user(&self, user_id: i64) -> PortResult<Vec<Order>> {
        let records = sqlx::query_as::<_, OrderRecord>(
            "SELECT o.id, u.username, o.total, o.submitted_at \
             FROM orders o JOIN users u ON u.id = o.user_id \
             WHERE o.user_id = $1 ORDER BY o.submitted_at, o.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let mut orders = Vec::with_capacity(records.len());
        for record in records {
            let lines = sqlx::query_as::<_, OrderLineRecord>(
                "SELECT item_id, name, unit_price, quantity FROM order_items \
                 WHERE order_id = $1 ORDER BY item_id",
            )
            .bind(record.id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

            orders.push(Order {
                id: record.id,
                username: record.username,
                lines: lines.into_iter().map(OrderLineRecord::to_domain).collect(),
                total: record.total,
                submitted_at: record.submitted_at,
            });
        }
        Ok(orders)
    }
}
