//! crates/commerce_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or
//! password-hashing libraries.

use async_trait::async_trait;

use crate::domain::{Cart, Item, Order, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// A business-rule violation on otherwise well-formed input.
    #[error("{0}")]
    Validation(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The persistence boundary. One method per use-case-level read or write so an
/// adapter with transactional storage can make the multi-step writes atomic.
#[async_trait]
pub trait StoreService: Send + Sync {
    // --- User Management ---

    /// Creates an empty cart and a user owning it. Both writes must land
    /// together (the Postgres adapter wraps them in one transaction). Fails
    /// with `Validation` if the username is already taken.
    async fn create_user(&self, username: &str, password_hash: &str) -> PortResult<User>;

    async fn find_user_by_id(&self, id: i64) -> PortResult<User>;

    async fn find_user_by_username(&self, username: &str) -> PortResult<User>;

    /// Looks up the stored credentials for login. Never exposed over the API.
    async fn credentials_for(&self, username: &str) -> PortResult<UserCredentials>;

    // --- Item Catalog (read-only) ---

    async fn list_items(&self) -> PortResult<Vec<Item>>;

    async fn find_item(&self, id: i64) -> PortResult<Item>;

    /// Exact-match name lookup. An empty vec means no item matched.
    async fn find_items_by_name(&self, name: &str) -> PortResult<Vec<Item>>;

    // --- Cart Persistence ---

    async fn load_cart(&self, cart_id: i64) -> PortResult<Cart>;

    async fn save_cart(&self, cart: &Cart) -> PortResult<()>;

    // --- Orders ---

    /// Persists the order snapshot and resets the cart to empty in a single
    /// atomic step.
    async fn save_order_and_reset_cart(
        &self,
        user_id: i64,
        order: &Order,
        cart_id: i64,
    ) -> PortResult<()>;

    /// All orders ever submitted by the user, in submission order.
    async fn orders_for_user(&self, user_id: i64) -> PortResult<Vec<Order>>;
}

/// Wraps an adaptive one-way hash used to store and verify passwords.
pub trait CredentialHasher: Send + Sync {
    /// Hashes a plaintext password. Salted, so the output differs per call.
    fn hash(&self, plaintext: &str) -> PortResult<String>;

    /// True iff `plaintext` hashes to `hashed` under the same scheme.
    fn verify(&self, plaintext: &str, hashed: &str) -> bool;
}
