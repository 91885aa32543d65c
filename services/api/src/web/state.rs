//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use commerce_core::accounts::Accounts;
use commerce_core::cart::CartManager;
use commerce_core::orders::Orders;
use commerce_core::ports::{CredentialHasher, StoreService};

use crate::web::auth::TokenKeys;

/// The shared application state, created once at startup and passed to all
/// handlers. The core services receive their collaborators here, so tests can
/// assemble the same state over the in-memory store.
pub struct AppState {
    pub store: Arc<dyn StoreService>,
    pub accounts: Accounts,
    pub cart: CartManager,
    pub orders: Orders,
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(
        store: Arc<dyn StoreService>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: TokenKeys,
    ) -> Self {
        Self {
            accounts: Accounts::new(store.clone(), hasher),
            cart: CartManager::new(store.clone()),
            orders: Orders::new(store.clone()),
            store,
            tokens,
        }
    }
}
