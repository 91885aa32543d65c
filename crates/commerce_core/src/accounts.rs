//! crates/commerce_core/src/accounts.rs
//!
//! The user directory: account creation with its validation rules, lookups,
//! and credential checks for login.

use std::sync::Arc;

use crate::domain::User;
use crate::ports::{CredentialHasher, PortError, PortResult, StoreService};
use crate::validate::check_new_password;

/// Creates and resolves user accounts. Collaborators are injected so tests
/// can substitute the in-memory store and a trivial hasher.
pub struct Accounts {
    store: Arc<dyn StoreService>,
    hasher: Arc<dyn CredentialHasher>,
}

impl Accounts {
    pub fn new(store: Arc<dyn StoreService>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    /// Registers a new user. Rejects a taken username, a password shorter
    /// than seven characters, or a mismatched confirmation; otherwise the
    /// store creates the user together with its empty cart.
    pub async fn create(&self, username: &str, password: &str, confirm: &str) -> PortResult<User> {
        match self.store.find_user_by_username(username).await {
            Ok(_) => {
                return Err(PortError::Validation(
                    "The username already exists".to_string(),
                ))
            }
            Err(PortError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        check_new_password(password, confirm)?;

        let password_hash = self.hasher.hash(password)?;
        self.store.create_user(username, &password_hash).await
    }

    pub async fn find_by_id(&self, id: i64) -> PortResult<User> {
        self.store.find_user_by_id(id).await
    }

    pub async fn find_by_username(&self, username: &str) -> PortResult<User> {
        self.store.find_user_by_username(username).await
    }

    /// Verifies a username/password pair. Both an unknown username and a bad
    /// password surface as the same `Validation` error so that login does not
    /// leak which usernames exist.
    pub async fn login(&self, username: &str, password: &str) -> PortResult<User> {
        let invalid = || PortError::Validation("Invalid username or password".to_string());

        let creds = self
            .store
            .credentials_for(username)
            .await
            .map_err(|_| invalid())?;

        if !self.hasher.verify(password, &creds.password_hash) {
            return Err(invalid());
        }

        self.store.find_user_by_username(username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;

    /// A transparent stand-in for the real hasher so account tests do not pay
    /// for an adaptive hash.
    struct PlainHasher;

    impl CredentialHasher for PlainHasher {
        fn hash(&self, plaintext: &str) -> PortResult<String> {
            Ok(format!("plain:{}", plaintext))
        }

        fn verify(&self, plaintext: &str, hashed: &str) -> bool {
            hashed == format!("plain:{}", plaintext)
        }
    }

    fn accounts() -> Accounts {
        Accounts::new(Arc::new(InMemoryStore::new()), Arc::new(PlainHasher))
    }

    #[tokio::test]
    async fn create_then_duplicate_is_rejected() {
        let accounts = accounts();

        let user = accounts.create("alice", "secret12", "secret12").await.unwrap();
        assert_eq!(user.username, "alice");

        let err = accounts.create("alice", "other123", "other123").await;
        assert!(matches!(err, Err(PortError::Validation(_))));
    }

    #[tokio::test]
    async fn weak_password_is_rejected() {
        let err = accounts().create("bob", "short", "short").await;
        assert!(matches!(err, Err(PortError::Validation(_))));
    }

    #[tokio::test]
    async fn mismatched_confirmation_is_rejected() {
        let err = accounts().create("bob", "secret12", "secret13").await;
        assert!(matches!(err, Err(PortError::Validation(_))));
    }

    #[tokio::test]
    async fn created_user_owns_an_empty_cart() {
        let store = Arc::new(InMemoryStore::new());
        let accounts = Accounts::new(store.clone(), Arc::new(PlainHasher));

        let user = accounts.create("alice", "secret12", "secret12").await.unwrap();
        let cart = store.load_cart(user.cart_id).await.unwrap();

        assert!(cart.lines.is_empty());
        assert_eq!(cart.total, rust_decimal::Decimal::ZERO);
    }

    #[tokio::test]
    async fn login_verifies_the_stored_hash() {
        let accounts = accounts();
        accounts.create("alice", "secret12", "secret12").await.unwrap();

        assert!(accounts.login("alice", "secret12").await.is_ok());
        assert!(accounts.login("alice", "wrong-pass").await.is_err());
        assert!(accounts.login("nobody", "secret12").await.is_err());
    }
}
