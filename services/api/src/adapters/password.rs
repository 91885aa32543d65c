//! services/api/src/adapters/password.rs
//!
//! This module contains the adapter for password hashing. It implements the
//! `CredentialHasher` port from the `core` crate on top of Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use commerce_core::ports::{CredentialHasher, PortError, PortResult};

/// An adapter that implements the `CredentialHasher` port using Argon2.
#[derive(Clone, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> PortResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PortError::Unexpected(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hashed) else {
            return false;
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trips_and_rejects_wrong_password() {
        let hasher = Argon2Hasher;
        let hashed = hasher.hash("secret12").unwrap();

        assert!(hasher.verify("secret12", &hashed));
        assert!(!hasher.verify("secret13", &hashed));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = Argon2Hasher;
        assert_ne!(
            hasher.hash("secret12").unwrap(),
            hasher.hash("secret12").unwrap()
        );
    }

    #[test]
    fn garbage_stored_hash_never_verifies() {
        assert!(!Argon2Hasher.verify("secret12", "not-a-phc-string"));
    }
}
