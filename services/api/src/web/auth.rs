//! services/api/src/web/auth.rs
//!
//! Bearer-token issue and verification. Tokens are signed JWTs carrying the
//! username as subject and a fixed expiry; the signing secret and TTL are
//! constructor arguments, never globals, so tests can use their own keys.

use chrono::{Duration, Utc};
use commerce_core::ports::{PortError, PortResult};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// The claims embedded in a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The username the token asserts.
    pub sub: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Issues and verifies bearer tokens with a process-wide HMAC secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Signs a token asserting `username`, valid for the configured TTL.
    pub fn issue(&self, username: &str) -> PortResult<String> {
        let claims = Claims {
            sub: username.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding)
            .map_err(|e| PortError::Unexpected(format!("Failed to sign token: {}", e)))
    }

    /// Returns the embedded username if the signature and expiry check out.
    /// The claim is not re-checked against the user directory; existence
    /// checks happen at the handler level.
    pub fn verify(&self, token: &str) -> Option<String> {
        let validation = Validation::new(Algorithm::HS512);
        decode::<Claims>(token, &self.decoding, &validation)
            .ok()
            .map(|data| data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_to_the_same_username() {
        let keys = TokenKeys::new("test-secret-material", 1);
        let token = keys.issue("alice").unwrap();
        assert_eq!(keys.verify(&token).as_deref(), Some("alice"));
    }

    #[test]
    fn expired_token_fails_verification() {
        // A negative TTL puts the expiry a full hour in the past, well beyond
        // any clock-skew leeway.
        let keys = TokenKeys::new("test-secret-material", -1);
        let token = keys.issue("alice").unwrap();
        assert_eq!(keys.verify(&token), None);
    }

    #[test]
    fn token_signed_with_a_different_key_fails_verification() {
        let signer = TokenKeys::new("one-secret", 1);
        let verifier = TokenKeys::new("another-secret", 1);
        let token = signer.issue("alice").unwrap();
        assert_eq!(verifier.verify(&token), None);
    }

    #[test]
    fn garbage_token_fails_verification() {
        let keys = TokenKeys::new("test-secret-material", 1);
        assert_eq!(keys.verify("not.a.jwt"), None);
    }
}
