//! crates/commerce_core/src/validate.rs
//!
//! Pure request validators: shape and business-rule checks on incoming
//! values, shared by the services.

use crate::ports::{PortError, PortResult};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 7;

/// Checks the password rules for a new account: at least
/// [`MIN_PASSWORD_LEN`] characters and an exact confirmation match.
pub fn check_new_password(password: &str, confirm: &str) -> PortResult<()> {
    if password.len() < MIN_PASSWORD_LEN || password != confirm {
        return Err(PortError::Validation(
            "Password must be at least 7 characters and match its confirmation".to_string(),
        ));
    }
    Ok(())
}

/// The most units of one item a single request may add or remove.
pub const MAX_LINE_QUANTITY: u32 = 10_000;

/// Checks that a requested cart quantity is non-negative and within
/// [`MAX_LINE_QUANTITY`].
pub fn check_quantity(quantity: i64) -> PortResult<u32> {
    let quantity = u32::try_from(quantity)
        .map_err(|_| PortError::Validation("Quantity must be non-negative".to_string()))?;
    if quantity > MAX_LINE_QUANTITY {
        return Err(PortError::Validation(format!(
            "Quantity must not exceed {}",
            MAX_LINE_QUANTITY
        )));
    }
    Ok(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_is_rejected_even_when_confirmed() {
        assert!(check_new_password("short1", "short1").is_err());
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        assert!(check_new_password("longenough", "long-enough").is_err());
    }

    #[test]
    fn seven_characters_and_matching_is_accepted() {
        assert!(check_new_password("secret1", "secret1").is_ok());
    }

    #[test]
    fn negative_quantity_is_rejected() {
        assert!(check_quantity(-1).is_err());
        assert_eq!(check_quantity(0).unwrap(), 0);
        assert_eq!(check_quantity(3).unwrap(), 3);
    }

    #[test]
    fn oversized_quantity_is_rejected() {
        assert_eq!(
            check_quantity(i64::from(MAX_LINE_QUANTITY)).unwrap(),
            MAX_LINE_QUANTITY
        );
        assert!(check_quantity(i64::from(MAX_LINE_QUANTITY) + 1).is_err());
        assert!(check_quantity(i64::from(u32::MAX)).is_err());
    }
}
