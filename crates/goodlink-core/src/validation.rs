//! # Validation Module
//!
//! Input validation for record keys and simulator parameters.
//!
//! ## Usage
//! ```rust,no_run
//! use goodlink_core::validation::{validate_marketplace, validate_sku};
//!
//! validate_sku("GL-001").unwrap();
//! validate_marketplace("bol.com").unwrap();
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a SKU.
pub const MAX_SKU_LENGTH: usize = 50;

/// Maximum length of a marketplace name.
pub const MAX_MARKETPLACE_LENGTH: usize = 50;

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use goodlink_core::validation::validate_sku;
///
/// assert!(validate_sku("GL-001").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("GL 001").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > MAX_SKU_LENGTH {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LENGTH,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a marketplace name.
///
/// Marketplace names are free text ("bol.com", "eBay") but must be
/// non-empty and bounded.
pub fn validate_marketplace(marketplace: &str) -> ValidationResult<()> {
    let marketplace = marketplace.trim();

    if marketplace.is_empty() {
        return Err(ValidationError::Required {
            field: "marketplace".to_string(),
        });
    }

    if marketplace.len() > MAX_MARKETPLACE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "marketplace".to_string(),
            max: MAX_MARKETPLACE_LENGTH,
        });
    }

    Ok(())
}

/// Validates that a probability lies in `[0, 1]`.
pub fn validate_probability(field: &str, value: f64) -> ValidationResult<()> {
    if !(0.0..=1.0).contains(&value) || value.is_nan() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 1,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("GL-001").is_ok());
        assert!(validate_sku("GL_005").is_ok());
        assert!(matches!(
            validate_sku("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_sku(&"A".repeat(51)),
            Err(ValidationError::TooLong { max: 50, .. })
        ));
        assert!(matches!(
            validate_sku("GL/001"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_marketplace() {
        assert!(validate_marketplace("bol.com").is_ok());
        assert!(validate_marketplace("Amazon").is_ok());
        assert!(validate_marketplace("").is_err());
        assert!(validate_marketplace(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_probability() {
        assert!(validate_probability("p", 0.0).is_ok());
        assert!(validate_probability("p", 0.7).is_ok());
        assert!(validate_probability("p", 1.0).is_ok());
        assert!(validate_probability("p", 1.5).is_err());
        assert!(validate_probability("p", -0.1).is_err());
        assert!(validate_probability("p", f64::NAN).is_err());
    }
}
