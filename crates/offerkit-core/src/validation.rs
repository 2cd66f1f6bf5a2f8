//! # Validation Module
//!
//! Input validation for offer editing.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front-end forms (TypeScript)                                 │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Checked before a mutation payload leaves the client               │
//! │  └── Typed errors, mapped to field-level form messages                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: The remote API                                               │
//! │  └── Authoritative server-side validation and persistence              │
//! │                                                                         │
//! │  Defense in depth: each layer catches what the previous one missed     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Read-side total computation never validates - it degrades. These checks
//! run on the write side only, before payloads are built.

use crate::error::{ValidationError, ValidationResult};
use crate::MAX_DECIMAL_PLACES;

// =============================================================================
// Identity Validators
// =============================================================================

/// Validates a server-assigned entity id (offer, line item).
///
/// ## Rules
/// - Must not be empty
/// - Must be a valid UUID
///
/// Client-generated unit-price placeholder ids are exempt; the server
/// re-assigns those on save.
pub fn validate_entity_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Validates a human-readable offer number.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
pub fn validate_offer_number(offer_number: &str) -> ValidationResult<()> {
    let offer_number = offer_number.trim();

    if offer_number.is_empty() {
        return Err(ValidationError::Required {
            field: "offer_number".to_string(),
        });
    }

    if offer_number.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "offer_number".to_string(),
            max: 50,
        });
    }

    if !offer_number
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "offer_number".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity string as editor input.
///
/// ## Rules
/// - Must not be empty
/// - Must parse as a finite, non-negative number
///
/// This is stricter than the read-side [`crate::pricing::parse_quantity`],
/// which silently maps bad input to zero: stored data degrades, but new
/// input gets rejected with a message.
pub fn validate_quantity_string(quantity: &str) -> ValidationResult<()> {
    let quantity = quantity.trim();

    if quantity.is_empty() {
        return Err(ValidationError::Required {
            field: "quantity".to_string(),
        });
    }

    match quantity.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(()),
        Ok(_) => Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        }),
        Err(_) => Err(ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: "must be a number".to_string(),
        }),
    }
}

/// Validates a price value.
///
/// ## Rules
/// - Must be finite (no NaN/Infinity)
/// - Must be non-negative; zero is allowed (free line items exist)
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "price".to_string(),
        });
    }

    if price < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a configured decimal-place count.
///
/// ## Rules
/// - Must be at most [`MAX_DECIMAL_PLACES`]
pub fn validate_decimal_places(decimal_places: u32) -> ValidationResult<()> {
    if decimal_places > MAX_DECIMAL_PLACES {
        return Err(ValidationError::OutOfRange {
            field: "decimal_places".to_string(),
            min: 0,
            max: MAX_DECIMAL_PLACES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Currency Validators
// =============================================================================

/// Validates an ISO 4217 currency code.
///
/// ## Rules
/// - Exactly 3 ASCII uppercase letters
///
/// This checks shape, not existence; the server owns the list of currencies
/// it actually quotes in.
pub fn validate_currency_code(currency: &str) -> ValidationResult<()> {
    if currency.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "currency".to_string(),
        });
    }

    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must be a 3-letter ISO 4217 code".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
