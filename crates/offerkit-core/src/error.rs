//! # Error Types
//!
//! Domain-specific error types for offerkit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  offerkit-core errors (this file)                                      │
//! │  ├── CoreError        - Mutation / domain rule failures                │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  offerkit-dto errors (separate crate)                                  │
//! │  └── DtoError         - Decode failures at the API boundary            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DtoError → caller                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, index, etc.)
//! 3. Errors are enum variants, never String
//!
//! Note the pricing and formatting functions themselves never return errors:
//! they degrade to `0` / `"0.00"` so that a malformed price can never take an
//! offer page down. Errors exist only at the mutation and validation edges.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule and mutation errors.
///
/// These should be caught by the caller and translated to user-facing
/// messages; they never occur during read-side total computation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A price-entry index passed to a set-active mutation does not exist.
    ///
    /// ## When This Occurs
    /// - UI sends a stale row index after the server replaced the price table
    /// - A unit-price column was removed while a click was in flight
    #[error("price entry index {index} out of range (collection has {len} entries)")]
    PriceEntryOutOfRange { index: usize, len: usize },

    /// A line item referenced by id is not part of the offer.
    #[error("line item not found: {0}")]
    LineItemNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller-supplied input doesn't meet requirements.
/// Used for early validation before a mutation payload is built.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Value must be a finite number (not NaN or infinity).
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Invalid format (e.g., invalid UUID, invalid currency code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
