//! # Boundary Error Types
//!
//! Error types for the data-transfer boundary.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Raw JSON with a hopeless shape (e.g. an offer that is a string)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DtoError (this module) ← names the entity and what was found          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller surfaces a toast / retries the fetch                           │
//! │                                                                         │
//! │  Malformed FIELDS never reach this module - they become defaults       │
//! │  plus a tracing warning inside `decode`.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Data-transfer boundary errors.
#[derive(Debug, Error)]
pub enum DtoError {
    /// The JSON root for an entity has the wrong shape entirely.
    ///
    /// ## When This Occurs
    /// - An offer endpoint returns a string or null instead of an object
    /// - A list endpoint returns an object instead of an array
    #[error("{entity}: expected {expected}, got {found}")]
    UnexpectedShape {
        entity: String,
        expected: String,
        found: String,
    },

    /// Validation of payload input failed (wraps the core error).
    #[error("validation error: {0}")]
    Validation(#[from] offerkit_core::ValidationError),

    /// Serializing an outbound payload failed.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DtoError {
    /// Creates an UnexpectedShape error from the offending value.
    pub fn unexpected_shape(
        entity: impl Into<String>,
        expected: impl Into<String>,
        value: &serde_json::Value,
    ) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "an array",
            serde_json::Value::Object(_) => "an object",
        };
        DtoError::UnexpectedShape {
            entity: entity.into(),
            expected: expected.into(),
            found: found.to_string(),
        }
    }
}

/// Result type for boundary operations.
pub type DtoResult<T> = Result<T, DtoError>;

// =============================================================================
// Unit Tests
// =============================================================================
