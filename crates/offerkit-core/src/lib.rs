//! # offerkit-core: Pure Pricing Logic for OfferKit
//!
//! This crate is the **heart** of OfferKit. It contains the offer pricing
//! model as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OfferKit Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Front-ends (admin dashboard, customer portal)        │   │
//! │  │    Offer editor ──► Line item table ──► Totals ──► PDF export  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ REST API (external)                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    offerkit-dto (boundary)                      │   │
//! │  │    decode loosely-typed JSON ──► build mutation payloads        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ offerkit-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │ provision │  │  format   │  │   │
//! │  │   │   Offer   │  │  resolver │  │ defaults  │  │  display  │  │   │
//! │  │   │ LineItem  │  │  totals   │  │ DTO sync  │  │  strings  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO HIDDEN CLOCK • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Offer, OfferLineItem, QuantityPrice, UnitPrice)
//! - [`pricing`] - Active-price resolution and total computation
//! - [`provision`] - Unit-price row provisioning with an injectable clock
//! - [`format`] - Display formatting for prices and currency amounts
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Degrade, Never Throw**: malformed pricing data renders as `0`, because a
//!    thrown error would take a whole offer page down with it
//! 4. **Injectable Time**: the only wall-clock dependency flows through [`provision::Clock`]
//!
//! ## Example Usage
//!
//! ```rust
//! use offerkit_core::pricing::calculate_line_total;
//!
//! // The canonical quantity-tier total formula: quantity × price, 2 decimals
//! assert_eq!(calculate_line_total("1000", 0.35), 350.0);
//!
//! // Unparsable quantities degrade to zero instead of failing
//! assert_eq!(calculate_line_total("n/a", 0.35), 0.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod format;
pub mod pricing;
pub mod provision;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use offerkit_core::Offer` instead of
// `use offerkit_core::types::Offer`

pub use error::{CoreError, ValidationError};
pub use pricing::{
    calculate_line_item_total, calculate_line_total, calculate_offer_totals,
    calculate_unit_price_total, get_active_price, get_active_price_type,
};
pub use provision::{
    create_default_unit_prices, process_unit_prices_for_update, Clock, SystemClock,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Quantity breaks used when provisioning a fresh unit-price table.
///
/// ## Why these values?
/// Print-run quantities in this business cluster around 1k/5k/10k, so a new
/// line item starts with those three columns. Offers can add or replace
/// columns up to [`MAX_UNIT_PRICE_COLUMNS`].
pub const DEFAULT_UNIT_PRICE_QUANTITIES: [&str; 3] = ["1000", "5000", "10000"];

/// Default display precision for per-unit prices.
///
/// Unit prices are often fractions of a cent (e.g. 0.125 per label), so they
/// display with more precision than totals.
pub const DEFAULT_UNIT_PRICE_DECIMAL_PLACES: u32 = 3;

/// Default display precision for line and offer totals.
pub const DEFAULT_TOTAL_PRICE_DECIMAL_PLACES: u32 = 2;

/// Maximum number of unit-price columns an offer may display.
///
/// ## Business Reason
/// The offer PDF layout fits five quantity columns; more would overflow the
/// table. Enforced in validation, configurable per offer below this cap.
pub const MAX_UNIT_PRICE_COLUMNS: u32 = 5;

/// Upper bound for configurable decimal places.
///
/// ## Business Reason
/// Anything beyond 6 decimals is noise for monetary display and starts to
/// expose binary floating point artifacts in the UI.
pub const MAX_DECIMAL_PLACES: u32 = 6;
