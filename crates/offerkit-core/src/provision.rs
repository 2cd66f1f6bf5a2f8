//! # Provisioning Module
//!
//! Creates and normalizes unit-price rows.
//!
//! Two entry points cover the two editor flows:
//!
//! - [`create_default_unit_prices`] - a line item is switched to unit
//!   pricing for the first time and needs an empty three-column table.
//! - [`process_unit_prices_for_update`] - the editor submits edited rows as
//!   [`UnitPriceDto`]s and they are normalized back into [`UnitPrice`] rows
//!   before being sent to the server.
//!
//! ## Injectable Time
//! Row ids and timestamps are the only wall-clock dependency in the whole
//! crate, so both functions take a [`Clock`]. Production callers pass
//! [`SystemClock`]; tests pass a fixed clock and get bit-identical output.

use chrono::{DateTime, Utc};

use crate::pricing::{parse_quantity, round_to_decimal_places};
use crate::types::{UnitPrice, UnitPriceDto};

// =============================================================================
// Clock
// =============================================================================

/// Source of "now" for provisioning.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The production clock: reads the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// =============================================================================
// Row Identifiers
// =============================================================================

/// Placeholder id for a default-provisioned row at `index`.
///
/// These ids are client-suggested; the server re-assigns real ids on save,
/// so positional encoding is enough.
fn default_unit_price_id(index: usize) -> String {
    format!("unit-price-default-{index}")
}

/// Placeholder id for a normalized row at `index`, salted with the current
/// time. Uniqueness is best-effort, not guaranteed - acceptable because the
/// server may re-assign these ids anyway.
fn generated_unit_price_id(index: usize, now: DateTime<Utc>) -> String {
    format!("unit-price-{index}-{}", now.timestamp_millis())
}

// =============================================================================
// Default Provisioner
// =============================================================================

/// Emits a fresh unit-price table for the given quantity columns.
///
/// Every row starts at zero; only the first row is active, so a non-empty
/// result always has exactly one active row and an empty input yields none.
/// The whole batch shares a single timestamp captured once up front.
///
/// The conventional argument is [`crate::DEFAULT_UNIT_PRICE_QUANTITIES`]:
///
/// ```rust
/// use offerkit_core::provision::{create_default_unit_prices, SystemClock};
/// use offerkit_core::DEFAULT_UNIT_PRICE_QUANTITIES;
///
/// let rows = create_default_unit_prices(&DEFAULT_UNIT_PRICE_QUANTITIES, &SystemClock);
/// assert_eq!(rows.len(), 3);
/// assert!(rows[0].is_active);
/// ```
pub fn create_default_unit_prices(quantities: &[&str], clock: &impl Clock) -> Vec<UnitPrice> {
    let stamp = clock.now();

    quantities
        .iter()
        .enumerate()
        .map(|(index, quantity)| UnitPrice {
            id: default_unit_price_id(index),
            quantity: quantity.to_string(),
            unit_price: 0.0,
            total_price: 0.0,
            is_active: index == 0,
            created_at: stamp,
            updated_at: stamp,
        })
        .collect()
}

// =============================================================================
// Update Normalizer
// =============================================================================

/// Normalizes editor-submitted rows into [`UnitPrice`] values.
///
/// Per DTO, in input order:
/// - `total_price` is taken as supplied, or re-derived as
///   quantity × unit price rounded to `total_price_decimal_places`
/// - `is_active` is taken as supplied, or defaults to true for the first row
/// - `id` is taken as supplied, or generated from the index and current time
///
/// The DTO's `quantity` string is carried onto the row verbatim; parsing is
/// only for total derivation, so the user's original input survives the
/// round trip.
///
/// Note: every row gets its own `created_at`/`updated_at` stamp here,
/// whereas [`create_default_unit_prices`] shares one stamp across the batch.
/// The mismatch is intentional pending a product decision; do not unify.
pub fn process_unit_prices_for_update(
    dtos: &[UnitPriceDto],
    total_price_decimal_places: u32,
    clock: &impl Clock,
) -> Vec<UnitPrice> {
    dtos.iter()
        .enumerate()
        .map(|(index, dto)| {
            let quantity = parse_quantity(&dto.quantity);
            let unit_price = parse_quantity(&dto.unit_price);
            let now = clock.now();

            UnitPrice {
                id: dto
                    .id
                    .clone()
                    .unwrap_or_else(|| generated_unit_price_id(index, now)),
                quantity: dto.quantity.clone(),
                unit_price,
                total_price: dto.total_price.unwrap_or_else(|| {
                    round_to_decimal_places(quantity * unit_price, total_price_decimal_places)
                }),
                is_active: dto.is_active.unwrap_or(index == 0),
                created_at: now,
                updated_at: now,
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
