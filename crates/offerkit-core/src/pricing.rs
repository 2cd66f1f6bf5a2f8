//! # Pricing Module
//!
//! Active-price resolution and total computation for offers.
//!
//! ## Resolution Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              How a line item's total is resolved                        │
//! │                                                                         │
//! │  use_unit_prices == true AND unit_prices non-empty?                    │
//! │       │                                                                 │
//! │       ├── yes ──► first is_active row ──► total_price (verbatim)       │
//! │       │              │                                                  │
//! │       │              └── none active ──► fallback chain                 │
//! │       │                                                                 │
//! │       └── no ───► quantity_prices non-empty?                           │
//! │                      │                                                  │
//! │                      ├── yes ──► first is_active tier ──► total        │
//! │                      │              │        (verbatim)                 │
//! │                      │              └── none active ──► fallback chain  │
//! │                      │                                                  │
//! │                      └── no ──► fallback chain                          │
//! │                                                                         │
//! │  fallback chain: base_price × base_quantity (if both present and the   │
//! │  quantity parses as a non-negative number), else 0                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two things are deliberate and load-bearing here:
//!
//! - **Stored totals are trusted verbatim.** An active entry's `total` /
//!   `total_price` is returned as stored, never recomputed from quantity and
//!   price. Re-derivation is an explicit write-side operation
//!   ([`crate::types::QuantityPrice::recompute_total`]).
//! - **Nothing in this module can fail.** Absent or malformed data degrades
//!   to `None` / `0.0`. Callers sum these totals while rendering; an error
//!   here would break the whole offer page instead of one cell.

use crate::types::{ActivePrice, ActivePriceType, OfferLineItem, OfferTotals};

// =============================================================================
// Numeric Helpers
// =============================================================================

/// Parses a quantity string as a float. Unparsable or empty input counts
/// as zero; so do non-finite values, which free-text input cannot
/// meaningfully produce.
pub fn parse_quantity(quantity: &str) -> f64 {
    match quantity.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Rounds to `decimal_places` using round-half-away-from-zero on the binary
/// representation, i.e. the fixed-point round-trip the front-ends apply.
///
/// ## Why round here at all?
/// Raw f64 multiplication leaks artifacts into stored totals
/// (`3 × 0.1 = 0.30000000000000004`). Rounding at the computation edge keeps
/// stored and displayed totals identical.
pub fn round_to_decimal_places(value: f64, decimal_places: u32) -> f64 {
    let factor = 10f64.powi(decimal_places as i32);
    (value * factor).round() / factor
}

// =============================================================================
// Active Price Resolver
// =============================================================================

/// Resolves the active price entry of a line item under the offer's pricing
/// mode.
///
/// ## Rules
/// - Unit mode with a non-empty `unit_prices` list: the first row with
///   `is_active` wins; if none is flagged the result is `None` - an
///   all-inactive unit list does **not** fall through to the tiers.
/// - Otherwise (quantity mode, or unit mode with no unit rows at all): the
///   first active tier of a non-empty `quantity_prices` list, else `None`.
/// - If several entries are erroneously flagged active, the first in
///   collection order wins. Writers prevent that state
///   ([`OfferLineItem::set_active_unit_price`]); reads just tolerate it.
///
/// Pure and deterministic; no side effects.
pub fn get_active_price(
    line_item: &OfferLineItem,
    offer_uses_unit_prices: bool,
) -> Option<ActivePrice<'_>> {
    if offer_uses_unit_prices && !line_item.unit_prices.is_empty() {
        return line_item
            .unit_prices
            .iter()
            .find(|row| row.is_active)
            .map(ActivePrice::Unit);
    }

    if !line_item.quantity_prices.is_empty() {
        return line_item
            .quantity_prices
            .iter()
            .find(|tier| tier.is_active)
            .map(ActivePrice::Quantity);
    }

    None
}

/// Same branching as [`get_active_price`], returning only the discriminant.
pub fn get_active_price_type(
    line_item: &OfferLineItem,
    offer_uses_unit_prices: bool,
) -> Option<ActivePriceType> {
    get_active_price(line_item, offer_uses_unit_prices).map(|active| active.price_type())
}

// =============================================================================
// Line Total Calculator
// =============================================================================

/// Computes a line item's monetary total under the offer's pricing mode.
///
/// The active entry's stored total is returned verbatim. Without an active
/// entry the fallback is `base_price × base_quantity` when both are present
/// and the quantity parses as a non-negative number, else `0.0`.
///
/// Never queries anything, never fails; callers rely on additive
/// aggregation over this function not being able to blow up.
pub fn calculate_line_item_total(line_item: &OfferLineItem, offer_uses_unit_prices: bool) -> f64 {
    if let Some(active) = get_active_price(line_item, offer_uses_unit_prices) {
        return active.total();
    }

    match (line_item.base_price, line_item.base_quantity.as_deref()) {
        (Some(base_price), Some(base_quantity)) => match base_quantity.trim().parse::<f64>() {
            Ok(quantity) if quantity.is_finite() && quantity >= 0.0 => base_price * quantity,
            _ => 0.0,
        },
        _ => 0.0,
    }
}

/// The canonical quantity-tier total formula: quantity × price, rounded to
/// exactly 2 decimals.
///
/// ```rust
/// use offerkit_core::pricing::calculate_line_total;
///
/// assert_eq!(calculate_line_total("3", 0.1), 0.3);   // not 0.30000000000000004
/// assert_eq!(calculate_line_total("", 9.99), 0.0);   // empty quantity
/// ```
pub fn calculate_line_total(quantity: &str, price: f64) -> f64 {
    round_to_decimal_places(parse_quantity(quantity) * price, 2)
}

/// The unit-price total formula: identical to [`calculate_line_total`] but
/// with caller-specified precision, because unit-price totals display with a
/// per-offer precision ([`crate::types::Offer::total_price_decimal_places`]).
pub fn calculate_unit_price_total(quantity: &str, unit_price: f64, decimal_places: u32) -> f64 {
    round_to_decimal_places(parse_quantity(quantity) * unit_price, decimal_places)
}

// =============================================================================
// Offer Aggregator
// =============================================================================

/// Sums line totals into an offer subtotal, in input order.
///
/// Plain IEEE-754 accumulation without drift compensation; totals are rounded
/// per line when stored, so the sum stays within display precision for any
/// realistic offer size. Discounts, shipping and tax are separate
/// server-owned fields and are not applied here.
pub fn calculate_offer_totals(
    line_items: &[OfferLineItem],
    offer_uses_unit_prices: bool,
) -> OfferTotals {
    let subtotal = line_items
        .iter()
        .map(|item| calculate_line_item_total(item, offer_uses_unit_prices))
        .sum();

    OfferTotals { subtotal }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{QuantityPrice, UnitPrice};
    use chrono::{TimeZone, Utc};

    fn tier(quantity: &str, price: f64, total: f64, active: bool) -> QuantityPrice {
        QuantityPrice {
            quantity: quantity.to_string(),
            price,
            is_active: active,
            total,
        }
    }

    fn unit_row(quantity: &str, unit_price: f64, total_price: f64, active: bool) -> UnitPrice {
        let stamp = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
        UnitPrice {
            id: format!("up-{quantity}"),
            quantity: quantity.to_string(),
            unit_price,
            total_price,
            is_active: active,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn bare_line_item() -> OfferLineItem {
        let stamp = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
        OfferLineItem {
            id: "li-1".to_string(),
            offer_id: "off-1".to_string(),
            name: "Flyer A5".to_string(),
            material: None,
            specification: None,
            dimensions: None,
            purchase_price: None,
            purchase_currency: None,
            quantity_prices: Vec::new(),
            unit_prices: Vec::new(),
            base_price: None,
            base_quantity: None,
            line_total: 0.0,
            active_price: None,
            active_price_type: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("1000"), 1000.0);
        assert_eq!(parse_quantity("  2.5 "), 2.5);
        assert_eq!(parse_quantity(""), 0.0);
        assert_eq!(parse_quantity("n/a"), 0.0);
        assert_eq!(parse_quantity("inf"), 0.0);
    }

    #[test]
    fn test_round_to_decimal_places() {
        assert_eq!(round_to_decimal_places(0.30000000000000004, 2), 0.3);
        assert_eq!(round_to_decimal_places(1.005, 2), 1.0); // 1.005 is 1.00499… in binary
        assert_eq!(round_to_decimal_places(2.675, 2), 2.67); // same story
        assert_eq!(round_to_decimal_places(-2.675, 2), -2.67);
        assert_eq!(round_to_decimal_places(125.0, 3), 125.0);
    }

    // -------------------------------------------------------------------------
    // Active price resolution
    // -------------------------------------------------------------------------

    #[test]
    fn test_unit_mode_prefers_unit_prices() {
        // Quantity tiers exist but are all inactive; one unit row is active.
        let mut item = bare_line_item();
        item.quantity_prices = vec![tier("1000", 0.35, 350.0, false)];
        item.unit_prices = vec![unit_row("1000", 0.25, 250.0, true)];

        let active = get_active_price(&item, true).unwrap();
        assert_eq!(active.price_type(), ActivePriceType::Unit);
        assert_eq!(active.total(), 250.0);
    }

    #[test]
    fn test_unit_mode_all_inactive_does_not_fall_through() {
        // A non-empty, all-inactive unit list resolves to nothing; it does
        // not borrow the active quantity tier.
        let mut item = bare_line_item();
        item.quantity_prices = vec![tier("1000", 0.35, 350.0, true)];
        item.unit_prices = vec![unit_row("1000", 0.25, 250.0, false)];

        assert!(get_active_price(&item, true).is_none());
        assert!(get_active_price_type(&item, true).is_none());
    }

    #[test]
    fn test_unit_mode_empty_unit_list_falls_back_to_tiers() {
        let mut item = bare_line_item();
        item.quantity_prices = vec![tier("1000", 0.35, 350.0, true)];

        let active = get_active_price(&item, true).unwrap();
        assert_eq!(active.price_type(), ActivePriceType::Quantity);
        assert_eq!(active.amount(), 0.35);
    }

    #[test]
    fn test_quantity_mode_ignores_unit_prices() {
        let mut item = bare_line_item();
        item.quantity_prices = vec![tier("1000", 0.35, 350.0, true)];
        item.unit_prices = vec![unit_row("500", 3.0, 1500.0, true)];

        let active = get_active_price(&item, false).unwrap();
        assert_eq!(active.price_type(), ActivePriceType::Quantity);
    }

    #[test]
    fn test_multi_active_first_wins() {
        // Erroneous multi-active data: collection order decides.
        let mut item = bare_line_item();
        item.quantity_prices = vec![
            tier("1000", 0.35, 350.0, true),
            tier("5000", 0.30, 1500.0, true),
        ];

        let active = get_active_price(&item, false).unwrap();
        assert_eq!(active.total(), 350.0);
    }

    #[test]
    fn test_empty_collections_resolve_to_none() {
        let item = bare_line_item();
        assert!(get_active_price(&item, false).is_none());
        assert!(get_active_price(&item, true).is_none());
    }

    // -------------------------------------------------------------------------
    // Line totals
    // -------------------------------------------------------------------------

    #[test]
    fn test_stored_total_is_trusted_verbatim() {
        // The stored total deliberately disagrees with quantity × price;
        // the calculator must return the stored value.
        let mut item = bare_line_item();
        item.quantity_prices = vec![tier("1000", 0.35, 340.0, true)];

        assert_eq!(calculate_line_item_total(&item, false), 340.0);
    }

    #[test]
    fn test_base_fallback() {
        let mut item = bare_line_item();
        item.base_price = Some(12.5);
        item.base_quantity = Some("4".to_string());

        // The fallback applies under either pricing mode.
        assert_eq!(calculate_line_item_total(&item, false), 50.0);
        assert_eq!(calculate_line_item_total(&item, true), 50.0);
    }

    #[test]
    fn test_base_fallback_rejects_bad_quantity() {
        let mut item = bare_line_item();
        item.base_price = Some(12.5);

        item.base_quantity = Some("four".to_string());
        assert_eq!(calculate_line_item_total(&item, false), 0.0);

        item.base_quantity = Some("-4".to_string());
        assert_eq!(calculate_line_item_total(&item, false), 0.0);

        item.base_quantity = None;
        assert_eq!(calculate_line_item_total(&item, false), 0.0);
    }

    #[test]
    fn test_line_total_rounding() {
        assert_eq!(calculate_line_total("3", 0.1), 0.3);
        assert_eq!(calculate_line_total("1000", 0.35), 350.0);
        assert_eq!(calculate_line_total("bogus", 9.99), 0.0);
    }

    #[test]
    fn test_unit_price_total_precision() {
        assert_eq!(calculate_unit_price_total("1000", 0.125, 3), 125.0);
        assert_eq!(calculate_unit_price_total("3", 0.1, 2), 0.3);
        // Higher precision keeps more digits
        assert_eq!(calculate_unit_price_total("7", 0.0011, 4), 0.0077);
    }

    // -------------------------------------------------------------------------
    // Offer aggregation
    // -------------------------------------------------------------------------

    #[test]
    fn test_offer_subtotal_quantity_mode() {
        // Item 1 has an active tier; item 2 only has an active *unit* row,
        // which quantity mode must ignore - without a base fallback it
        // contributes nothing.
        let mut item1 = bare_line_item();
        item1.quantity_prices = vec![tier("10", 2.0, 20.0, true)];

        let mut item2 = bare_line_item();
        item2.id = "li-2".to_string();
        item2.unit_prices = vec![unit_row("5", 3.0, 15.0, true)];

        let totals = calculate_offer_totals(&[item1, item2], false);
        assert_eq!(totals.subtotal, 20.0);
    }

    #[test]
    fn test_offer_subtotal_unit_mode() {
        let mut item1 = bare_line_item();
        item1.unit_prices = vec![unit_row("1000", 0.25, 250.0, true)];

        let mut item2 = bare_line_item();
        item2.id = "li-2".to_string();
        item2.unit_prices = vec![unit_row("5000", 0.2, 1000.0, true)];

        let totals = calculate_offer_totals(&[item1, item2], true);
        assert_eq!(totals.subtotal, 1250.0);
    }

    #[test]
    fn test_offer_subtotal_empty() {
        assert_eq!(calculate_offer_totals(&[], false).subtotal, 0.0);
        assert_eq!(calculate_offer_totals(&[], true).subtotal, 0.0);
    }

    #[test]
    fn test_offer_subtotal_mixes_fallbacks() {
        let mut item1 = bare_line_item();
        item1.quantity_prices = vec![tier("10", 2.0, 20.0, true)];

        let mut item2 = bare_line_item();
        item2.id = "li-2".to_string();
        item2.base_price = Some(5.0);
        item2.base_quantity = Some("3".to_string());

        let totals = calculate_offer_totals(&[item1, item2], false);
        assert_eq!(totals.subtotal, 35.0);
    }
}
