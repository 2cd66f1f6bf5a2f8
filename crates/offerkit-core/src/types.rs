//! # Domain Types
//!
//! Core domain types for the offer pricing model.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐      ┌─────────────────┐                          │
//! │  │     Offer       │ 1..n │  OfferLineItem  │                          │
//! │  │  ─────────────  │─────►│  ─────────────  │                          │
//! │  │  offer_number   │      │  name/material  │                          │
//! │  │  use_unit_prices│      │  base_price     │                          │
//! │  │  subtotal       │      │  line_total     │                          │
//! │  └─────────────────┘      └────────┬────────┘                          │
//! │                                    │ carries BOTH                       │
//! │                   ┌────────────────┴────────────────┐                  │
//! │                   ▼                                 ▼                  │
//! │  ┌─────────────────────┐           ┌─────────────────────┐             │
//! │  │  QuantityPrice[]    │           │  UnitPrice[]        │             │
//! │  │  tier per quantity  │           │  qty/unit/total row │             │
//! │  │  one is_active max  │           │  one is_active max  │             │
//! │  └─────────────────────┘           └─────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every line item carries *two parallel* pricing representations, and the
//! offer-level `use_unit_prices` flag decides which one drives the totals.
//! Both are kept populated so an offer can be flipped between the two modes
//! without losing data.
//!
//! ## Dual-Key Identity Pattern
//! Entities have:
//! - `id`: UUID v4 assigned by the server - immutable, used for API calls
//! - Business ID: (`offer_number`) - human-readable, shown on the PDF
//!
//! Unit-price rows are the exception: their ids may be client-suggested
//! placeholder strings which the server is free to re-assign.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::pricing;

// =============================================================================
// Active Price Type
// =============================================================================

/// Which pricing collection the active price of a line item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ActivePriceType {
    /// The active entry is a [`UnitPrice`] row.
    Unit,
    /// The active entry is a [`QuantityPrice`] tier.
    Quantity,
}

// =============================================================================
// Quantity Price
// =============================================================================

/// A quantity-tier price: "at quantity 5000, the piece price is X".
///
/// The quantity is kept as a string because it arrives as free text from the
/// offer editor ("1000", "5.000", "ca. 1000"); parsing happens at total
/// computation time and unparsable input counts as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuantityPrice {
    /// Quantity break this tier applies to.
    pub quantity: String,

    /// Piece price at this quantity.
    pub price: f64,

    /// Whether this tier is the selected one for its line item.
    pub is_active: bool,

    /// Stored tier total. Expected to equal `quantity × price` rounded to
    /// 2 decimals, but it is *stored*, not implicitly recomputed - call
    /// [`QuantityPrice::recompute_total`] after changing quantity or price.
    pub total: f64,
}

impl QuantityPrice {
    /// Re-derives `total` from the current quantity and price.
    pub fn recompute_total(&mut self) {
        self.total = pricing::calculate_line_total(&self.quantity, self.price);
    }
}

// =============================================================================
// Unit Price
// =============================================================================

/// A unit-price row: parallel quantity / per-unit price / total columns.
///
/// Unlike [`QuantityPrice`] tiers these are rows with a lifecycle (added,
/// replaced, synced back to the server), so they carry an id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UnitPrice {
    /// Row identifier. Client-generated rows use placeholder ids which the
    /// server may re-assign on save.
    pub id: String,

    /// Quantity for this row, as entered.
    pub quantity: String,

    /// Price per unit. Often a fraction of a cent, hence the higher display
    /// precision than totals.
    pub unit_price: f64,

    /// Stored row total. Trusted verbatim by total computation; call
    /// [`UnitPrice::recompute_total`] after changing quantity or unit price.
    pub total_price: f64,

    /// Whether this row is the selected one for its line item.
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl UnitPrice {
    /// Re-derives `total_price` from the current quantity and unit price.
    pub fn recompute_total(&mut self, decimal_places: u32) {
        self.total_price =
            pricing::calculate_unit_price_total(&self.quantity, self.unit_price, decimal_places);
    }
}

// =============================================================================
// Active Price (resolver result)
// =============================================================================

/// The resolved active price of a line item: either a quantity tier or a
/// unit-price row, borrowed from the line item's collections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivePrice<'a> {
    Quantity(&'a QuantityPrice),
    Unit(&'a UnitPrice),
}

impl<'a> ActivePrice<'a> {
    /// The per-piece amount of the active entry.
    #[inline]
    pub fn amount(&self) -> f64 {
        match self {
            ActivePrice::Quantity(q) => q.price,
            ActivePrice::Unit(u) => u.unit_price,
        }
    }

    /// The stored total of the active entry, taken verbatim.
    #[inline]
    pub fn total(&self) -> f64 {
        match self {
            ActivePrice::Quantity(q) => q.total,
            ActivePrice::Unit(u) => u.total_price,
        }
    }

    /// Which collection the entry came from.
    #[inline]
    pub fn price_type(&self) -> ActivePriceType {
        match self {
            ActivePrice::Quantity(_) => ActivePriceType::Quantity,
            ActivePrice::Unit(_) => ActivePriceType::Unit,
        }
    }
}

// =============================================================================
// Offer Line Item
// =============================================================================

/// One purchasable line within an offer (a product/material/spec combination).
///
/// Invariant: at most one entry in each pricing collection has
/// `is_active == true`. Reads tolerate violations (first entry wins), but all
/// writes must go through [`OfferLineItem::set_active_quantity_price`] /
/// [`OfferLineItem::set_active_unit_price`], which clear the siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OfferLineItem {
    /// Unique identifier (UUID v4, server-assigned).
    pub id: String,

    /// Offer this line item belongs to.
    pub offer_id: String,

    /// Display name shown in the offer table and on the PDF.
    pub name: String,

    /// Material description (e.g. "80g offset paper").
    pub material: Option<String>,

    /// Technical specification free text.
    pub specification: Option<String>,

    /// Dimensions free text (e.g. "210 × 297 mm").
    pub dimensions: Option<String>,

    /// Purchase price for margin display.
    pub purchase_price: Option<f64>,

    /// Currency of the purchase price (ISO 4217 code).
    pub purchase_currency: Option<String>,

    /// Quantity-tier pricing representation.
    pub quantity_prices: Vec<QuantityPrice>,

    /// Unit-price pricing representation.
    pub unit_prices: Vec<UnitPrice>,

    /// Last-resort fallback price when neither collection has an active entry.
    pub base_price: Option<f64>,

    /// Last-resort fallback quantity, as entered.
    pub base_quantity: Option<String>,

    /// Cached line total for display. Derived; see [`OfferLineItem::refresh_derived`].
    pub line_total: f64,

    /// Cached per-piece amount of the active entry. Derived.
    pub active_price: Option<f64>,

    /// Cached discriminant of the active entry. Derived.
    pub active_price_type: Option<ActivePriceType>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl OfferLineItem {
    /// Marks the quantity tier at `index` active and clears all siblings.
    ///
    /// This is the only sanctioned way to change tier selection; writing
    /// `is_active` directly can produce the ambiguous multi-active state
    /// that reads only tolerate, never create.
    pub fn set_active_quantity_price(&mut self, index: usize) -> CoreResult<()> {
        if index >= self.quantity_prices.len() {
            return Err(CoreError::PriceEntryOutOfRange {
                index,
                len: self.quantity_prices.len(),
            });
        }
        for (i, tier) in self.quantity_prices.iter_mut().enumerate() {
            tier.is_active = i == index;
        }
        Ok(())
    }

    /// Marks the unit-price row at `index` active and clears all siblings.
    pub fn set_active_unit_price(&mut self, index: usize) -> CoreResult<()> {
        if index >= self.unit_prices.len() {
            return Err(CoreError::PriceEntryOutOfRange {
                index,
                len: self.unit_prices.len(),
            });
        }
        for (i, row) in self.unit_prices.iter_mut().enumerate() {
            row.is_active = i == index;
        }
        Ok(())
    }

    /// Recomputes the cached display fields (`line_total`, `active_price`,
    /// `active_price_type`) from the pricing collections.
    ///
    /// Callers invoke this after any mutation of the collections or of the
    /// offer-level pricing mode; nothing recomputes the cache implicitly.
    pub fn refresh_derived(&mut self, offer_uses_unit_prices: bool) {
        let (amount, price_type) = match pricing::get_active_price(self, offer_uses_unit_prices) {
            Some(active) => (Some(active.amount()), Some(active.price_type())),
            None => (None, None),
        };
        self.active_price = amount;
        self.active_price_type = price_type;
        self.line_total = pricing::calculate_line_item_total(self, offer_uses_unit_prices);
    }
}

// =============================================================================
// Offer Status
// =============================================================================

/// The lifecycle status of an offer.
///
/// Transitions happen server-side; clients only display the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    /// Offer is being edited and has not been sent.
    Draft,
    /// Offer was sent to the customer.
    Sent,
    /// Customer accepted the offer.
    Accepted,
    /// Customer declined the offer.
    Declined,
    /// Offer validity period ran out.
    Expired,
}

impl Default for OfferStatus {
    fn default() -> Self {
        OfferStatus::Draft
    }
}

// =============================================================================
// Offer
// =============================================================================

/// A priced quotation document sent to a customer, composed of line items.
///
/// The `use_unit_prices` flag switches the *whole offer* between
/// quantity-tier pricing and unit-price pricing; individual line items
/// cannot mix modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// Unique identifier (UUID v4, server-assigned).
    pub id: String,

    /// Human-readable offer number shown on the PDF (e.g. "OFF-2024-0117").
    pub offer_number: String,

    /// Customer the offer is addressed to.
    pub customer_id: String,

    /// Lifecycle status (display only; transitions are server-side).
    pub status: OfferStatus,

    /// Currency all line totals are quoted in (ISO 4217 code).
    pub currency: String,

    /// Pricing mode switch: `true` = unit-price rows drive the totals,
    /// `false` = quantity tiers do.
    pub use_unit_prices: bool,

    /// Display precision for per-unit prices.
    pub unit_price_decimal_places: u32,

    /// Display precision for line and offer totals.
    pub total_price_decimal_places: u32,

    /// How many unit-price columns the offer table shows.
    pub max_unit_price_columns: u32,

    /// Sum of line totals before discount, shipping and tax. Derived; see
    /// [`Offer::refresh_totals`].
    pub subtotal: f64,

    /// Tax on the offer. Computed server-side, carried for display.
    pub tax_amount: f64,

    /// Grand total. Computed server-side, carried for display.
    pub total_amount: f64,

    /// The priced lines of this offer, in display order.
    pub line_items: Vec<OfferLineItem>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Offer {
    /// Recomputes every line item's cached fields and the offer subtotal.
    ///
    /// `tax_amount` and `total_amount` are server-owned and never touched
    /// here; the client only re-derives what it displays between saves.
    pub fn refresh_totals(&mut self) {
        let use_unit_prices = self.use_unit_prices;
        for item in &mut self.line_items {
            item.refresh_derived(use_unit_prices);
        }
        self.subtotal = pricing::calculate_offer_totals(&self.line_items, use_unit_prices).subtotal;
    }

    /// Selects the price entry at `index` on the line item with the given id,
    /// in whichever collection the offer's pricing mode points at, and
    /// refreshes the derived fields.
    ///
    /// This is the tier-click path of the offer editor.
    pub fn set_active_price(&mut self, line_item_id: &str, index: usize) -> CoreResult<()> {
        let use_unit_prices = self.use_unit_prices;
        let item = self
            .line_items
            .iter_mut()
            .find(|item| item.id == line_item_id)
            .ok_or_else(|| CoreError::LineItemNotFound(line_item_id.to_string()))?;

        if use_unit_prices {
            item.set_active_unit_price(index)?;
        } else {
            item.set_active_quantity_price(index)?;
        }
        item.refresh_derived(use_unit_prices);
        self.subtotal = pricing::calculate_offer_totals(&self.line_items, use_unit_prices).subtotal;
        Ok(())
    }
}

// =============================================================================
// Offer Totals
// =============================================================================

/// Result of aggregating an offer's line totals.
///
/// Discounts, shipping and tax are separate server-owned fields on [`Offer`];
/// aggregation here stops at the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OfferTotals {
    /// Sum of all line items' resolved totals, in input order.
    pub subtotal: f64,
}

// =============================================================================
// Unit Price DTO
// =============================================================================

/// A unit-price row as the mutation API accepts it.
///
/// Numeric fields are strings because the offer editor submits raw input;
/// normalization into a [`UnitPrice`] happens in
/// [`crate::provision::process_unit_prices_for_update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UnitPriceDto {
    /// Existing row id, if the row was loaded from the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Quantity as entered.
    pub quantity: String,

    /// Per-unit price as entered.
    pub unit_price: String,

    /// Pre-computed row total. When absent the total is re-derived from
    /// quantity × unit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,

    /// Selection flag. When absent the first row becomes the active one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl From<&UnitPrice> for UnitPriceDto {
    fn from(row: &UnitPrice) -> Self {
        UnitPriceDto {
            id: Some(row.id.clone()),
            quantity: row.quantity.clone(),
            unit_price: row.unit_price.to_string(),
            total_price: Some(row.total_price),
            is_active: Some(row.is_active),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
