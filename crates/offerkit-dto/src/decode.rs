//! # Decode Module
//!
//! Turns raw API JSON into the typed entities of `offerkit-core`.
//!
//! ## Defaulting Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  what the API sends          │  what the core receives                  │
//! │  ────────────────────────────┼───────────────────────────────────────── │
//! │  number as JSON number       │  the number                              │
//! │  number as numeric string    │  the parsed number                       │
//! │  number as anything else     │  0.0           + warn                    │
//! │  missing/null number         │  0.0 or None                             │
//! │  missing/null boolean        │  false                                   │
//! │  missing/null string         │  "" or None    (+ warn when required)    │
//! │  unknown status string       │  Draft         + warn                    │
//! │  bad timestamp               │  Unix epoch    + warn                    │
//! │  garbage array element       │  skipped       + warn                    │
//! │  non-object entity root      │  DtoError (the only hard failure)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only the root shape can fail. Field-level damage is absorbed so a single
//! bad row coming back from the API can never take down an offer page.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use offerkit_core::{
    ActivePriceType, Offer, OfferLineItem, OfferStatus, QuantityPrice, UnitPrice,
    DEFAULT_TOTAL_PRICE_DECIMAL_PLACES, DEFAULT_UNIT_PRICE_DECIMAL_PLACES, MAX_UNIT_PRICE_COLUMNS,
};

use crate::error::{DtoError, DtoResult};

// =============================================================================
// Field Helpers
// =============================================================================

fn as_object<'a>(value: &'a Value, entity: &str) -> DtoResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| DtoError::unexpected_shape(entity, "a JSON object", value))
}

/// Numbers arrive as JSON numbers or as numeric strings; both are accepted.
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn num_field(obj: &Map<String, Value>, entity: &str, key: &str) -> f64 {
    match obj.get(key) {
        None | Some(Value::Null) => 0.0,
        Some(value) => coerce_f64(value).unwrap_or_else(|| {
            warn!(entity, field = key, %value, "malformed number, defaulting to 0");
            0.0
        }),
    }
}

fn opt_num_field(obj: &Map<String, Value>, entity: &str, key: &str) -> Option<f64> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let parsed = coerce_f64(value);
            if parsed.is_none() {
                warn!(entity, field = key, %value, "malformed number, dropping field");
            }
            parsed
        }
    }
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        // Ids occasionally arrive as bare numbers
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Required string: missing input is tolerated but logged, because an entity
/// without its id/name is almost certainly an API regression.
fn str_field(obj: &Map<String, Value>, entity: &str, key: &str) -> String {
    match obj.get(key) {
        None | Some(Value::Null) => {
            warn!(entity, field = key, "missing required string, defaulting to empty");
            String::new()
        }
        Some(value) => coerce_string(value).unwrap_or_else(|| {
            warn!(entity, field = key, %value, "malformed string, defaulting to empty");
            String::new()
        }),
    }
}

/// Optional string: empty and whitespace-only values normalize to `None`.
fn opt_str_field(obj: &Map<String, Value>, entity: &str, key: &str) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let parsed = coerce_string(value);
            if parsed.is_none() {
                warn!(entity, field = key, %value, "malformed string, dropping field");
            }
            parsed.filter(|s| !s.trim().is_empty())
        }
    }
}

fn bool_field(obj: &Map<String, Value>, entity: &str, key: &str) -> bool {
    match obj.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(value) => {
            warn!(entity, field = key, %value, "malformed boolean, defaulting to false");
            false
        }
    }
}

fn u32_field(obj: &Map<String, Value>, entity: &str, key: &str, default: u32) -> u32 {
    match obj.get(key) {
        None | Some(Value::Null) => default,
        Some(value) => match value.as_u64().and_then(|v| u32::try_from(v).ok()) {
            Some(parsed) => parsed,
            None => {
                warn!(entity, field = key, %value, "malformed count, using default");
                default
            }
        },
    }
}

fn timestamp_field(obj: &Map<String, Value>, entity: &str, key: &str) -> DateTime<Utc> {
    match obj.get(key) {
        None | Some(Value::Null) => DateTime::<Utc>::UNIX_EPOCH,
        Some(value) => value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| {
                warn!(entity, field = key, %value, "malformed timestamp, using epoch");
                DateTime::<Utc>::UNIX_EPOCH
            }),
    }
}

fn status_field(obj: &Map<String, Value>, entity: &str, key: &str) -> OfferStatus {
    match obj.get(key) {
        None | Some(Value::Null) => OfferStatus::default(),
        Some(value) => match value.as_str() {
            Some("draft") => OfferStatus::Draft,
            Some("sent") => OfferStatus::Sent,
            Some("accepted") => OfferStatus::Accepted,
            Some("declined") => OfferStatus::Declined,
            Some("expired") => OfferStatus::Expired,
            _ => {
                warn!(entity, field = key, %value, "unknown status, defaulting to draft");
                OfferStatus::default()
            }
        },
    }
}

fn active_price_type_field(
    obj: &Map<String, Value>,
    entity: &str,
    key: &str,
) -> Option<ActivePriceType> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_str() {
            Some("unit") => Some(ActivePriceType::Unit),
            Some("quantity") => Some(ActivePriceType::Quantity),
            _ => {
                warn!(entity, field = key, %value, "unknown price type, dropping field");
                None
            }
        },
    }
}

/// Decodes an array field element-wise. Garbage elements are skipped with a
/// warning; a missing or non-array field yields an empty collection.
fn array_field<T>(
    obj: &Map<String, Value>,
    entity: &str,
    key: &str,
    decode_element: impl Fn(&Value) -> DtoResult<T>,
) -> Vec<T> {
    match obj.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(elements)) => elements
            .iter()
            .filter_map(|element| match decode_element(element) {
                Ok(decoded) => Some(decoded),
                Err(err) => {
                    warn!(entity, field = key, error = %err, "skipping malformed element");
                    None
                }
            })
            .collect(),
        Some(value) => {
            warn!(entity, field = key, %value, "expected an array, defaulting to empty");
            Vec::new()
        }
    }
}

// =============================================================================
// Entity Decoders
// =============================================================================

/// Decodes a quantity-tier price object.
pub fn decode_quantity_price(value: &Value) -> DtoResult<QuantityPrice> {
    let obj = as_object(value, "quantity_price")?;

    Ok(QuantityPrice {
        quantity: str_field(obj, "quantity_price", "quantity"),
        price: num_field(obj, "quantity_price", "price"),
        is_active: bool_field(obj, "quantity_price", "isActive"),
        total: num_field(obj, "quantity_price", "total"),
    })
}

/// Decodes a unit-price row object.
pub fn decode_unit_price(value: &Value) -> DtoResult<UnitPrice> {
    let obj = as_object(value, "unit_price")?;

    Ok(UnitPrice {
        id: str_field(obj, "unit_price", "id"),
        quantity: str_field(obj, "unit_price", "quantity"),
        unit_price: num_field(obj, "unit_price", "unitPrice"),
        total_price: num_field(obj, "unit_price", "totalPrice"),
        is_active: bool_field(obj, "unit_price", "isActive"),
        created_at: timestamp_field(obj, "unit_price", "createdAt"),
        updated_at: timestamp_field(obj, "unit_price", "updatedAt"),
    })
}

/// Decodes an offer line item, including both pricing collections.
pub fn decode_line_item(value: &Value) -> DtoResult<OfferLineItem> {
    let obj = as_object(value, "line_item")?;

    Ok(OfferLineItem {
        id: str_field(obj, "line_item", "id"),
        offer_id: str_field(obj, "line_item", "offerId"),
        name: str_field(obj, "line_item", "name"),
        material: opt_str_field(obj, "line_item", "material"),
        specification: opt_str_field(obj, "line_item", "specification"),
        dimensions: opt_str_field(obj, "line_item", "dimensions"),
        purchase_price: opt_num_field(obj, "line_item", "purchasePrice"),
        purchase_currency: opt_str_field(obj, "line_item", "purchaseCurrency"),
        quantity_prices: array_field(obj, "line_item", "quantityPrices", decode_quantity_price),
        unit_prices: array_field(obj, "line_item", "unitPrices", decode_unit_price),
        base_price: opt_num_field(obj, "line_item", "basePrice"),
        base_quantity: opt_str_field(obj, "line_item", "baseQuantity"),
        line_total: num_field(obj, "line_item", "lineTotal"),
        active_price: opt_num_field(obj, "line_item", "activePrice"),
        active_price_type: active_price_type_field(obj, "line_item", "activePriceType"),
        created_at: timestamp_field(obj, "line_item", "createdAt"),
        updated_at: timestamp_field(obj, "line_item", "updatedAt"),
    })
}

/// Decodes a full offer.
///
/// Server-computed totals (`subtotal`, `taxAmount`, `totalAmount`) are
/// carried as sent; whether to re-derive the subtotal locally is the
/// caller's decision ([`Offer::refresh_totals`]).
pub fn decode_offer(value: &Value) -> DtoResult<Offer> {
    let obj = as_object(value, "offer")?;

    let offer = Offer {
        id: str_field(obj, "offer", "id"),
        offer_number: str_field(obj, "offer", "offerNumber"),
        customer_id: str_field(obj, "offer", "customerId"),
        status: status_field(obj, "offer", "status"),
        currency: str_field(obj, "offer", "currency"),
        use_unit_prices: bool_field(obj, "offer", "useUnitPrices"),
        unit_price_decimal_places: u32_field(
            obj,
            "offer",
            "unitPriceDecimalPlaces",
            DEFAULT_UNIT_PRICE_DECIMAL_PLACES,
        ),
        total_price_decimal_places: u32_field(
            obj,
            "offer",
            "totalPriceDecimalPlaces",
            DEFAULT_TOTAL_PRICE_DECIMAL_PLACES,
        ),
        max_unit_price_columns: u32_field(
            obj,
            "offer",
            "maxUnitPriceColumns",
            MAX_UNIT_PRICE_COLUMNS,
        ),
        subtotal: num_field(obj, "offer", "subtotal"),
        tax_amount: num_field(obj, "offer", "taxAmount"),
        total_amount: num_field(obj, "offer", "totalAmount"),
        line_items: array_field(obj, "offer", "lineItems", decode_line_item),
        created_at: timestamp_field(obj, "offer", "createdAt"),
        updated_at: timestamp_field(obj, "offer", "updatedAt"),
    };

    debug!(
        offer_id = %offer.id,
        line_items = offer.line_items.len(),
        use_unit_prices = offer.use_unit_prices,
        "decoded offer"
    );

    Ok(offer)
}

/// Decodes a list endpoint response. The root must be an array; garbage
/// elements inside it are skipped with a warning.
pub fn decode_offers(value: &Value) -> DtoResult<Vec<Offer>> {
    let elements = value
        .as_array()
        .ok_or_else(|| DtoError::unexpected_shape("offers", "a JSON array", value))?;

    let offers: Vec<Offer> = elements
        .iter()
        .filter_map(|element| match decode_offer(element) {
            Ok(offer) => Some(offer),
            Err(err) => {
                warn!(error = %err, "skipping malformed offer in list");
                None
            }
        })
        .collect();

    debug!(count = offers.len(), total = elements.len(), "decoded offer list");

    Ok(offers)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_quantity_price() {
        let tier = decode_quantity_price(&json!({
            "quantity": "1000",
            "price": 0.35,
            "isActive": true,
            "total": 350.0
        }))
        .unwrap();

        assert_eq!(tier.quantity, "1000");
        assert_eq!(tier.price, 0.35);
        assert!(tier.is_active);
        assert_eq!(tier.total, 350.0);
    }

    #[test]
    fn test_decode_accepts_numeric_strings() {
        // The API serializes decimals as strings in some responses
        let tier = decode_quantity_price(&json!({
            "quantity": "1000",
            "price": "0.35",
            "isActive": false,
            "total": "350.00"
        }))
        .unwrap();

        assert_eq!(tier.price, 0.35);
        assert_eq!(tier.total, 350.0);
    }

    #[test]
    fn test_decode_defaults_malformed_fields() {
        let tier = decode_quantity_price(&json!({
            "quantity": "1000",
            "price": {"nested": "garbage"},
            "isActive": "yes",
            "total": null
        }))
        .unwrap();

        assert_eq!(tier.price, 0.0);
        assert!(!tier.is_active);
        assert_eq!(tier.total, 0.0);
    }

    #[test]
    fn test_decode_rejects_non_object_root() {
        let err = decode_quantity_price(&json!("not an object")).unwrap_err();
        assert!(matches!(err, DtoError::UnexpectedShape { .. }));

        let err = decode_offer(&json!(null)).unwrap_err();
        assert!(matches!(err, DtoError::UnexpectedShape { .. }));
    }

    #[test]
    fn test_decode_unit_price_timestamps() {
        let row = decode_unit_price(&json!({
            "id": "up-1",
            "quantity": "1000",
            "unitPrice": 0.25,
            "totalPrice": 250.0,
            "isActive": true,
            "createdAt": "2024-05-17T09:30:00Z",
            "updatedAt": "not a date"
        }))
        .unwrap();

        assert_eq!(row.created_at.to_rfc3339(), "2024-05-17T09:30:00+00:00");
        assert_eq!(row.updated_at, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_decode_line_item_skips_garbage_rows() {
        let item = decode_line_item(&json!({
            "id": "li-1",
            "offerId": "off-1",
            "name": "Flyer A5",
            "quantityPrices": [
                {"quantity": "1000", "price": 0.35, "isActive": true, "total": 350.0},
                "garbage",
                {"quantity": "5000", "price": 0.30, "isActive": false, "total": 1500.0}
            ],
            "unitPrices": "not an array"
        }))
        .unwrap();

        assert_eq!(item.quantity_prices.len(), 2);
        assert!(item.unit_prices.is_empty());
        assert_eq!(item.material, None);
        assert_eq!(item.line_total, 0.0);
    }

    #[test]
    fn test_decode_offer_full() {
        let offer = decode_offer(&json!({
            "id": "off-1",
            "offerNumber": "OFF-2024-0117",
            "customerId": "cust-9",
            "status": "sent",
            "currency": "EUR",
            "useUnitPrices": true,
            "unitPriceDecimalPlaces": 3,
            "totalPriceDecimalPlaces": 2,
            "maxUnitPriceColumns": 4,
            "subtotal": 1250.0,
            "taxAmount": 237.5,
            "totalAmount": 1487.5,
            "lineItems": [{
                "id": "li-1",
                "offerId": "off-1",
                "name": "Labels",
                "unitPrices": [{
                    "id": "up-1",
                    "quantity": "1000",
                    "unitPrice": 0.25,
                    "totalPrice": 250.0,
                    "isActive": true
                }]
            }]
        }))
        .unwrap();

        assert_eq!(offer.status, OfferStatus::Sent);
        assert!(offer.use_unit_prices);
        assert_eq!(offer.max_unit_price_columns, 4);
        assert_eq!(offer.line_items.len(), 1);
        assert_eq!(offer.line_items[0].unit_prices[0].unit_price, 0.25);

        // Server totals are carried, not recomputed, at decode time
        assert_eq!(offer.subtotal, 1250.0);
        assert_eq!(offer.tax_amount, 237.5);
    }

    #[test]
    fn test_decode_offer_defaults_config_and_status() {
        let offer = decode_offer(&json!({
            "id": "off-2",
            "offerNumber": "OFF-2024-0118",
            "customerId": "cust-9",
            "status": "negotiating",
            "currency": "EUR"
        }))
        .unwrap();

        assert_eq!(offer.status, OfferStatus::Draft); // unknown status
        assert!(!offer.use_unit_prices);
        assert_eq!(offer.unit_price_decimal_places, 3);
        assert_eq!(offer.total_price_decimal_places, 2);
        assert_eq!(offer.max_unit_price_columns, 5);
        assert!(offer.line_items.is_empty());
    }

    #[test]
    fn test_decoded_offer_feeds_the_pricing_core() {
        // End to end: decode, then let the core re-derive totals
        let mut offer = decode_offer(&json!({
            "id": "off-3",
            "offerNumber": "OFF-2024-0119",
            "customerId": "cust-1",
            "currency": "EUR",
            "useUnitPrices": false,
            "subtotal": 0.0,
            "lineItems": [{
                "id": "li-1",
                "offerId": "off-3",
                "name": "Posters",
                "quantityPrices": [
                    {"quantity": "10", "price": 2.0, "isActive": true, "total": 20.0}
                ]
            }]
        }))
        .unwrap();

        offer.refresh_totals();
        assert_eq!(offer.subtotal, 20.0);
        assert_eq!(offer.line_items[0].line_total, 20.0);
    }

    #[test]
    fn test_decode_offers_list() {
        let offers = decode_offers(&json!([
            {"id": "off-1", "offerNumber": "A", "customerId": "c", "currency": "EUR"},
            "garbage",
            {"id": "off-2", "offerNumber": "B", "customerId": "c", "currency": "EUR"}
        ]))
        .unwrap();

        assert_eq!(offers.len(), 2);
        assert_eq!(offers[1].id, "off-2");
    }

    #[test]
    fn test_decode_offers_rejects_non_array() {
        let err = decode_offers(&json!({"items": []})).unwrap_err();
        assert!(matches!(err, DtoError::UnexpectedShape { .. }));
    }
}
