//! # Payload Module
//!
//! Builds the outbound mutation payloads the offers API accepts.
//!
//! Payloads are validated when built, not when sent: a bad entity id or
//! currency code fails here with a field-level error the form can display,
//! instead of a 422 round trip later.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use offerkit_core::validation::{validate_currency_code, validate_entity_id};
use offerkit_core::{OfferLineItem, QuantityPrice, UnitPrice, UnitPriceDto};

use crate::error::DtoResult;

// =============================================================================
// Update Line Item Payload
// =============================================================================

/// Mutation payload for a line item update.
///
/// Optional fields are omitted from the JSON entirely when unset, so a
/// partial update only touches what the user edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLineItemPayload {
    /// Line item being updated (UUID, validated on construction).
    pub line_item_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specification: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_currency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_quantity: Option<String>,

    /// Full replacement for the quantity-tier table, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_prices: Option<Vec<QuantityPrice>>,

    /// Full replacement for the unit-price table, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_prices: Option<Vec<UnitPriceDto>>,
}

impl UpdateLineItemPayload {
    /// Starts an empty payload for the given line item.
    ///
    /// Fails if the id is not a server-assigned UUID - a payload for an
    /// unsaved line item has nowhere to go.
    pub fn new(line_item_id: &str) -> DtoResult<Self> {
        validate_entity_id(line_item_id)?;

        Ok(UpdateLineItemPayload {
            line_item_id: line_item_id.to_string(),
            name: None,
            material: None,
            specification: None,
            dimensions: None,
            purchase_price: None,
            purchase_currency: None,
            base_price: None,
            base_quantity: None,
            quantity_prices: None,
            unit_prices: None,
        })
    }

    /// Builds a full snapshot payload from a line item's current state,
    /// pricing tables included.
    pub fn for_line_item(item: &OfferLineItem) -> DtoResult<Self> {
        validate_entity_id(&item.id)?;
        if let Some(currency) = &item.purchase_currency {
            validate_currency_code(currency)?;
        }

        Ok(UpdateLineItemPayload {
            line_item_id: item.id.clone(),
            name: Some(item.name.clone()),
            material: item.material.clone(),
            specification: item.specification.clone(),
            dimensions: item.dimensions.clone(),
            purchase_price: item.purchase_price,
            purchase_currency: item.purchase_currency.clone(),
            base_price: item.base_price,
            base_quantity: item.base_quantity.clone(),
            quantity_prices: Some(item.quantity_prices.clone()),
            unit_prices: Some(item.unit_prices.iter().map(UnitPriceDto::from).collect()),
        })
    }

    /// Replaces the unit-price table carried by this payload.
    pub fn with_unit_prices(mut self, rows: &[UnitPrice]) -> Self {
        self.unit_prices = Some(rows.iter().map(UnitPriceDto::from).collect());
        self
    }

    /// Serializes to the JSON value the HTTP layer sends.
    pub fn to_value(&self) -> DtoResult<Value> {
        let value = serde_json::to_value(self)?;
        debug!(line_item_id = %self.line_item_id, "built line item payload");
        Ok(value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DtoError;
    use chrono::{TimeZone, Utc};

    const LINE_ITEM_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn line_item() -> OfferLineItem {
        let stamp = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
        OfferLineItem {
            id: LINE_ITEM_ID.to_string(),
            offer_id: "off-1".to_string(),
            name: "Business cards".to_string(),
            material: Some("350g matte".to_string()),
            specification: None,
            dimensions: Some("85 × 55 mm".to_string()),
            purchase_price: Some(120.0),
            purchase_currency: Some("EUR".to_string()),
            quantity_prices: vec![QuantityPrice {
                quantity: "1000".to_string(),
                price: 0.35,
                is_active: true,
                total: 350.0,
            }],
            unit_prices: vec![UnitPrice {
                id: "up-1".to_string(),
                quantity: "1000".to_string(),
                unit_price: 0.25,
                total_price: 250.0,
                is_active: true,
                created_at: stamp,
                updated_at: stamp,
            }],
            base_price: None,
            base_quantity: None,
            line_total: 350.0,
            active_price: Some(0.35),
            active_price_type: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn test_new_rejects_bad_id() {
        let err = UpdateLineItemPayload::new("unsaved-local-id").unwrap_err();
        assert!(matches!(err, DtoError::Validation(_)));
    }

    #[test]
    fn test_for_line_item_snapshots_everything() {
        let payload = UpdateLineItemPayload::for_line_item(&line_item()).unwrap();

        assert_eq!(payload.line_item_id, LINE_ITEM_ID);
        assert_eq!(payload.name.as_deref(), Some("Business cards"));
        assert_eq!(payload.quantity_prices.as_ref().unwrap().len(), 1);

        let rows = payload.unit_prices.as_ref().unwrap();
        assert_eq!(rows[0].id.as_deref(), Some("up-1"));
        assert_eq!(rows[0].unit_price, "0.25");
    }

    #[test]
    fn test_for_line_item_rejects_bad_currency() {
        let mut item = line_item();
        item.purchase_currency = Some("euros".to_string());

        let err = UpdateLineItemPayload::for_line_item(&item).unwrap_err();
        assert!(matches!(err, DtoError::Validation(_)));
    }

    #[test]
    fn test_partial_payload_omits_unset_fields() {
        let payload = UpdateLineItemPayload::new(LINE_ITEM_ID)
            .unwrap()
            .with_unit_prices(&line_item().unit_prices);

        let value = payload.to_value().unwrap();
        let obj = value.as_object().unwrap();

        assert!(obj.contains_key("lineItemId"));
        assert!(obj.contains_key("unitPrices"));
        // Unset fields must not appear at all in a partial update
        assert!(!obj.contains_key("name"));
        assert!(!obj.contains_key("basePrice"));
    }

    #[test]
    fn test_payload_wire_format_is_camel_case() {
        let payload = UpdateLineItemPayload::for_line_item(&line_item()).unwrap();
        let value = payload.to_value().unwrap();
        let obj = value.as_object().unwrap();

        assert!(obj.contains_key("purchasePrice"));
        assert!(obj.contains_key("quantityPrices"));
        assert!(!obj.contains_key("purchase_price"));
    }
}
