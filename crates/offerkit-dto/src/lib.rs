//! # offerkit-dto: Data-Transfer Boundary for OfferKit
//!
//! This crate sits between the remote offers API and the pure pricing core.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OfferKit Data Flow                               │
//! │                                                                         │
//! │  Remote REST API  ──── raw JSON ────►  decode (THIS CRATE)             │
//! │                                             │                           │
//! │                                             ▼                           │
//! │                                   typed Offer / OfferLineItem           │
//! │                                             │                           │
//! │                                             ▼                           │
//! │                                   offerkit-core (pricing)               │
//! │                                             │                           │
//! │                                             ▼                           │
//! │  Remote REST API  ◄── mutation JSON ──  payload (THIS CRATE)           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The API responses are loosely typed: numbers arrive as strings, fields go
//! missing, booleans show up as anything. All of that tolerance lives here,
//! so the core's invariant holds: **it only ever sees well-formed data**.
//!
//! ## Module Organization
//!
//! - [`decode`] - raw `serde_json::Value` → typed entities, with defaulting
//! - [`payload`] - typed entities → outbound mutation payloads
//! - [`error`] - decode/payload error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod decode;
pub mod error;
pub mod payload;

// =============================================================================
// Re-exports
// =============================================================================

pub use decode::{decode_line_item, decode_offer, decode_offers, decode_unit_price};
pub use error::{DtoError, DtoResult};
pub use payload::UpdateLineItemPayload;
