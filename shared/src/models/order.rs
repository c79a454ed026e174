//! Order Model
//!
//! Only the numbering-relevant portion of an order. `sequence` and
//! `number` are either both absent (legacy, pre-numbering record) or
//! both present; once present they never change for the lifetime of the
//! record, even through cancellation.

use super::Channel;
use serde::{Deserialize, Serialize};

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub channel: Channel,
    /// Per-channel monotonic sequence, absent on legacy records
    pub sequence: Option<i64>,
    /// Formatted human-facing number, absent on legacy records
    pub number: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload
///
/// The channel arrives as a raw code so an unknown storefront surfaces
/// as a validation failure instead of a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub channel: String,
}
