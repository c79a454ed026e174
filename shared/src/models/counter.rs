//! Channel Counter Model

use super::Channel;
use serde::{Deserialize, Serialize};

/// Per-channel order counter row
///
/// `value` equals the count of orders in the channel that have been
/// assigned a number. Mutated only through the atomic increment (and the
/// reconciler's guarded override); never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ChannelCounter {
    pub channel: Channel,
    pub value: i64,
    pub created_at: i64,
    pub updated_at: i64,
}
