//! Shared types for the Ordinal numbering service
//!
//! Domain models (channels, counters, orders), the order number
//! formatter, and small utility helpers used by both the server and
//! external consumers.

pub mod models;
pub mod order_number;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
