//! Order Numbering Domain
//!
//! The sequence allocator mints per-channel numbers on the live
//! order-creation path; the backfill reconciler retrofits numbers onto
//! records that predate numbering. The number format itself lives in
//! `shared::order_number` so display surfaces can recompute it without
//! this crate.

pub mod allocator;
pub mod backfill;

pub use allocator::{Allocation, AllocationError, SequenceAllocator};
pub use backfill::{BackfillError, BackfillReconciler, BackfillReport, ChannelOutcome};
