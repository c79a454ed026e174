//! Sequence Allocator
//!
//! Atomic "take next number" per channel.

use crate::db::repository::{RepoError, counter};
use shared::models::Channel;
use shared::order_number;
use sqlx::SqlitePool;
use thiserror::Error;

/// The counter store could not mint a sequence
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("Counter store error: {0}")]
    Store(#[from] RepoError),
}

/// A minted sequence and its formatted order number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub sequence: i64,
    pub number: String,
}

/// Mints order numbers from the channel counter store
#[derive(Clone)]
pub struct SequenceAllocator {
    pool: SqlitePool,
}

impl SequenceAllocator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Reserve the next sequence for `channel` and format its number
    ///
    /// Failure aborts order creation: the caller retries the whole
    /// allocate-and-persist unit or abandons the order, never just the
    /// insert. A sequence minted here and then not persisted stays a gap;
    /// it is never handed out again.
    pub async fn allocate(&self, channel: Channel) -> Result<Allocation, AllocationError> {
        let sequence = counter::increment_and_get(&self.pool, channel).await?;
        let number = order_number::format(sequence, channel);
        tracing::debug!(%channel, sequence, %number, "Allocated order number");
        Ok(Allocation { sequence, number })
    }
}
