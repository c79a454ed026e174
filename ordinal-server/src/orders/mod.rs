//! Order Creation Service
//!
//! Owns the "allocate, then persist" unit on the live path. An order is
//! never persisted without a number; a minted number whose insert fails
//! is abandoned as a gap and never handed out again.

use crate::db::repository::{RepoError, order};
use crate::numbering::{AllocationError, SequenceAllocator};
use shared::models::{Channel, Order};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("Order store error: {0}")]
    Store(#[from] RepoError),
}

/// Service for creating and reading numbered orders
#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    allocator: SequenceAllocator,
}

impl OrderService {
    pub fn new(pool: SqlitePool) -> Self {
        let allocator = SequenceAllocator::new(pool.clone());
        Self { pool, allocator }
    }

    /// Create a live order in `channel`, numbered at creation time
    pub async fn create(&self, channel: Channel) -> Result<Order, OrderError> {
        let allocation = self.allocator.allocate(channel).await?;

        let now = now_millis();
        let order = Order {
            id: snowflake_id(),
            channel,
            sequence: Some(allocation.sequence),
            number: Some(allocation.number),
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = order::insert_numbered(&self.pool, &order).await {
            // The minted sequence stays unused: a gap in the channel is
            // accepted, re-minting it would risk a duplicate.
            tracing::warn!(
                %channel,
                sequence = allocation.sequence,
                error = %e,
                "Order insert failed after allocation, sequence abandoned"
            );
            return Err(e.into());
        }

        tracing::info!(
            order_id = order.id,
            %channel,
            number = order.number.as_deref().unwrap_or_default(),
            "Order created"
        );
        Ok(order)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Order>, OrderError> {
        Ok(order::find_by_id(&self.pool, id).await?)
    }
}
