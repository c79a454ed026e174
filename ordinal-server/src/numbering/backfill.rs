//! Backfill Reconciler
//!
//! One-shot batch pass that assigns numbers to orders created before
//! numbering existed, channel by channel in chronological order, then
//! aligns each channel counter with the result.
//!
//! This is a maintenance operation: it must not run while order intake
//! is accepting traffic for the same channel, and not concurrently with
//! itself. With intake stopped it is always safe to re-run — selection
//! is "number is absent", so a finished channel re-runs as a no-op and a
//! crashed pass resumes where it stopped.

use crate::db::repository::{RepoError, counter, order};
use shared::models::Channel;
use shared::order_number;
use sqlx::SqlitePool;
use thiserror::Error;

/// Records fetched per repository round-trip. Assignments commit one by
/// one, so a crash loses at most the current record; the chunk bound
/// keeps memory flat on unbounded backlogs.
const DEFAULT_CHUNK_SIZE: i64 = 500;

#[derive(Debug, Error)]
pub enum BackfillError {
    #[error("Counter store error: {0}")]
    Store(#[from] RepoError),

    #[error("Backfill aborted for {channel} after {assigned} assignments: {source}")]
    Aborted {
        channel: Channel,
        assigned: u64,
        source: RepoError,
    },
}

/// Outcome of one channel's pass
#[derive(Debug)]
pub struct ChannelOutcome {
    pub channel: Channel,
    /// Numbers assigned by this pass (0 on a no-op re-run)
    pub assigned: u64,
    /// Counter value after synchronization
    pub counter: i64,
    /// Numbered records in the channel after the pass
    pub total_numbered: i64,
}

/// Outcome of a full run over all channels
#[derive(Debug, Default)]
pub struct BackfillReport {
    pub outcomes: Vec<ChannelOutcome>,
    pub failures: Vec<BackfillError>,
}

impl BackfillReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Assigns sequence numbers to legacy orders and synchronizes counters
pub struct BackfillReconciler {
    pool: SqlitePool,
    chunk_size: i64,
}

impl BackfillReconciler {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Override the scan chunk size
    pub fn with_chunk_size(mut self, chunk_size: i64) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Reconcile every channel
    ///
    /// Channels are independent: an aborted channel is reported and the
    /// remaining channels still run.
    pub async fn run(&self) -> BackfillReport {
        let mut report = BackfillReport::default();
        for channel in Channel::ALL {
            match self.run_channel(channel).await {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(e) => {
                    tracing::error!(%channel, error = %e, "Channel backfill failed");
                    report.failures.push(e);
                }
            }
        }
        report
    }

    /// Reconcile a single channel
    pub async fn run_channel(&self, channel: Channel) -> Result<ChannelOutcome, BackfillError> {
        counter::ensure(&self.pool, channel).await?;

        // Resume from the highest assigned sequence; under the uniqueness
        // invariant this equals the numbered-record count, so a partially
        // failed pass continues exactly where it stopped. A counter ahead
        // of that (live allocation left a gap) is never walked back into.
        let current = counter::get(&self.pool, channel)
            .await?
            .map(|c| c.value)
            .unwrap_or(0);
        let mut sequence = order::max_sequence(&self.pool, channel)
            .await?
            .max(current);
        let mut assigned: u64 = 0;

        loop {
            let chunk = order::list_unnumbered_chunk(&self.pool, channel, self.chunk_size).await?;
            if chunk.is_empty() {
                break;
            }
            for record in &chunk {
                sequence += 1;
                let number = order_number::format(sequence, channel);
                order::assign_number(&self.pool, record.id, sequence, &number)
                    .await
                    .map_err(|source| {
                        tracing::error!(
                            %channel,
                            order_id = record.id,
                            sequence,
                            assigned,
                            error = %source,
                            "Backfill aborted mid-pass"
                        );
                        BackfillError::Aborted {
                            channel,
                            assigned,
                            source,
                        }
                    })?;
                assigned += 1;
            }
        }

        // Counter sync happens only after the whole channel succeeded; a
        // failure above leaves the counter stale-but-safe (lower than the
        // true count) until the next run.
        counter::set_value(&self.pool, channel, sequence).await?;
        let total_numbered = order::count_numbered(&self.pool, channel).await?;

        tracing::info!(
            %channel,
            assigned,
            counter = sequence,
            total_numbered,
            "Backfill pass complete"
        );
        Ok(ChannelOutcome {
            channel,
            assigned,
            counter: sequence,
            total_numbered,
        })
    }
}
