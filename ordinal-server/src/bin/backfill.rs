//! Legacy order backfill
//!
//! Offline administrative pass: assigns order numbers to records created
//! before numbering existed, in chronological order per channel, then
//! aligns each channel counter so live allocation continues from the
//! right point.
//!
//! Run it only while order intake is stopped — live allocation racing a
//! backfill pass in the same channel would collide. Safe to re-run at
//! any time: already-numbered records are untouched and a completed
//! channel is a no-op.
//!
//! ```text
//! WORK_DIR=/var/lib/ordinal backfill
//! ```

use anyhow::Context;

use ordinal_server::db::DbService;
use ordinal_server::numbering::BackfillReconciler;
use ordinal_server::{Config, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_environment();

    let config = Config::from_env();
    let db_path = config.db_path();

    tracing::info!(db = %db_path.display(), "Starting legacy order backfill");

    let db_service = DbService::new(&db_path.to_string_lossy())
        .await
        .context("Failed to open database")?;

    let reconciler =
        BackfillReconciler::new(db_service.pool).with_chunk_size(config.backfill_chunk_size);
    let report = reconciler.run().await;

    for outcome in &report.outcomes {
        tracing::info!(
            channel = %outcome.channel,
            assigned = outcome.assigned,
            counter = outcome.counter,
            total_numbered = outcome.total_numbered,
            "Channel reconciled"
        );
    }
    for failure in &report.failures {
        tracing::error!(error = %failure, "Channel backfill failed");
    }

    if !report.is_success() {
        anyhow::bail!("Backfill finished with failures; re-run after resolving");
    }
    Ok(())
}
