//! Channel Counter Repository
//!
//! One counter row per sales channel. Every number the system hands out
//! is minted through [`increment_and_get`]; the only other mutation is
//! the reconciler's guarded [`set_value`] override.

use super::{RepoError, RepoResult};
use shared::models::{Channel, ChannelCounter};
use shared::util::now_millis;
use sqlx::SqlitePool;

/// Create the counter row at value 0 if the channel has none.
///
/// Idempotent and safe under concurrency: an existing value is never
/// reset.
pub async fn ensure(pool: &SqlitePool, channel: Channel) -> RepoResult<()> {
    let now = now_millis();
    sqlx::query(
        "INSERT INTO channel_counters (channel, value, created_at, updated_at) VALUES (?1, 0, ?2, ?2) ON CONFLICT(channel) DO NOTHING",
    )
    .bind(channel)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get(pool: &SqlitePool, channel: Channel) -> RepoResult<Option<ChannelCounter>> {
    let counter = sqlx::query_as::<_, ChannelCounter>(
        "SELECT channel, value, created_at, updated_at FROM channel_counters WHERE channel = ?",
    )
    .bind(channel)
    .fetch_optional(pool)
    .await?;
    Ok(counter)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ChannelCounter>> {
    let counters = sqlx::query_as::<_, ChannelCounter>(
        "SELECT channel, value, created_at, updated_at FROM channel_counters ORDER BY channel",
    )
    .fetch_all(pool)
    .await?;
    Ok(counters)
}

/// Atomically increment the channel counter and return the new value
///
/// Single-statement upsert: the first allocation on a fresh channel
/// creates the row already at 1. The store serializes the write, so two
/// concurrent calls can never observe or return the same value.
pub async fn increment_and_get(pool: &SqlitePool, channel: Channel) -> RepoResult<i64> {
    let now = now_millis();
    let value = sqlx::query_scalar::<_, i64>(
        "INSERT INTO channel_counters (channel, value, created_at, updated_at) VALUES (?1, 1, ?2, ?2) ON CONFLICT(channel) DO UPDATE SET value = value + 1, updated_at = excluded.updated_at RETURNING value",
    )
    .bind(channel)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(value)
}

/// Administrative override used by the backfill reconciler
///
/// The statement itself refuses to move the counter below the highest
/// sequence already assigned in the channel — a lower value would let
/// live allocation re-mint an existing number. Never called from the
/// order-creation path.
pub async fn set_value(pool: &SqlitePool, channel: Channel, value: i64) -> RepoResult<()> {
    if value < 0 {
        return Err(RepoError::Validation(format!(
            "Counter value must be non-negative, got {value}"
        )));
    }
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE channel_counters SET value = ?1, updated_at = ?2 WHERE channel = ?3 AND ?1 >= (SELECT COALESCE(MAX(sequence), 0) FROM orders WHERE channel = ?3)",
    )
    .bind(value)
    .bind(now)
    .bind(channel)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Validation(format!(
            "Refusing to set counter {channel} to {value}: counter missing or value below highest assigned sequence"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    /// In-memory SQLite pool with the numbering schema
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE channel_counters (
                channel TEXT PRIMARY KEY,
                value INTEGER NOT NULL DEFAULT 0 CHECK (value >= 0),
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE TABLE orders (
                id INTEGER PRIMARY KEY,
                channel TEXT NOT NULL,
                sequence INTEGER,
                number TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let pool = test_pool().await;

        ensure(&pool, Channel::Atelier).await.unwrap();
        ensure(&pool, Channel::Atelier).await.unwrap();

        let counter = get(&pool, Channel::Atelier).await.unwrap().unwrap();
        assert_eq!(counter.value, 0);

        // ensure after increments must not reset the value
        increment_and_get(&pool, Channel::Atelier).await.unwrap();
        ensure(&pool, Channel::Atelier).await.unwrap();
        let counter = get(&pool, Channel::Atelier).await.unwrap().unwrap();
        assert_eq!(counter.value, 1);
    }

    #[tokio::test]
    async fn test_increment_creates_lazily_and_is_contiguous() {
        let pool = test_pool().await;

        // No ensure() beforehand: first increment creates the row at 1
        assert_eq!(increment_and_get(&pool, Channel::Lab).await.unwrap(), 1);
        assert_eq!(increment_and_get(&pool, Channel::Lab).await.unwrap(), 2);
        assert_eq!(increment_and_get(&pool, Channel::Lab).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_channels_count_independently() {
        let pool = test_pool().await;

        increment_and_get(&pool, Channel::Atelier).await.unwrap();
        increment_and_get(&pool, Channel::Atelier).await.unwrap();
        assert_eq!(increment_and_get(&pool, Channel::Lab).await.unwrap(), 1);

        let all = find_all(&pool).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_set_value_rejects_below_assigned_sequence() {
        let pool = test_pool().await;
        ensure(&pool, Channel::Atelier).await.unwrap();

        sqlx::query(
            "INSERT INTO orders (id, channel, sequence, number, created_at, updated_at)
             VALUES (1, 'AS', 5, '№00005/AS', 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let err = set_value(&pool, Channel::Atelier, 3).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        set_value(&pool, Channel::Atelier, 5).await.unwrap();
        let counter = get(&pool, Channel::Atelier).await.unwrap().unwrap();
        assert_eq!(counter.value, 5);
    }

    #[tokio::test]
    async fn test_set_value_requires_existing_counter() {
        let pool = test_pool().await;
        let err = set_value(&pool, Channel::Lab, 1).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }
}
