//! Order Repository
//!
//! Numbering-relevant order persistence. Live orders are inserted fully
//! numbered; legacy records sit unnumbered until the backfill reconciler
//! assigns their `(sequence, number)` pair. An assigned pair is never
//! overwritten.

use super::{RepoError, RepoResult};
use shared::models::{Channel, Order};
use shared::util::now_millis;
use sqlx::SqlitePool;

const ORDER_COLUMNS: &str = "id, channel, sequence, number, created_at, updated_at";

/// Insert a live, already-numbered order
///
/// An order with a channel but no number must never reach the store;
/// that combination only exists transiently inside a failed creation.
pub async fn insert_numbered(pool: &SqlitePool, order: &Order) -> RepoResult<()> {
    if order.sequence.is_none() || order.number.is_none() {
        return Err(RepoError::Validation(format!(
            "Order {} must carry both sequence and number",
            order.id
        )));
    }
    sqlx::query(
        "INSERT INTO orders (id, channel, sequence, number, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(order.id)
    .bind(order.channel)
    .bind(order.sequence)
    .bind(&order.number)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(order)
}

/// Next chunk of unnumbered records in a channel, oldest first
///
/// Ordered by `created_at` with the id as a stable tiebreak so repeated
/// scans walk the backlog in one deterministic order.
pub async fn list_unnumbered_chunk(
    pool: &SqlitePool,
    channel: Channel,
    limit: i64,
) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE channel = ?1 AND number IS NULL ORDER BY created_at ASC, id ASC LIMIT ?2"
    ))
    .bind(channel)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

/// Assign a backfilled `(sequence, number)` pair to one record
///
/// Guarded by `number IS NULL`: an already-numbered record is refused
/// rather than overwritten.
pub async fn assign_number(
    pool: &SqlitePool,
    id: i64,
    sequence: i64,
    number: &str,
) -> RepoResult<()> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET sequence = ?1, number = ?2, updated_at = ?3 WHERE id = ?4 AND number IS NULL",
    )
    .bind(sequence)
    .bind(number)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Validation(format!(
            "Order {id} is missing or already numbered"
        )));
    }
    Ok(())
}

pub async fn count_numbered(pool: &SqlitePool, channel: Channel) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM orders WHERE channel = ? AND number IS NOT NULL",
    )
    .bind(channel)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Highest sequence assigned in the channel, 0 if none
pub async fn max_sequence(pool: &SqlitePool, channel: Channel) -> RepoResult<i64> {
    let max = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(MAX(sequence), 0) FROM orders WHERE channel = ?",
    )
    .bind(channel)
    .fetch_one(pool)
    .await?;
    Ok(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
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

    async fn insert_legacy(pool: &SqlitePool, id: i64, channel: &str, created_at: i64) {
        sqlx::query(
            "INSERT INTO orders (id, channel, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
        )
        .bind(id)
        .bind(channel)
        .bind(created_at)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_insert_numbered_rejects_missing_number() {
        let pool = test_pool().await;
        let order = Order {
            id: 1,
            channel: Channel::Atelier,
            sequence: None,
            number: None,
            created_at: 0,
            updated_at: 0,
        };
        let err = insert_numbered(&pool, &order).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert!(find_by_id(&pool, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unnumbered_scan_orders_by_time_then_id() {
        let pool = test_pool().await;
        insert_legacy(&pool, 30, "LAB", 200).await;
        insert_legacy(&pool, 20, "LAB", 100).await;
        // created_at tie with id 20: lower id wins
        insert_legacy(&pool, 10, "LAB", 100).await;
        // other channel must not leak into the scan
        insert_legacy(&pool, 40, "AS", 50).await;

        let chunk = list_unnumbered_chunk(&pool, Channel::Lab, 10).await.unwrap();
        let ids: Vec<i64> = chunk.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);

        let chunk = list_unnumbered_chunk(&pool, Channel::Lab, 2).await.unwrap();
        assert_eq!(chunk.len(), 2);
    }

    #[tokio::test]
    async fn test_assign_number_never_overwrites() {
        let pool = test_pool().await;
        insert_legacy(&pool, 1, "AS", 100).await;

        assign_number(&pool, 1, 1, "№00001/AS").await.unwrap();

        let err = assign_number(&pool, 1, 2, "№00002/AS").await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        let order = find_by_id(&pool, 1).await.unwrap().unwrap();
        assert_eq!(order.sequence, Some(1));
        assert_eq!(order.number.as_deref(), Some("№00001/AS"));
    }

    #[tokio::test]
    async fn test_assign_number_missing_record() {
        let pool = test_pool().await;
        let err = assign_number(&pool, 99, 1, "№00001/AS").await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_count_and_max_follow_assignments() {
        let pool = test_pool().await;
        insert_legacy(&pool, 1, "LAB", 100).await;
        insert_legacy(&pool, 2, "LAB", 200).await;

        assert_eq!(count_numbered(&pool, Channel::Lab).await.unwrap(), 0);
        assert_eq!(max_sequence(&pool, Channel::Lab).await.unwrap(), 0);

        assign_number(&pool, 1, 1, "№00001/LAB").await.unwrap();
        assign_number(&pool, 2, 2, "№00002/LAB").await.unwrap();

        assert_eq!(count_numbered(&pool, Channel::Lab).await.unwrap(), 2);
        assert_eq!(max_sequence(&pool, Channel::Lab).await.unwrap(), 2);
    }
}
