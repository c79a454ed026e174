use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::counter;
use crate::orders::OrderService;
use crate::utils::AppError;
use shared::models::Channel;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub orders: OrderService,
}

impl ServerState {
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        // 1. Initialize DB
        let db_path = config.db_path();
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        let pool = db_service.pool;

        // 2. Pre-seed every channel counter so the first allocation on a
        // channel costs the same as any other
        for channel in Channel::ALL {
            counter::ensure(&pool, channel).await?;
        }

        Ok(Self {
            config: config.clone(),
            orders: OrderService::new(pool.clone()),
            pool,
        })
    }
}
