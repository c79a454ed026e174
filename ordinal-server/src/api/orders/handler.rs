//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{Channel, Order, OrderCreate};

/// POST /api/orders - 创建订单（分配订单号）
///
/// Allocation failure fails the whole creation; no order is persisted
/// without a number.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<AppResponse<Order>>> {
    let channel = Channel::from_code(&payload.channel)?;
    let order = state.orders.create(channel).await?;
    Ok(ok(order))
}

/// GET /api/orders/:id - 查询订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .orders
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;
    Ok(ok(order))
}
