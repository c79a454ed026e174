//! Channel Counter API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::repository::counter;
use crate::utils::{AppResponse, AppResult, ok};
use shared::models::ChannelCounter;

/// GET /api/system/counters - 渠道计数器一览
///
/// Operator-facing inspection only; counters are never mutated over HTTP.
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<ChannelCounter>>>> {
    let counters = counter::find_all(&state.pool).await?;
    Ok(ok(counters))
}
