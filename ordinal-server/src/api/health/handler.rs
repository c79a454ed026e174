//! Health API Handlers

use axum::Json;
use serde::Serialize;

use crate::utils::{AppResponse, ok};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// GET /api/health - 健康检查
pub async fn health() -> Json<AppResponse<HealthStatus>> {
    ok(HealthStatus { status: "ok" })
}
