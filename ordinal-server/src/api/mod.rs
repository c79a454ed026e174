//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单创建与查询（编号分配边界）
//! - [`counters`] - 渠道计数器查询

pub mod counters;
pub mod health;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
