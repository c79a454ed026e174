//! Ordinal Server - 多渠道订单编号服务
//!
//! Per-channel order numbering for independent storefronts: atomic
//! sequence allocation on the live creation path, a pure deterministic
//! number format, and an offline backfill reconciler for records that
//! predate numbering.
//!
//! # 模块结构
//!
//! ```text
//! ordinal-server/src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (SQLite + 仓储)
//! ├── numbering/     # 序号分配与回填
//! ├── orders/        # 订单创建服务
//! └── utils/         # 错误、日志等工具
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod numbering;
pub mod orders;
pub mod routes;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

/// Prepare process environment: dotenv, then logging
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}
