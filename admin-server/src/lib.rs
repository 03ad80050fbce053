//! Admin Server - 基于角色权限矩阵的后台管理服务
//!
//! # 架构概述
//!
//! - **认证** (`auth`): JWT + Argon2，全局认证中间件与逐路由权限中间件
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **活动日志** (`activity`): 后台 worker 异步写入，失败不影响请求
//! - **HTTP API** (`api`): 角色、管理员、页面、应用设置等 REST 接口
//!
//! # 模块结构
//!
//! ```text
//! admin-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT、密码、权限判定、中间件
//! ├── activity/      # 活动日志通道和 worker
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由汇总与中间件栈
//! ├── middleware/    # 请求日志
//! ├── bootstrap.rs   # 默认角色与首个管理员
//! ├── utils/         # 日志初始化、错误类型
//! └── db/            # 数据库层
//! ```

pub mod activity;
pub mod api;
pub mod auth;
pub mod bootstrap;
pub mod core;
pub mod db;
pub mod middleware;
pub mod routes;
pub mod utils;

// 重新导出公共类型
pub use auth::{AccessGrant, CurrentAdmin, JwtService};
pub use core::{Config, Server, ServerState};
pub use routes::{build_app, build_router};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::{init_logger, init_logger_with_file};

// 安全日志宏 - target 为 "security"，便于单独过滤
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 .env 并初始化日志
///
/// `LOG_LEVEL` / `LOG_DIR` / `LOG_JSON` 控制日志输出。
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
    let json = std::env::var("LOG_JSON")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(log_level.as_deref(), json, log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ___       __          _
   /   | ____/ /___ ___  (_)___
  / /| |/ __  / __ `__ \/ / __ \
 / ___ / /_/ / / / / / / / / / /
/_/  |_\__,_/_/ /_/ /_/_/_/ /_/
        Admin Server v{}
    "#,
        env!("CARGO_PKG_VERSION")
    );
}
