use thiserror::Error;

use crate::utils::AppError;

/// 服务器启动和运行错误
///
/// 请求级错误使用 [`AppError`]；这里只覆盖进程级失败。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("工作目录错误: {0}")]
    WorkDir(#[from] std::io::Error),

    #[error("数据库初始化失败: {0}")]
    Database(AppError),

    #[error("初始数据写入失败: {0}")]
    Bootstrap(AppError),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// 服务器 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
