//! API 路由模块
//!
//! | 模块 | 前缀 | 权限 |
//! |------|------|------|
//! | [`health`] | /api/health | 公开 |
//! | [`auth`] | /api/auth | 登录/注册公开，其余需认证 |
//! | [`profile`] | /api/profile | 仅需认证 |
//! | [`roles`] | /api/roles | roles.* |
//! | [`admins`] | /api/admins | admins.* |
//! | [`app_settings`] | /api/app-settings | 部分公开，settings.* |
//! | [`pages`] | /api/pages | pages.* |
//! | [`activity_logs`] | /api/activity-logs | activity_logs.view |
//! | [`users`] | /api/users | users.* |
//! | [`dashboard`] | /api/dashboard, /api/products, /api/orders, /api/analytics | 各模块权限 |

pub mod activity_logs;
pub mod admins;
pub mod app_settings;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod pages;
pub mod profile;
pub mod roles;
pub mod users;

use crate::db::repository::RepoError;
use crate::utils::{AppError, ErrorCode};

/// 把仓储层的重复错误映射为领域错误码，其余错误原样返回
pub(crate) fn duplicate_as(code: ErrorCode) -> impl FnOnce(RepoError) -> AppError {
    move |err| match err {
        RepoError::Duplicate(_) => AppError::new(code),
        other => other.into(),
    }
}
