use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::activity::{ActivityLogService, ActivityWorker};
use crate::auth::{JwtConfig, JwtService};
use crate::bootstrap;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::{
    ActivityLogRepository, AdminRepository, AppSettingsRepository, PageRepository,
    RoleRepository, UserRepository,
};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 克隆成本很低：数据库句柄和各服务内部都是 Arc。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 |
/// | jwt_service | JWT 认证服务 |
/// | activity | 活动日志 (异步写入) |
/// | roles / admins / pages / settings / activity_logs / users | 仓储 |
///
/// 权限数据不在这里缓存，每个请求都重新读取。
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub activity: Arc<ActivityLogService>,
    pub roles: RoleRepository,
    pub admins: AdminRepository,
    pub pages: PageRepository,
    pub settings: AppSettingsRepository,
    pub activity_logs: ActivityLogRepository,
    pub users: UserRepository,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("jwt_service", &self.jwt_service)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/admin.db)
    /// 3. 服务和仓储，启动活动日志 worker
    /// 4. 初始数据 (默认角色、首个管理员)
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir().join("admin.db");
        let db = DbService::new(&db_path.to_string_lossy())
            .await
            .map_err(ServerError::Database)?
            .db;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let state = Self::assemble(config.clone(), db, jwt_service);

        bootstrap::run(&state)
            .await
            .map_err(ServerError::Bootstrap)?;

        Ok(state)
    }

    /// 内存数据库 + 固定 JWT 密钥的状态 (测试用)
    ///
    /// 不写入任何初始数据。
    pub async fn for_tests(work_dir: impl Into<String>) -> Result<Self> {
        let mut config = Config::with_overrides(work_dir, 0);
        config.jwt = JwtConfig {
            secret: "test-secret-key-that-is-long-enough-32".to_string(),
            expiration_minutes: 60,
            issuer: "admin-server".to_string(),
            audience: "admin-panel".to_string(),
        };
        config.environment = "test".to_string();
        config.bootstrap_admin = None;
        config.ensure_work_dir_structure()?;

        let db = DbService::memory()
            .await
            .map_err(ServerError::Database)?
            .db;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Ok(Self::assemble(config, db, jwt_service))
    }

    fn assemble(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        let activity_logs = ActivityLogRepository::new(db.clone());
        let (activity, rx) = ActivityLogService::new(config.activity_log_buffer);
        tokio::spawn(ActivityWorker::new(activity_logs.clone()).run(rx));

        Self {
            roles: RoleRepository::new(db.clone()),
            admins: AdminRepository::new(db.clone()),
            pages: PageRepository::new(db.clone()),
            settings: AppSettingsRepository::new(db.clone()),
            users: UserRepository::new(db.clone()),
            activity_logs,
            activity,
            jwt_service,
            config,
            db,
        }
    }
}
