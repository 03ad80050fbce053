//! Database Module
//!
//! Embedded SurrealDB (RocksDB on disk, in-memory for tests) and schema setup.

pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "admin";
const DATABASE: &str = "panel";

/// Tables are schemaless; only uniqueness and lookup indexes are declared.
const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS role SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS role_created ON role FIELDS createdAt;

    DEFINE TABLE IF NOT EXISTS admin SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS admin_email ON admin FIELDS email UNIQUE;
    DEFINE INDEX IF NOT EXISTS admin_role ON admin FIELDS roleId;

    DEFINE TABLE IF NOT EXISTS page SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS page_slug ON page FIELDS slug UNIQUE;

    DEFINE TABLE IF NOT EXISTS app_settings SCHEMALESS;

    DEFINE TABLE IF NOT EXISTS activity_log SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS activity_log_admin ON activity_log FIELDS adminId;
    DEFINE INDEX IF NOT EXISTS activity_log_created ON activity_log FIELDS createdAt;

    DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS user_email ON user FIELDS email UNIQUE;
"#;

/// Database service - owns the SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        let service = Self::prepare(db).await?;
        tracing::info!(path = %db_path, "Database connection established (SurrealDB/RocksDB)");
        Ok(service)
    }

    /// In-memory database (tests, throwaway runs)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|r| r.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::debug!("Database schema applied");

        Ok(Self { db })
    }
}
