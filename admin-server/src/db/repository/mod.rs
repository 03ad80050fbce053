//! Repository Module
//!
//! CRUD operations over the SurrealDB tables.

pub mod activity_log;
pub mod admin;
pub mod app_settings;
pub mod page;
pub mod role;
pub mod user;

// Re-exports
pub use activity_log::ActivityLogRepository;
pub use admin::{AdminCredentials, AdminRepository, NewAdmin};
pub use app_settings::AppSettingsRepository;
pub use page::PageRepository;
pub use role::RoleRepository;
pub use user::UserRepository;

use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations surface as "Database index `x` already contains ..."
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention
// =============================================================================
//
// Record keys are hyphen-free UUID strings (`shared::util::new_id`).
//   - address a record: type::thing('role', $id)
//   - read the key back: record::id(id) AS id
// Field names are stored camelCase, matching the API models, so rows
// deserialize straight into `shared::models`.

/// `SELECT count() AS total ... GROUP ALL`
#[derive(Debug, Deserialize)]
pub(crate) struct CountRow {
    pub total: u64,
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Count rows of `table` matching `condition` (a SurrealQL expression)
    pub async fn count_where(
        &self,
        table: &str,
        condition: &str,
        bindings: Vec<(&'static str, String)>,
    ) -> RepoResult<u64> {
        let sql = format!("SELECT count() AS total FROM {table} WHERE {condition} GROUP ALL");
        let mut query = self.db.query(sql);
        for binding in bindings {
            query = query.bind(binding);
        }
        let row: Option<CountRow> = query.await?.take(0)?;
        Ok(row.map(|r| r.total).unwrap_or(0))
    }

    /// Count all rows of `table`
    pub async fn count(&self, table: &str) -> RepoResult<u64> {
        let sql = format!("SELECT count() AS total FROM {table} GROUP ALL");
        let row: Option<CountRow> = self.db.query(sql).await?.take(0)?;
        Ok(row.map(|r| r.total).unwrap_or(0))
    }

    /// Delete a record by key; returns whether it existed
    pub async fn delete(&self, table: &'static str, id: &str) -> RepoResult<bool> {
        if !self.exists(table, id).await? {
            return Ok(false);
        }
        self.db
            .query("DELETE type::thing($tb, $id)")
            .bind(("tb", table))
            .bind(("id", id.to_string()))
            .await?
            .check()?;
        Ok(true)
    }

    pub async fn exists(&self, table: &'static str, id: &str) -> RepoResult<bool> {
        let keys: Vec<String> = self
            .db
            .query("SELECT VALUE record::id(id) FROM type::thing($tb, $id)")
            .bind(("tb", table))
            .bind(("id", id.to_string()))
            .await?
            .take(0)?;
        Ok(!keys.is_empty())
    }
}
