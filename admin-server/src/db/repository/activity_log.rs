//! Activity Log Repository
//!
//! Append-only: entries are inserted by the activity worker and read by the
//! activity-log API. There is no update or delete.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{ActionType, ActivityLog, ActivityLogQuery, AdminSummary};
use shared::util::new_id;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoResult};

const FIELDS: &str = "record::id(id) AS id, adminId, actionType, description, affectedRecord, \
                      ipAddress, userAgent, createdAt";

const KEY_FIELDS: &str = "record::id(id) AS id, actionType, createdAt";

/// Entry to append
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivityLog {
    pub admin_id: String,
    pub action_type: ActionType,
    pub description: String,
    pub affected_record: Option<Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityLogRow {
    id: String,
    admin_id: String,
    action_type: ActionType,
    description: String,
    #[serde(default)]
    affected_record: Option<Value>,
    #[serde(default)]
    ip_address: Option<String>,
    #[serde(default)]
    user_agent: Option<String>,
    created_at: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogKey {
    id: String,
    action_type: ActionType,
    created_at: i64,
}

#[derive(Clone)]
pub struct ActivityLogRepository {
    base: BaseRepository,
}

impl ActivityLogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn insert(&self, entry: NewActivityLog) -> RepoResult<String> {
        let id = new_id();
        self.base
            .db()
            .query("CREATE type::thing('activity_log', $id) CONTENT $data")
            .bind(("id", id.clone()))
            .bind(("data", entry))
            .await?
            .check()?;
        Ok(id)
    }

    pub async fn count(&self) -> RepoResult<u64> {
        self.base.count("activity_log").await
    }

    /// Filtered page of entries (newest first) and the filtered total
    ///
    /// Without filters the page is cut by the database. With filters only
    /// `(id, actionType, createdAt)` keys are loaded and paged in Rust, then
    /// the page's full rows are fetched by id: WHERE + ORDER BY + LIMIT
    /// drops rows on embedded SurrealDB.
    pub async fn query(&self, q: &ActivityLogQuery) -> RepoResult<(Vec<ActivityLog>, u64)> {
        let admin_filter = q.admin.as_deref().map(str::trim).filter(|a| !a.is_empty());
        let action_filter = q.action_type.as_deref().map(str::trim).filter(|a| !a.is_empty());
        let limit = q.limit() as usize;
        let offset = (q.page() as usize - 1) * limit;

        let (rows, total) = if admin_filter.is_none() && action_filter.is_none() {
            let rows: Vec<ActivityLogRow> = self
                .base
                .db()
                .query(format!(
                    "SELECT {FIELDS} FROM activity_log ORDER BY createdAt DESC LIMIT $limit START $offset"
                ))
                .bind(("limit", limit as i64))
                .bind(("offset", offset as i64))
                .await?
                .take(0)?;
            (rows, self.count().await?)
        } else {
            self.filtered_page(admin_filter, q, offset, limit).await?
        };

        let admins = self.admin_summaries(&rows).await?;
        let logs = rows
            .into_iter()
            .map(|r| ActivityLog {
                admin: admins.get(&r.admin_id).cloned(),
                id: r.id,
                action_type: r.action_type,
                description: r.description,
                affected_record: r.affected_record,
                ip_address: r.ip_address,
                user_agent: r.user_agent,
                created_at: r.created_at,
            })
            .collect();

        Ok((logs, total))
    }

    async fn filtered_page(
        &self,
        admin_filter: Option<&str>,
        q: &ActivityLogQuery,
        offset: usize,
        limit: usize,
    ) -> RepoResult<(Vec<ActivityLogRow>, u64)> {
        let mut keys: Vec<LogKey> = match admin_filter {
            Some(admin_id) => self
                .base
                .db()
                .query(format!("SELECT {KEY_FIELDS} FROM activity_log WHERE adminId = $admin"))
                .bind(("admin", admin_id.to_string()))
                .await?
                .take(0)?,
            None => self
                .base
                .db()
                .query(format!("SELECT {KEY_FIELDS} FROM activity_log"))
                .await?
                .take(0)?,
        };

        keys.retain(|k| q.matches_action(k.action_type));
        keys.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = keys.len() as u64;

        let ids: Vec<String> = keys.into_iter().skip(offset).take(limit).map(|k| k.id).collect();
        if ids.is_empty() {
            return Ok((Vec::new(), total));
        }

        let mut rows: Vec<ActivityLogRow> = self
            .base
            .db()
            .query(format!("SELECT {FIELDS} FROM activity_log WHERE record::id(id) IN $ids"))
            .bind(("ids", ids))
            .await?
            .take(0)?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok((rows, total))
    }

    async fn admin_summaries(
        &self,
        rows: &[ActivityLogRow],
    ) -> RepoResult<HashMap<String, AdminSummary>> {
        let mut ids: Vec<String> = rows.iter().map(|r| r.admin_id.clone()).collect();
        ids.sort();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let summaries: Vec<AdminSummary> = self
            .base
            .db()
            .query("SELECT record::id(id) AS id, name, email FROM admin WHERE record::id(id) IN $ids")
            .bind(("ids", ids))
            .await?
            .take(0)?;
        Ok(summaries.into_iter().map(|s| (s.id.clone(), s)).collect())
    }
}
