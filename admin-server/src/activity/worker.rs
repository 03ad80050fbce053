//! 活动日志后台 Worker
//!
//! 从 mpsc 通道消费日志，写入 SurrealDB。通道关闭时自动退出。

use tokio::sync::mpsc;

use crate::db::repository::ActivityLogRepository;
use crate::db::repository::activity_log::NewActivityLog;

pub struct ActivityWorker {
    repo: ActivityLogRepository,
}

impl ActivityWorker {
    pub fn new(repo: ActivityLogRepository) -> Self {
        Self { repo }
    }

    /// 运行 worker（阻塞直到通道关闭）
    pub async fn run(self, mut rx: mpsc::Receiver<NewActivityLog>) {
        tracing::info!("📋 Activity log worker started");

        while let Some(entry) = rx.recv().await {
            let action = entry.action_type;
            let admin_id = entry.admin_id.clone();
            match self.repo.insert(entry).await {
                Ok(id) => {
                    tracing::debug!(log_id = %id, action = %action, "Activity recorded");
                }
                Err(e) => {
                    // 写入失败不影响业务请求
                    tracing::error!(admin_id = %admin_id, action = %action, "Failed to write activity log: {}", e);
                }
            }
        }

        tracing::info!("Activity log channel closed, worker stopping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::{ActionType, ActivityLogQuery};

    #[tokio::test]
    async fn test_worker_drains_channel() {
        let db = DbService::memory().await.unwrap().db;
        let repo = ActivityLogRepository::new(db);
        let (tx, rx) = mpsc::channel(8);

        tx.send(NewActivityLog {
            admin_id: "a1".into(),
            action_type: ActionType::Logout,
            description: "Admin logged out".into(),
            affected_record: None,
            ip_address: Some("127.0.0.1".into()),
            user_agent: None,
            created_at: 1,
        })
        .await
        .unwrap();
        drop(tx);

        ActivityWorker::new(repo.clone()).run(rx).await;

        let (logs, total) = repo.query(&ActivityLogQuery::default()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(logs[0].ip_address.as_deref(), Some("127.0.0.1"));
    }
}
