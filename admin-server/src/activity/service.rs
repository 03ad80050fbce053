//! 活动日志服务
//!
//! 通过 mpsc 通道把日志交给后台 worker；通道满或已关闭时只记录本地日志。

use std::sync::Arc;

use serde_json::Value;
use shared::models::ActionType;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::RequestMeta;
use crate::db::repository::activity_log::NewActivityLog;

/// 活动日志服务
#[derive(Debug)]
pub struct ActivityLogService {
    tx: mpsc::Sender<NewActivityLog>,
}

impl ActivityLogService {
    /// 创建服务，返回接收端交给 [`super::ActivityWorker`]
    pub fn new(buffer_size: usize) -> (Arc<Self>, mpsc::Receiver<NewActivityLog>) {
        let (tx, rx) = mpsc::channel(buffer_size.max(1));
        (Arc::new(Self { tx }), rx)
    }

    /// 记录管理员操作；不阻塞，也不会让调用方失败
    pub fn record(
        &self,
        admin_id: &str,
        action_type: ActionType,
        description: impl Into<String>,
        affected_record: Option<Value>,
        meta: &RequestMeta,
    ) {
        let entry = NewActivityLog {
            admin_id: admin_id.to_string(),
            action_type,
            description: description.into(),
            affected_record,
            ip_address: meta.ip.clone(),
            user_agent: meta.user_agent.clone(),
            created_at: shared::util::now_millis(),
        };

        match self.tx.try_send(entry) {
            Ok(()) => {}
            Err(TrySendError::Full(entry)) => {
                tracing::warn!(
                    admin_id = %entry.admin_id,
                    action = %entry.action_type,
                    "Activity log channel full, entry dropped"
                );
            }
            Err(TrySendError::Closed(entry)) => {
                tracing::error!(
                    admin_id = %entry.admin_id,
                    action = %entry.action_type,
                    "Activity log channel closed, entry dropped"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_is_queued() {
        let (service, mut rx) = ActivityLogService::new(4);
        service.record(
            "a1",
            ActionType::Login,
            "Admin logged in",
            None,
            &RequestMeta::default(),
        );

        let entry = rx.recv().await.unwrap();
        assert_eq!(entry.admin_id, "a1");
        assert_eq!(entry.action_type, ActionType::Login);
    }

    #[tokio::test]
    async fn test_full_or_closed_channel_is_swallowed() {
        let (service, rx) = ActivityLogService::new(1);
        let meta = RequestMeta::default();
        service.record("a1", ActionType::Other, "first", None, &meta);
        service.record("a1", ActionType::Other, "dropped", None, &meta);

        drop(rx);
        service.record("a1", ActionType::Other, "closed", None, &meta);
    }
}
