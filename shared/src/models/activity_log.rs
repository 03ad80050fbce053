//! Activity Log Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AdminSummary;

/// Kind of recorded admin action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Login,
    Logout,
    Create,
    Update,
    Delete,
    RoleChange,
    SettingsUpdate,
    PageCreate,
    PageUpdate,
    PageDelete,
    Other,
}

impl ActionType {
    pub const ALL: [ActionType; 11] = [
        ActionType::Login,
        ActionType::Logout,
        ActionType::Create,
        ActionType::Update,
        ActionType::Delete,
        ActionType::RoleChange,
        ActionType::SettingsUpdate,
        ActionType::PageCreate,
        ActionType::PageUpdate,
        ActionType::PageDelete,
        ActionType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Login => "login",
            ActionType::Logout => "logout",
            ActionType::Create => "create",
            ActionType::Update => "update",
            ActionType::Delete => "delete",
            ActionType::RoleChange => "role_change",
            ActionType::SettingsUpdate => "settings_update",
            ActionType::PageCreate => "page_create",
            ActionType::PageUpdate => "page_update",
            ActionType::PageDelete => "page_delete",
            ActionType::Other => "other",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored log entry, admin populated as `{id, name, email}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    /// `None` when the admin has since been deleted
    pub admin: Option<AdminSummary>,
    pub action_type: ActionType,
    pub description: String,
    #[serde(default)]
    pub affected_record: Option<Value>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    pub created_at: i64,
}

/// `GET /api/activity-logs` query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogQuery {
    /// Case-insensitive substring of the action type
    pub action_type: Option<String>,
    /// Admin id
    pub admin: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ActivityLogQuery {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    /// Whether an action type passes the `actionType` filter
    pub fn matches_action(&self, action: ActionType) -> bool {
        match self.action_type.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => action.as_str().contains(&needle.to_ascii_lowercase()),
        }
    }
}

/// Pagination block returned in `meta`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_wire_names() {
        for action in ActionType::ALL {
            let json = serde_json::to_value(action).unwrap();
            assert_eq!(json, action.as_str());
        }
    }

    #[test]
    fn test_query_defaults_and_clamp() {
        let q = ActivityLogQuery::default();
        assert_eq!((q.page(), q.limit()), (1, 10));

        let q = ActivityLogQuery {
            page: Some(0),
            limit: Some(1000),
            ..Default::default()
        };
        assert_eq!((q.page(), q.limit()), (1, 100));
    }

    #[test]
    fn test_action_filter_is_case_insensitive_substring() {
        let q = ActivityLogQuery {
            action_type: Some("PAGE".into()),
            ..Default::default()
        };
        assert!(q.matches_action(ActionType::PageCreate));
        assert!(!q.matches_action(ActionType::Login));
    }
}
