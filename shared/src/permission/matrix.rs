//! Permission matrix: module → action → granted
//!
//! Modules and actions are closed enums. A missing module or action entry is
//! a denial; only an explicit `true` grants.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error parsing a module, action or `module.action` string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePermissionError {
    #[error("unknown module `{0}`")]
    UnknownModule(String),
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("invalid permission `{0}`, expected `module.action`")]
    Malformed(String),
}

/// Admin panel module guarded by the permission matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Dashboard,
    Users,
    Products,
    Orders,
    Analytics,
    Roles,
    Admins,
    Settings,
    ActivityLogs,
    Pages,
    DataModels,
}

impl Module {
    /// Every module routes can check
    pub const ALL: [Module; 11] = [
        Module::Dashboard,
        Module::Users,
        Module::Products,
        Module::Orders,
        Module::Analytics,
        Module::Roles,
        Module::Admins,
        Module::Settings,
        Module::ActivityLogs,
        Module::Pages,
        Module::DataModels,
    ];

    /// Modules present in a freshly created role.
    ///
    /// `activity_logs`, `pages` and `data_models` are checked by routes but
    /// are not part of the skeleton, so older roles deny them until an
    /// admin grants them explicitly.
    pub const SKELETON: [Module; 8] = [
        Module::Dashboard,
        Module::Users,
        Module::Products,
        Module::Orders,
        Module::Analytics,
        Module::Roles,
        Module::Admins,
        Module::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Users => "users",
            Module::Products => "products",
            Module::Orders => "orders",
            Module::Analytics => "analytics",
            Module::Roles => "roles",
            Module::Admins => "admins",
            Module::Settings => "settings",
            Module::ActivityLogs => "activity_logs",
            Module::Pages => "pages",
            Module::DataModels => "data_models",
        }
    }

    /// Actions the admin UI offers for this module
    pub fn actions(&self) -> &'static [Action] {
        const CRUD: &[Action] = &[Action::View, Action::Create, Action::Edit, Action::Delete];
        match self {
            Module::Dashboard | Module::Settings => &[Action::View, Action::Edit],
            Module::Analytics | Module::ActivityLogs => &[Action::View],
            _ => CRUD,
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Module::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParsePermissionError::UnknownModule(s.to_string()))
    }
}

/// Operation on a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Create, Action::Edit, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ParsePermissionError::UnknownAction(s.to_string()))
    }
}

/// A `{module, action}` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub module: Module,
    pub action: Action,
}

impl Permission {
    pub const fn new(module: Module, action: Action) -> Self {
        Self { module, action }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.action)
    }
}

impl FromStr for Permission {
    type Err = ParsePermissionError;

    /// Parse `"products.create"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (module, action) = s
            .split_once('.')
            .ok_or_else(|| ParsePermissionError::Malformed(s.to_string()))?;
        Ok(Self::new(module.parse()?, action.parse()?))
    }
}

/// Role permission matrix
///
/// Serialized as `{ "<module>": { "<action>": bool } }`. Unknown module or
/// action keys are rejected on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionMatrix(BTreeMap<Module, BTreeMap<Action, bool>>);

impl PermissionMatrix {
    /// Empty matrix (denies everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Skeleton of a new role: the classic modules, every action `false`
    pub fn default_skeleton() -> Self {
        let mut matrix = Self::new();
        for module in Module::SKELETON {
            for action in module.actions() {
                matrix.set(module, *action, false);
            }
        }
        matrix
    }

    /// Every module and action granted
    pub fn full() -> Self {
        let mut matrix = Self::new();
        for module in Module::ALL {
            for action in module.actions() {
                matrix.set(module, *action, true);
            }
        }
        matrix
    }

    /// Builder form of [`set`](Self::set)
    pub fn with(mut self, module: Module, action: Action, granted: bool) -> Self {
        self.set(module, action, granted);
        self
    }

    /// Builder that grants every listed permission
    pub fn granting(permissions: &[Permission]) -> Self {
        permissions
            .iter()
            .fold(Self::new(), |m, p| m.with(p.module, p.action, true))
    }

    pub fn set(&mut self, module: Module, action: Action, granted: bool) {
        self.0.entry(module).or_default().insert(action, granted);
    }

    /// Whether the module has an entry at all
    pub fn has_module(&self, module: Module) -> bool {
        self.0.contains_key(&module)
    }

    /// Strict lookup: only an explicit `true` grants
    pub fn allows(&self, module: Module, action: Action) -> bool {
        self.0
            .get(&module)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(false)
    }

    pub fn allows_permission(&self, permission: &Permission) -> bool {
        self.allows(permission.module, permission.action)
    }

    /// All explicitly granted permissions, in module/action order
    pub fn granted(&self) -> Vec<Permission> {
        self.0
            .iter()
            .flat_map(|(module, actions)| {
                actions
                    .iter()
                    .filter(|(_, granted)| **granted)
                    .map(move |(action, _)| Permission::new(*module, *action))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PermissionMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (module, actions) in &self.0 {
            let inner: BTreeMap<&str, bool> =
                actions.iter().map(|(a, g)| (a.as_str(), *g)).collect();
            map.serialize_entry(module.as_str(), &inner)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PermissionMatrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, BTreeMap<String, bool>>::deserialize(deserializer)?;
        let mut matrix = BTreeMap::new();
        for (module, actions) in raw {
            let module: Module = module.parse().map_err(de::Error::custom)?;
            let entry: &mut BTreeMap<Action, bool> = matrix.entry(module).or_default();
            for (action, granted) in actions {
                let action: Action = action.parse().map_err(de::Error::custom)?;
                entry.insert(action, granted);
            }
        }
        Ok(Self(matrix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_is_denied() {
        let matrix = PermissionMatrix::new().with(Module::Products, Action::View, true);
        assert!(matrix.allows(Module::Products, Action::View));
        assert!(!matrix.allows(Module::Products, Action::Create));
        assert!(!matrix.allows(Module::Pages, Action::View));
        assert!(!matrix.has_module(Module::Pages));
    }

    #[test]
    fn test_skeleton_leaves_newer_modules_out() {
        let skeleton = PermissionMatrix::default_skeleton();
        assert!(skeleton.has_module(Module::Settings));
        assert!(!skeleton.has_module(Module::ActivityLogs));
        assert!(!skeleton.has_module(Module::Pages));
        assert!(!skeleton.has_module(Module::DataModels));
        assert!(skeleton.granted().is_empty());
    }

    #[test]
    fn test_wire_shape() {
        let matrix = PermissionMatrix::new()
            .with(Module::ActivityLogs, Action::View, true)
            .with(Module::Products, Action::Create, false);
        let json = serde_json::to_value(&matrix).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "activity_logs": { "view": true },
                "products": { "create": false }
            })
        );
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = serde_json::from_str::<PermissionMatrix>(r#"{"billing":{"view":true}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown module `billing`"));

        let err = serde_json::from_str::<PermissionMatrix>(r#"{"users":{"export":true}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown action `export`"));
    }

    #[test]
    fn test_empty_module_entry_is_kept() {
        let matrix: PermissionMatrix = serde_json::from_str(r#"{"orders":{}}"#).unwrap();
        assert!(matrix.has_module(Module::Orders));
        assert!(!matrix.allows(Module::Orders, Action::View));
    }

    #[test]
    fn test_permission_parse_and_display() {
        let p: Permission = "activity_logs.view".parse().unwrap();
        assert_eq!(p, Permission::new(Module::ActivityLogs, Action::View));
        assert_eq!(p.to_string(), "activity_logs.view");
        assert!("products".parse::<Permission>().is_err());
        assert!("products.archive".parse::<Permission>().is_err());
    }
}
