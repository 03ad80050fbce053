//! Role Repository

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared::models::{Role, RoleWithCount};
use shared::permission::PermissionMatrix;
use shared::util::{new_id, now_millis};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};

const TABLE: &str = "role";

const FIELDS: &str = "record::id(id) AS id, name, description, isSuperAdmin, isDefault, \
                      isActive, permissions, createdAt, updatedAt";

/// Stored shape (everything but the key)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoleRecord {
    name: String,
    description: String,
    is_super_admin: bool,
    is_default: bool,
    is_active: bool,
    permissions: PermissionMatrix,
    created_at: i64,
    updated_at: i64,
}

impl From<&Role> for RoleRecord {
    fn from(r: &Role) -> Self {
        Self {
            name: r.name.clone(),
            description: r.description.clone(),
            is_super_admin: r.is_super_admin,
            is_default: r.is_default,
            is_active: r.is_active,
            permissions: r.permissions.clone(),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Insert payload, already validated by the caller
#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub description: String,
    pub is_super_admin: bool,
    pub is_default: bool,
    pub is_active: bool,
    pub permissions: PermissionMatrix,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoleUsage {
    role_id: Option<String>,
    total: u64,
}

#[derive(Clone)]
pub struct RoleRepository {
    base: BaseRepository,
}

impl RoleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All roles, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Role>> {
        let roles: Vec<Role> = self
            .base
            .db()
            .query(format!("SELECT {FIELDS} FROM role ORDER BY createdAt DESC"))
            .await?
            .take(0)?;
        Ok(roles)
    }

    /// All roles with the number of admins assigned to each
    pub async fn find_all_with_counts(&self) -> RepoResult<Vec<RoleWithCount>> {
        let roles = self.find_all().await?;
        let usage: Vec<RoleUsage> = self
            .base
            .db()
            .query("SELECT roleId, count() AS total FROM admin GROUP BY roleId")
            .await?
            .take(0)?;
        let counts: HashMap<String, u64> = usage
            .into_iter()
            .filter_map(|u| u.role_id.map(|id| (id, u.total)))
            .collect();

        Ok(roles
            .into_iter()
            .map(|role| RoleWithCount {
                admin_count: counts.get(&role.id).copied().unwrap_or(0),
                role,
            })
            .collect())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Role>> {
        let mut result = self
            .base
            .db()
            .query(format!("SELECT {FIELDS} FROM type::thing('role', $id)"))
            .bind(("id", id.to_string()))
            .await?;
        let roles: Vec<Role> = result.take(0)?;
        Ok(roles.into_iter().next())
    }

    /// Case-insensitive name lookup
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Role>> {
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT {FIELDS} FROM role WHERE string::lowercase(name) = $name"
            ))
            .bind(("name", name.trim().to_lowercase()))
            .await?;
        let roles: Vec<Role> = result.take(0)?;
        Ok(roles.into_iter().next())
    }

    /// Oldest active default role without superadmin rights (self-registration)
    pub async fn find_registration_default(&self) -> RepoResult<Option<Role>> {
        // Sorted in Rust: WHERE + ORDER BY + LIMIT drops rows on embedded SurrealDB
        let mut roles: Vec<Role> = self
            .base
            .db()
            .query(format!(
                "SELECT {FIELDS} FROM role \
                 WHERE isDefault = true AND isActive = true AND isSuperAdmin = false"
            ))
            .await?
            .take(0)?;
        roles.sort_by_key(|r| r.created_at);
        Ok(roles.into_iter().next())
    }

    pub async fn count(&self) -> RepoResult<u64> {
        self.base.count(TABLE).await
    }

    pub async fn create(&self, data: NewRole) -> RepoResult<Role> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Role '{}' already exists",
                data.name
            )));
        }

        let now = now_millis();
        let id = new_id();
        let record = RoleRecord {
            name: data.name.trim().to_string(),
            description: data.description,
            is_super_admin: data.is_super_admin,
            is_default: data.is_default,
            is_active: data.is_active,
            permissions: data.permissions,
            created_at: now,
            updated_at: now,
        };

        self.base
            .db()
            .query("CREATE type::thing('role', $id) CONTENT $data")
            .bind(("id", id.clone()))
            .bind(("data", record))
            .await?
            .check()?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create role".to_string()))
    }

    /// Persist a modified role; the permission matrix is replaced wholesale
    pub async fn save(&self, role: &Role) -> RepoResult<Role> {
        if let Some(other) = self.find_by_name(&role.name).await?
            && other.id != role.id
        {
            return Err(RepoError::Duplicate(format!(
                "Role '{}' already exists",
                role.name
            )));
        }

        let mut record = RoleRecord::from(role);
        record.updated_at = now_millis();

        self.base
            .db()
            .query("UPDATE type::thing('role', $id) CONTENT $data")
            .bind(("id", role.id.clone()))
            .bind(("data", record))
            .await?
            .check()?;

        self.find_by_id(&role.id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Role {} not found", role.id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.base.delete(TABLE, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::permission::{Action, Module};

    async fn repo() -> RoleRepository {
        let db = DbService::memory().await.unwrap().db;
        RoleRepository::new(db)
    }

    fn new_role(name: &str) -> NewRole {
        NewRole {
            name: name.to_string(),
            description: String::new(),
            is_super_admin: false,
            is_default: false,
            is_active: true,
            permissions: PermissionMatrix::default_skeleton(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = repo().await;
        let role = repo.create(new_role("Editors")).await.unwrap();

        let found = repo.find_by_id(&role.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Editors");
        assert_eq!(found.permissions, PermissionMatrix::default_skeleton());
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_name_is_unique_case_insensitively() {
        let repo = repo().await;
        repo.create(new_role("Editors")).await.unwrap();
        let err = repo.create(new_role("EDITORS")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_save_replaces_permissions_wholesale() {
        let repo = repo().await;
        let mut role = repo
            .create(NewRole {
                permissions: PermissionMatrix::new()
                    .with(Module::Products, Action::View, true)
                    .with(Module::Orders, Action::View, true),
                ..new_role("Support")
            })
            .await
            .unwrap();

        role.permissions = PermissionMatrix::new().with(Module::Users, Action::Edit, true);
        let saved = repo.save(&role).await.unwrap();

        assert!(!saved.permissions.has_module(Module::Products));
        assert!(!saved.permissions.has_module(Module::Orders));
        assert!(saved.permissions.allows(Module::Users, Action::Edit));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        let role = repo.create(new_role("Temp")).await.unwrap();
        assert!(repo.delete(&role.id).await.unwrap());
        assert!(!repo.delete(&role.id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
