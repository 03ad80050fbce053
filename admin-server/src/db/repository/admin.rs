//! Admin Repository
//!
//! The password hash is stored on the record but never part of [`Admin`];
//! it is only read through [`AdminRepository::find_credentials`].

use serde::Serialize;
use shared::models::{Admin, Preferences};
use shared::util::{new_id, now_millis};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};

const TABLE: &str = "admin";

const FIELDS: &str = "record::id(id) AS id, name, email, roleId, isActive, lastLogin, avatar, \
                      phone, bio, department, preferences, createdAt, updatedAt";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminRecord {
    name: String,
    email: String,
    password_hash: String,
    role_id: Option<String>,
    is_active: bool,
    last_login: Option<i64>,
    avatar: Option<String>,
    phone: Option<String>,
    bio: Option<String>,
    department: Option<String>,
    preferences: Preferences,
    created_at: i64,
    updated_at: i64,
}

impl AdminRecord {
    fn from_admin(admin: &Admin, password_hash: String) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.clone(),
            password_hash,
            role_id: admin.role_id.clone(),
            is_active: admin.is_active,
            last_login: admin.last_login,
            avatar: admin.avatar.clone(),
            phone: admin.phone.clone(),
            bio: admin.bio.clone(),
            department: admin.department.clone(),
            preferences: admin.preferences.clone(),
            created_at: admin.created_at,
            updated_at: admin.updated_at,
        }
    }
}

/// Insert payload; `password_hash` is already an argon2 PHC string
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: Option<String>,
    pub is_active: bool,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub bio: Option<String>,
}

/// Admin plus stored password hash (login / password change only)
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub admin: Admin,
    pub password_hash: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct AdminRepository {
    base: BaseRepository,
}

impl AdminRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All admins, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Admin>> {
        let admins: Vec<Admin> = self
            .base
            .db()
            .query(format!("SELECT {FIELDS} FROM admin ORDER BY createdAt DESC"))
            .await?
            .take(0)?;
        Ok(admins)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Admin>> {
        let admins: Vec<Admin> = self
            .base
            .db()
            .query(format!("SELECT {FIELDS} FROM type::thing('admin', $id)"))
            .bind(("id", id.to_string()))
            .await?
            .take(0)?;
        Ok(admins.into_iter().next())
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Admin>> {
        let admins: Vec<Admin> = self
            .base
            .db()
            .query(format!("SELECT {FIELDS} FROM admin WHERE email = $email"))
            .bind(("email", normalize_email(email)))
            .await?
            .take(0)?;
        Ok(admins.into_iter().next())
    }

    async fn password_hash(&self, id: &str) -> RepoResult<Option<String>> {
        let hashes: Vec<String> = self
            .base
            .db()
            .query("SELECT VALUE passwordHash FROM type::thing('admin', $id)")
            .bind(("id", id.to_string()))
            .await?
            .take(0)?;
        Ok(hashes.into_iter().next())
    }

    /// Admin by email together with the stored password hash
    pub async fn find_credentials(&self, email: &str) -> RepoResult<Option<AdminCredentials>> {
        let Some(admin) = self.find_by_email(email).await? else {
            return Ok(None);
        };
        let password_hash = self.password_hash(&admin.id).await?.unwrap_or_default();
        Ok(Some(AdminCredentials {
            admin,
            password_hash,
        }))
    }

    /// Admin by id together with the stored password hash
    pub async fn find_credentials_by_id(&self, id: &str) -> RepoResult<Option<AdminCredentials>> {
        let Some(admin) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let password_hash = self.password_hash(id).await?.unwrap_or_default();
        Ok(Some(AdminCredentials {
            admin,
            password_hash,
        }))
    }

    pub async fn count(&self) -> RepoResult<u64> {
        self.base.count(TABLE).await
    }

    pub async fn count_by_role(&self, role_id: &str) -> RepoResult<u64> {
        self.base
            .count_where(TABLE, "roleId = $role", vec![("role", role_id.to_string())])
            .await
    }

    pub async fn count_active_by_role(&self, role_id: &str) -> RepoResult<u64> {
        self.base
            .count_where(
                TABLE,
                "roleId = $role AND isActive = true",
                vec![("role", role_id.to_string())],
            )
            .await
    }

    /// Active admins whose role carries the superadmin flag
    pub async fn count_active_super_admins(&self) -> RepoResult<u64> {
        let super_roles: Vec<String> = self
            .base
            .db()
            .query("SELECT VALUE record::id(id) FROM role WHERE isSuperAdmin = true")
            .await?
            .take(0)?;
        if super_roles.is_empty() {
            return Ok(0);
        }

        let row: Option<super::CountRow> = self
            .base
            .db()
            .query(
                "SELECT count() AS total FROM admin \
                 WHERE isActive = true AND roleId IN $roles GROUP ALL",
            )
            .bind(("roles", super_roles))
            .await?
            .take(0)?;
        Ok(row.map(|r| r.total).unwrap_or(0))
    }

    pub async fn create(&self, data: NewAdmin) -> RepoResult<Admin> {
        let email = normalize_email(&data.email);
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Admin with email '{}' already exists",
                email
            )));
        }

        let now = now_millis();
        let id = new_id();
        let record = AdminRecord {
            name: data.name.trim().to_string(),
            email,
            password_hash: data.password_hash,
            role_id: data.role_id,
            is_active: data.is_active,
            last_login: None,
            avatar: None,
            phone: data.phone,
            bio: data.bio,
            department: data.department,
            preferences: Preferences::default(),
            created_at: now,
            updated_at: now,
        };

        self.base
            .db()
            .query("CREATE type::thing('admin', $id) CONTENT $data")
            .bind(("id", id.clone()))
            .bind(("data", record))
            .await?
            .check()?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create admin".to_string()))
    }

    /// Persist a modified admin, keeping its password hash
    pub async fn save(&self, admin: &Admin) -> RepoResult<Admin> {
        let email = normalize_email(&admin.email);
        if let Some(other) = self.find_by_email(&email).await?
            && other.id != admin.id
        {
            return Err(RepoError::Duplicate(format!(
                "Admin with email '{}' already exists",
                email
            )));
        }

        let password_hash = self
            .password_hash(&admin.id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Admin {} not found", admin.id)))?;

        let mut record = AdminRecord::from_admin(admin, password_hash);
        record.email = email;
        record.updated_at = now_millis();

        self.write(&admin.id, record).await
    }

    pub async fn set_password(&self, id: &str, password_hash: String) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE type::thing('admin', $id) SET passwordHash = $hash, updatedAt = $now")
            .bind(("id", id.to_string()))
            .bind(("hash", password_hash))
            .bind(("now", now_millis()))
            .await?
            .check()?;
        Ok(())
    }

    pub async fn touch_last_login(&self, id: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE type::thing('admin', $id) SET lastLogin = $now")
            .bind(("id", id.to_string()))
            .bind(("now", now_millis()))
            .await?
            .check()?;
        Ok(())
    }

    async fn write(&self, id: &str, record: AdminRecord) -> RepoResult<Admin> {
        self.base
            .db()
            .query("UPDATE type::thing('admin', $id) CONTENT $data")
            .bind(("id", id.to_string()))
            .bind(("data", record))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Admin {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.base.delete(TABLE, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn repo() -> AdminRepository {
        AdminRepository::new(DbService::memory().await.unwrap().db)
    }

    fn new_admin(email: &str) -> NewAdmin {
        NewAdmin {
            name: "Jo".into(),
            email: email.into(),
            password_hash: "$argon2id$fake".into(),
            role_id: Some("r1".into()),
            is_active: true,
            phone: None,
            department: None,
            bio: None,
        }
    }

    #[tokio::test]
    async fn test_email_is_lowercased_and_unique() {
        let repo = repo().await;
        let admin = repo.create(new_admin("Jo@Example.com")).await.unwrap();
        assert_eq!(admin.email, "jo@example.com");

        let err = repo.create(new_admin("JO@example.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_save_keeps_password_hash() {
        let repo = repo().await;
        let mut admin = repo.create(new_admin("jo@example.com")).await.unwrap();

        admin.name = "Joanna".into();
        repo.save(&admin).await.unwrap();

        let creds = repo.find_credentials("jo@example.com").await.unwrap().unwrap();
        assert_eq!(creds.admin.name, "Joanna");
        assert_eq!(creds.password_hash, "$argon2id$fake");
    }

    #[tokio::test]
    async fn test_count_by_role() {
        let repo = repo().await;
        repo.create(new_admin("a@example.com")).await.unwrap();
        repo.create(new_admin("b@example.com")).await.unwrap();
        assert_eq!(repo.count_by_role("r1").await.unwrap(), 2);
        assert_eq!(repo.count_by_role("r2").await.unwrap(), 0);
    }
}
