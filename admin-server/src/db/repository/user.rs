//! User Repository (end-user accounts managed from the panel)

use serde::Serialize;
use shared::models::{User, UserCreate, UserUpdate};
use shared::util::{new_id, now_millis};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};

const TABLE: &str = "user";

const FIELDS: &str = "record::id(id) AS id, name, email, isActive, createdAt, updatedAt";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewUserRecord {
    name: String,
    email: String,
    password_hash: String,
    is_active: bool,
    created_at: i64,
    updated_at: i64,
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All users, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query(format!("SELECT {FIELDS} FROM user ORDER BY createdAt DESC"))
            .await?
            .take(0)?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query(format!("SELECT {FIELDS} FROM type::thing('user', $id)"))
            .bind(("id", id.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query(format!("SELECT {FIELDS} FROM user WHERE email = $email"))
            .bind(("email", email.trim().to_lowercase()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    pub async fn count(&self) -> RepoResult<u64> {
        self.base.count(TABLE).await
    }

    /// `password_hash` is the argon2 hash of `data.password`
    pub async fn create(&self, data: UserCreate, password_hash: String) -> RepoResult<User> {
        let email = data.email.trim().to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate("Email already exists".to_string()));
        }

        let now = now_millis();
        let id = new_id();
        let record = NewUserRecord {
            name: data.name.trim().to_string(),
            email,
            password_hash,
            is_active: data.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        self.base
            .db()
            .query("CREATE type::thing('user', $id) CONTENT $data")
            .bind(("id", id.clone()))
            .bind(("data", record))
            .await?
            .check()?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let mut user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound("User not found".to_string()))?;

        if let Some(email) = data.email {
            let email = email.trim().to_lowercase();
            if let Some(other) = self.find_by_email(&email).await?
                && other.id != user.id
            {
                return Err(RepoError::Duplicate("Email already exists".to_string()));
            }
            user.email = email;
        }
        if let Some(name) = data.name {
            user.name = name.trim().to_string();
        }
        if let Some(is_active) = data.is_active {
            user.is_active = is_active;
        }

        self.base
            .db()
            .query(
                "UPDATE type::thing('user', $id) SET \
                 name = $name, email = $email, isActive = $active, updatedAt = $now",
            )
            .bind(("id", id.to_string()))
            .bind(("name", user.name))
            .bind(("email", user.email))
            .bind(("active", user.is_active))
            .bind(("now", now_millis()))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound("User not found".to_string()))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.base.delete(TABLE, id).await
    }
}
