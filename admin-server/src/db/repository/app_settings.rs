//! App Settings Repository (single record `app_settings:main`)

use shared::models::AppSettings;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoResult};

const KEY: &str = "main";

const FIELDS: &str = "appName, logoUrl, faviconUrl, contactEmail, supportPhone, maintenanceMode, \
                      maintenanceMessage, allowRegistration, maxLoginAttempts, sessionTimeout, \
                      dateFormat, timezone, language, updatedBy, updatedAt";

#[derive(Clone)]
pub struct AppSettingsRepository {
    base: BaseRepository,
}

impl AppSettingsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    async fn find(&self) -> RepoResult<Option<AppSettings>> {
        let rows: Vec<AppSettings> = self
            .base
            .db()
            .query(format!("SELECT {FIELDS} FROM type::thing('app_settings', $key)"))
            .bind(("key", KEY))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Current settings, created with defaults on first access
    pub async fn get(&self) -> RepoResult<AppSettings> {
        if let Some(settings) = self.find().await? {
            return Ok(settings);
        }

        let settings = AppSettings {
            updated_at: now_millis(),
            ..AppSettings::default()
        };
        tracing::info!("Creating default app settings");
        self.write(&settings).await?;
        Ok(settings)
    }

    /// Persist settings, stamping who changed them
    pub async fn save(&self, settings: &AppSettings, updated_by: &str) -> RepoResult<AppSettings> {
        let settings = AppSettings {
            updated_by: Some(updated_by.to_string()),
            updated_at: now_millis(),
            ..settings.clone()
        };
        self.write(&settings).await?;
        Ok(settings)
    }

    async fn write(&self, settings: &AppSettings) -> RepoResult<()> {
        self.base
            .db()
            .query("UPSERT type::thing('app_settings', $key) CONTENT $data")
            .bind(("key", KEY))
            .bind(("data", settings.clone()))
            .await?
            .check()?;
        Ok(())
    }
}
