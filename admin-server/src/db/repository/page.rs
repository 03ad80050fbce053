//! Page Repository

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared::models::{
    AdminSummary, ContentType, Page, PageAccess, PageStatus, PageTemplate, Seo, Sidebar,
};
use shared::util::{new_id, now_millis};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};

const TABLE: &str = "page";

const FIELDS: &str = "record::id(id) AS id, title, slug, description, content, contentType, \
                      template, icon, sidebar, permissions, seo, status, createdBy, updatedBy, \
                      createdAt, updatedAt";

/// Stored shape: admin references are plain ids
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageRecord {
    title: String,
    slug: String,
    #[serde(default)]
    description: Option<String>,
    content: String,
    #[serde(default)]
    content_type: ContentType,
    #[serde(default)]
    template: PageTemplate,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    sidebar: Sidebar,
    #[serde(default)]
    permissions: PageAccess,
    #[serde(default)]
    seo: Seo,
    #[serde(default)]
    status: PageStatus,
    #[serde(default)]
    created_by: Option<String>,
    #[serde(default)]
    updated_by: Option<String>,
    #[serde(default)]
    created_at: i64,
    #[serde(default)]
    updated_at: i64,
}

#[derive(Debug, Deserialize)]
struct PageRow {
    id: String,
    #[serde(flatten)]
    record: PageRecord,
}

impl PageRecord {
    fn from_page(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            slug: page.slug.clone(),
            description: page.description.clone(),
            content: page.content.clone(),
            content_type: page.content_type,
            template: page.template,
            icon: page.icon.clone(),
            sidebar: page.sidebar.clone(),
            permissions: page.permissions.clone(),
            seo: page.seo.clone(),
            status: page.status,
            created_by: page.created_by.as_ref().map(|a| a.id.clone()),
            updated_by: page.updated_by.as_ref().map(|a| a.id.clone()),
            created_at: page.created_at,
            updated_at: page.updated_at,
        }
    }
}

/// Insert payload (slug already derived and normalized)
#[derive(Debug, Clone)]
pub struct NewPage {
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub content: String,
    pub content_type: ContentType,
    pub template: PageTemplate,
    pub icon: Option<String>,
    pub sidebar: Sidebar,
    pub permissions: PageAccess,
    pub seo: Seo,
    pub status: PageStatus,
    pub created_by: String,
}

/// `GET /api/pages` filters
#[derive(Debug, Clone, Default)]
pub struct PageFilter {
    pub status: Option<PageStatus>,
    pub search: Option<String>,
    /// Published pages shown in the sidebar only
    pub sidebar_only: bool,
}

#[derive(Clone)]
pub struct PageRepository {
    base: BaseRepository,
}

impl PageRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Filtered list ordered by sidebar position, sidebar order, then newest
    pub async fn list(&self, filter: PageFilter) -> RepoResult<Vec<Page>> {
        let mut conditions = Vec::new();
        let status = if filter.sidebar_only {
            conditions.push("sidebar.enabled = true");
            Some(PageStatus::Published)
        } else {
            filter.status
        };
        if status.is_some() {
            conditions.push("status = $status");
        }
        let search = filter
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        if search.is_some() {
            conditions.push(
                "(string::contains(string::lowercase(title), $search) \
                 OR string::contains(string::lowercase(slug), $search) \
                 OR string::contains(string::lowercase(description ?? ''), $search))",
            );
        }

        let mut sql = format!("SELECT {FIELDS} FROM page");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        let mut query = self.base.db().query(sql);
        if let Some(status) = status {
            query = query.bind(("status", status.as_str()));
        }
        if let Some(search) = search {
            query = query.bind(("search", search));
        }
        let mut rows: Vec<PageRow> = query.await?.take(0)?;

        rows.sort_by(|a, b| {
            a.record
                .sidebar
                .position
                .cmp(&b.record.sidebar.position)
                .then(a.record.sidebar.order.cmp(&b.record.sidebar.order))
                .then(b.record.created_at.cmp(&a.record.created_at))
        });

        self.populate(rows).await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Page>> {
        let rows: Vec<PageRow> = self
            .base
            .db()
            .query(format!("SELECT {FIELDS} FROM type::thing('page', $id)"))
            .bind(("id", id.to_string()))
            .await?
            .take(0)?;
        Ok(self.populate(rows).await?.into_iter().next())
    }

    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Page>> {
        let rows: Vec<PageRow> = self
            .base
            .db()
            .query(format!("SELECT {FIELDS} FROM page WHERE slug = $slug"))
            .bind(("slug", slug.trim().to_lowercase()))
            .await?
            .take(0)?;
        Ok(self.populate(rows).await?.into_iter().next())
    }

    pub async fn count(&self) -> RepoResult<u64> {
        self.base.count(TABLE).await
    }

    pub async fn create(&self, data: NewPage) -> RepoResult<Page> {
        let slug = data.slug.trim().to_lowercase();
        if slug.is_empty() {
            return Err(RepoError::Validation("Slug cannot be empty".to_string()));
        }
        if self.find_by_slug(&slug).await?.is_some() {
            return Err(RepoError::Duplicate(
                "A page with this slug already exists".to_string(),
            ));
        }

        let now = now_millis();
        let id = new_id();
        let record = PageRecord {
            title: data.title.trim().to_string(),
            slug,
            description: data.description,
            content: data.content,
            content_type: data.content_type,
            template: data.template,
            icon: data.icon,
            sidebar: data.sidebar,
            permissions: data.permissions,
            seo: data.seo,
            status: data.status,
            created_by: Some(data.created_by),
            updated_by: None,
            created_at: now,
            updated_at: now,
        };

        self.base
            .db()
            .query("CREATE type::thing('page', $id) CONTENT $data")
            .bind(("id", id.clone()))
            .bind(("data", record))
            .await?
            .check()?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create page".to_string()))
    }

    pub async fn save(&self, page: &Page) -> RepoResult<Page> {
        let mut record = PageRecord::from_page(page);
        record.slug = record.slug.trim().to_lowercase();
        if let Some(other) = self.find_by_slug(&record.slug).await?
            && other.id != page.id
        {
            return Err(RepoError::Duplicate(
                "A page with this slug already exists".to_string(),
            ));
        }
        record.updated_at = now_millis();

        self.base
            .db()
            .query("UPDATE type::thing('page', $id) CONTENT $data")
            .bind(("id", page.id.clone()))
            .bind(("data", record))
            .await?
            .check()?;

        self.find_by_id(&page.id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Page {} not found", page.id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.base.delete(TABLE, id).await
    }

    /// Resolve `createdBy` / `updatedBy` ids into admin summaries
    async fn populate(&self, rows: Vec<PageRow>) -> RepoResult<Vec<Page>> {
        let mut ids: Vec<String> = rows
            .iter()
            .flat_map(|r| [r.record.created_by.clone(), r.record.updated_by.clone()])
            .flatten()
            .collect();
        ids.sort();
        ids.dedup();

        let admins: HashMap<String, AdminSummary> = if ids.is_empty() {
            HashMap::new()
        } else {
            let summaries: Vec<AdminSummary> = self
                .base
                .db()
                .query("SELECT record::id(id) AS id, name, email FROM admin WHERE record::id(id) IN $ids")
                .bind(("ids", ids))
                .await?
                .take(0)?;
            summaries.into_iter().map(|s| (s.id.clone(), s)).collect()
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                let r = row.record;
                Page {
                    id: row.id,
                    title: r.title,
                    slug: r.slug,
                    description: r.description,
                    content: r.content,
                    content_type: r.content_type,
                    template: r.template,
                    icon: r.icon,
                    sidebar: r.sidebar,
                    permissions: r.permissions,
                    seo: r.seo,
                    status: r.status,
                    created_by: r.created_by.and_then(|id| admins.get(&id).cloned()),
                    updated_by: r.updated_by.and_then(|id| admins.get(&id).cloned()),
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::SidebarPosition;

    async fn repo() -> PageRepository {
        PageRepository::new(DbService::memory().await.unwrap().db)
    }

    fn new_page(slug: &str, status: PageStatus) -> NewPage {
        NewPage {
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            description: None,
            content: "<p>hi</p>".into(),
            content_type: ContentType::Html,
            template: PageTemplate::Default,
            icon: None,
            sidebar: Sidebar::default(),
            permissions: PageAccess::default(),
            seo: Seo::default(),
            status,
            created_by: "a1".into(),
        }
    }

    #[tokio::test]
    async fn test_slug_is_unique() {
        let repo = repo().await;
        repo.create(new_page("about", PageStatus::Draft)).await.unwrap();
        let err = repo
            .create(new_page("About", PageStatus::Draft))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_order() {
        let repo = repo().await;
        let mut bottom = new_page("faq", PageStatus::Published);
        bottom.sidebar.position = SidebarPosition::Bottom;
        repo.create(bottom).await.unwrap();
        let mut top = new_page("home", PageStatus::Published);
        top.sidebar.position = SidebarPosition::Top;
        repo.create(top).await.unwrap();
        repo.create(new_page("draft-notes", PageStatus::Draft)).await.unwrap();

        let all = repo.list(PageFilter::default()).await.unwrap();
        let slugs: Vec<_> = all.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["home", "draft-notes", "faq"]);

        let sidebar = repo
            .list(PageFilter {
                sidebar_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(sidebar.len(), 2);

        let searched = repo
            .list(PageFilter {
                search: Some("NOTES".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].slug, "draft-notes");
    }
}
