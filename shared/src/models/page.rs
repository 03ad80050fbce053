//! Page Model (admin-managed content pages)

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::AdminSummary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Html,
    Markdown,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageTemplate {
    #[default]
    Default,
    Dashboard,
    Fullwidth,
    Sidebar,
    Blank,
}

/// Sidebar slot; declaration order is the display order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarPosition {
    Top,
    #[default]
    Main,
    Bottom,
    Hidden,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::Published => "published",
            PageStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub position: SidebarPosition,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub order: i32,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self {
            enabled: true,
            position: SidebarPosition::default(),
            parent_id: None,
            order: 0,
        }
    }
}

/// Partial sidebar, merged over the stored one on update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarPatch {
    pub enabled: Option<bool>,
    pub position: Option<SidebarPosition>,
    pub parent_id: Option<String>,
    pub order: Option<i32>,
}

impl Sidebar {
    pub fn merge(&mut self, patch: SidebarPatch) {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if patch.parent_id.is_some() {
            self.parent_id = patch.parent_id;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

/// Role names allowed to view / edit a page (informational)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAccess {
    #[serde(default)]
    pub view: Vec<String>,
    #[serde(default)]
    pub edit: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoPatch {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub keywords: Option<Vec<String>>,
}

impl Seo {
    pub fn merge(&mut self, patch: SeoPatch) {
        if patch.meta_title.is_some() {
            self.meta_title = patch.meta_title;
        }
        if patch.meta_description.is_some() {
            self.meta_description = patch.meta_description;
        }
        if let Some(keywords) = patch.keywords {
            self.keywords = keywords;
        }
    }
}

/// Page entity with `createdBy` / `updatedBy` populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub content: String,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub template: PageTemplate,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub sidebar: Sidebar,
    #[serde(default)]
    pub permissions: PageAccess,
    #[serde(default)]
    pub seo: Seo,
    #[serde(default)]
    pub status: PageStatus,
    pub created_by: Option<AdminSummary>,
    #[serde(default)]
    pub updated_by: Option<AdminSummary>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Create page payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageCreate {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub content_type: Option<ContentType>,
    pub template: Option<PageTemplate>,
    pub icon: Option<String>,
    pub sidebar: Option<SidebarPatch>,
    pub permissions: Option<PageAccess>,
    pub seo: Option<SeoPatch>,
    pub status: Option<PageStatus>,
}

/// Update page payload (`sidebar` and `seo` are merged, the rest replaced)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageUpdate {
    #[validate(length(min = 1, max = 200, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
    pub content_type: Option<ContentType>,
    pub template: Option<PageTemplate>,
    pub icon: Option<String>,
    pub sidebar: Option<SidebarPatch>,
    pub permissions: Option<PageAccess>,
    pub seo: Option<SeoPatch>,
    pub status: Option<PageStatus>,
}

/// Sidebar reorder payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageReorder {
    pub order: Option<i32>,
    pub position: Option<SidebarPosition>,
}

/// URL-friendly slug: lowercase ascii alphanumerics joined by single dashes
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Release Notes v2 "), "release-notes-v2");
        assert_eq!(slugify("Café au lait"), "caf-au-lait");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_sidebar_merge_keeps_unset_fields() {
        let mut sidebar = Sidebar {
            enabled: true,
            position: SidebarPosition::Top,
            parent_id: None,
            order: 3,
        };
        sidebar.merge(SidebarPatch {
            order: Some(7),
            ..Default::default()
        });
        assert_eq!(sidebar.position, SidebarPosition::Top);
        assert_eq!(sidebar.order, 7);
    }

    #[test]
    fn test_sidebar_position_order() {
        assert!(SidebarPosition::Top < SidebarPosition::Main);
        assert!(SidebarPosition::Bottom < SidebarPosition::Hidden);
    }
}
