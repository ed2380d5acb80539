//! Data models for linkboard
//!
//! Defines the two entity collections: links and categories, plus the
//! sentinel ids shared by filtering, grouping and rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category id assigned to links whose category is missing or deleted
pub const UNCATEGORIZED: &str = "uncategorized";

/// Display name for [`UNCATEGORIZED`]
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// Category filter value that matches every link
pub const ALL_CATEGORIES: &str = "all";

/// Column id of the favorites column (render only, never stored on a link)
pub const FAVORITES_COLUMN: &str = "favorites";

/// Generate a new opaque entity id
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// A saved link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Unique identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// The URL
    pub url: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Category id, or [`UNCATEGORIZED`]
    #[serde(default = "uncategorized")]
    pub category: String,
    /// When this link was created
    pub created_at: DateTime<Utc>,
    /// When this link was last updated
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Create a new uncategorized link
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            title: title.into(),
            url: url.into(),
            description: None,
            category: UNCATEGORIZED.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style category assignment
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder-style description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Update the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    /// Update the URL
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
        self.touch();
    }

    /// Update the description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    /// Move the link to another category
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.touch();
    }

    /// Description or the empty string
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A user-defined grouping label for links
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier
    pub id: String,
    /// Display name, unique among categories
    pub name: String,
    /// Position in the category list
    #[serde(default)]
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Create a new category with a generated id
    pub fn new(name: impl Into<String>, order: u32) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            name: name.into(),
            order,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Create a category with a fixed id and no timestamps
    pub fn with_id(id: impl Into<String>, name: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order,
            created_at: None,
            updated_at: None,
        }
    }

    /// Rename the category
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Some(Utc::now());
    }
}

/// Categories used when nothing has been stored yet
pub fn default_categories() -> Vec<Category> {
    [
        ("work", "Work"),
        ("study", "Study"),
        ("entertainment", "Entertainment"),
        ("tools", "Tools"),
        ("social", "Social"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (id, name))| Category::with_id(*id, *name, i as u32))
    .collect()
}

/// Links seeded into an empty collection
pub fn sample_links() -> Vec<Link> {
    vec![
        Link::new("GitHub", "https://github.com")
            .in_category("tools")
            .with_description("Code hosting and collaboration platform"),
        Link::new("Stack Overflow", "https://stackoverflow.com")
            .in_category("study")
            .with_description("Question and answer community for developers"),
        Link::new("YouTube", "https://youtube.com")
            .in_category("entertainment")
            .with_description("Video sharing platform"),
    ]
}

fn uncategorized() -> String {
    UNCATEGORIZED.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_new() {
        let link = Link::new("Example", "https://example.com");
        assert_eq!(link.url, "https://example.com");
        assert_eq!(link.title, "Example");
        assert_eq!(link.category, UNCATEGORIZED);
        assert!(link.description.is_none());
        assert_eq!(link.created_at, link.updated_at);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Link::new("a", "https://a.com");
        let b = Link::new("b", "https://b.com");
        assert_ne!(a.id, b.id);
        assert!(!a.id.contains('-'));
    }

    #[test]
    fn test_link_set_title_bumps_updated_at() {
        let mut link = Link::new("Example", "https://example.com");
        let original_updated = link.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(10));
        link.set_title("Example Site");
        assert_eq!(link.title, "Example Site");
        assert!(link.updated_at > original_updated);
    }

    #[test]
    fn test_link_json_uses_camel_case() {
        let link = Link::new("Example", "https://example.com").in_category("tools");
        let json = serde_json::to_value(&link).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["category"], "tools");
    }

    #[test]
    fn test_link_missing_category_defaults_to_uncategorized() {
        let json = r#"{
            "id": "abc",
            "title": "t",
            "url": "https://t.com",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        let link: Link = serde_json::from_str(json).unwrap();
        assert_eq!(link.category, UNCATEGORIZED);
        assert!(link.description.is_none());
    }

    #[test]
    fn test_category_without_timestamps() {
        let json = r#"{"id": "work", "name": "Work", "order": 0}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category, Category::with_id("work", "Work", 0));

        let out = serde_json::to_string(&category).unwrap();
        assert!(!out.contains("createdAt"));
    }

    #[test]
    fn test_default_categories_are_ordered() {
        let categories = default_categories();
        assert_eq!(categories.len(), 5);
        for (i, category) in categories.iter().enumerate() {
            assert_eq!(category.order, i as u32);
        }
        assert_eq!(categories[0].id, "work");
    }

    #[test]
    fn test_sample_links_reference_default_categories() {
        let ids: Vec<_> = default_categories().into_iter().map(|c| c.id).collect();
        for link in sample_links() {
            assert!(ids.contains(&link.category));
        }
    }
}
