//! Link filtering
//!
//! A category filter (exact id match, or every category) composed with a
//! case-insensitive substring search over title, description and URL. The
//! two are applied in sequence and preserve the input order.

use crate::models::{Link, ALL_CATEGORIES};

/// Which category the board is showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse a filter value; `"all"` selects every category
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    /// The raw filter value (`"all"` or a category id)
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(id) => id,
        }
    }

    pub fn matches(&self, link: &Link) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(id) => link.category == *id,
        }
    }
}

/// Active filter state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter {
    pub category: CategoryFilter,
    pub search: String,
}

impl Filter {
    pub fn new(category: CategoryFilter, search: impl Into<String>) -> Self {
        Self {
            category,
            search: search.into(),
        }
    }

    /// True when the filter lets every link through
    pub fn is_empty(&self) -> bool {
        self.category == CategoryFilter::All && self.search.is_empty()
    }

    /// Apply the filter, keeping the original order
    pub fn apply<'a>(&self, links: &'a [Link]) -> Vec<&'a Link> {
        let needle = self.search.to_lowercase();

        links
            .iter()
            .filter(|link| self.category.matches(link))
            .filter(|link| needle.is_empty() || matches_search(link, &needle))
            .collect()
    }
}

/// `needle` must already be lowercase
fn matches_search(link: &Link, needle: &str) -> bool {
    link.title.to_lowercase().contains(needle)
        || link.description_text().to_lowercase().contains(needle)
        || link.url.to_lowercase().contains(needle)
}
