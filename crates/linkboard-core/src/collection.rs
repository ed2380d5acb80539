//! Link collection state container
//!
//! `LinkCollection` owns the in-memory links, categories and favorites,
//! plus the UI state (active filter, open form). Every mutating operation
//! updates memory first and then saves the affected collection through the
//! backend before returning.
//!
//! ## Usage
//!
//! ```ignore
//! let backend = FallbackBackend::from_config(&config)?;
//! let mut collection = LinkCollection::open(backend)?;
//!
//! let id = collection.add_link(LinkForm::new("Rust", "https://rust-lang.org"))?;
//! collection.toggle_favorite(&id)?;
//!
//! let html = render::render_links(&collection.view());
//! ```

use tracing::debug;

use crate::error::{Error, Result, ValidationError};
use crate::filter::{CategoryFilter, Filter};
use crate::models::{sample_links, Category, Link, UNCATEGORIZED, UNCATEGORIZED_NAME};
use crate::render::BoardView;
use crate::storage::{Backend, FavoritesStore};

/// Input of the add/edit link form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkForm {
    pub title: String,
    pub url: String,
    pub category: String,
    pub description: String,
}

impl LinkForm {
    /// Form with title and URL, uncategorized, no description
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            category: UNCATEGORIZED.to_string(),
            description: String::new(),
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Form prefilled from an existing link
    pub fn from_link(link: &Link) -> Self {
        Self {
            title: link.title.clone(),
            url: link.url.clone(),
            category: link.category.clone(),
            description: link.description_text().to_string(),
        }
    }

    /// Trim every field and reject an empty title or URL
    fn validate(&self) -> std::result::Result<ValidLinkForm, ValidationError> {
        let title = self.title.trim();
        let url = self.url.trim();

        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }

        let category = match self.category.trim() {
            "" => UNCATEGORIZED.to_string(),
            c => c.to_string(),
        };
        let description = match self.description.trim() {
            "" => None,
            d => Some(d.to_string()),
        };

        Ok(ValidLinkForm {
            title: title.to_string(),
            url: url.to_string(),
            category,
            description,
        })
    }
}

struct ValidLinkForm {
    title: String,
    url: String,
    category: String,
    description: Option<String>,
}

/// Which form is open, if any
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Closed,
    /// Add (`editing == None`) or edit link form
    LinkForm {
        editing: Option<String>,
        preset_category: Option<String>,
    },
    /// Category management list, optionally renaming one category
    CategoryManager { renaming: Option<String> },
}

/// In-memory state backed by a persistence backend
pub struct LinkCollection<B> {
    backend: B,
    links: Vec<Link>,
    categories: Vec<Category>,
    favorites: Vec<String>,
    filter: Filter,
    modal: Modal,
}

impl<B: Backend + FavoritesStore> LinkCollection<B> {
    /// Load links, categories and favorites from `backend`
    pub fn open(mut backend: B) -> Result<Self> {
        let snapshot = backend.load_all()?;
        let favorites = backend.load_favorites()?;

        debug!(
            links = snapshot.links.len(),
            categories = snapshot.categories.len(),
            favorites = favorites.len(),
            "Opened link collection"
        );

        Ok(Self {
            backend,
            links: snapshot.links,
            categories: snapshot.categories,
            favorites,
            filter: Filter::default(),
            modal: Modal::Closed,
        })
    }

    /// Insert the sample links when the collection has none
    ///
    /// Returns whether samples were added.
    pub fn seed_samples_if_empty(&mut self) -> Result<bool> {
        if !self.links.is_empty() {
            return Ok(false);
        }
        self.commit_links(sample_links())?;
        Ok(true)
    }

    // ==================== Accessors ====================

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Give the backend back, dropping in-memory state
    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Display name for a category id
    pub fn category_name<'a>(&'a self, id: &'a str) -> &'a str {
        category_name(&self.categories, id)
    }

    /// Everything the renderer needs
    pub fn view(&self) -> BoardView<'_> {
        BoardView {
            links: &self.links,
            categories: &self.categories,
            favorites: &self.favorites,
            filter: &self.filter,
            renaming: match &self.modal {
                Modal::CategoryManager { renaming } => renaming.as_deref(),
                _ => None,
            },
        }
    }

    // ==================== Filtering ====================

    pub fn set_category_filter(&mut self, category: CategoryFilter) {
        self.filter.category = category;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    /// Links passing the active filter, in collection order
    pub fn filtered_links(&self) -> Vec<&Link> {
        self.filter.apply(&self.links)
    }

    /// Filtered links grouped into category columns
    pub fn grouped_links(&self) -> Vec<(String, Vec<&Link>)> {
        group_by_category(&self.filtered_links(), &self.categories)
    }

    // ==================== Forms ====================

    /// Open the link form, for a new link or to edit `editing`
    pub fn open_link_form(&mut self, editing: Option<&str>) -> Result<LinkForm> {
        let form = match editing {
            Some(id) => {
                let link = self
                    .link(id)
                    .ok_or_else(|| Error::LinkNotFound(id.to_string()))?;
                LinkForm::from_link(link)
            }
            None => LinkForm {
                category: self
                    .categories
                    .first()
                    .map_or_else(|| UNCATEGORIZED.to_string(), |c| c.id.clone()),
                ..LinkForm::default()
            },
        };

        self.modal = Modal::LinkForm {
            editing: editing.map(str::to_string),
            preset_category: None,
        };
        Ok(form)
    }

    /// Show only `category_id` and open a new-link form preset to it
    pub fn quick_add_to_category(&mut self, category_id: &str) -> LinkForm {
        self.filter.category = CategoryFilter::parse(category_id);
        self.modal = Modal::LinkForm {
            editing: None,
            preset_category: Some(category_id.to_string()),
        };
        LinkForm::default().category(category_id)
    }

    pub fn open_category_manager(&mut self) {
        self.modal = Modal::CategoryManager { renaming: None };
    }

    /// Switch the category manager into rename mode for `id`
    pub fn begin_rename_category(&mut self, id: &str) -> Result<()> {
        if self.category(id).is_none() {
            return Err(Error::CategoryNotFound(id.to_string()));
        }
        self.modal = Modal::CategoryManager {
            renaming: Some(id.to_string()),
        };
        Ok(())
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Submit the open link form
    ///
    /// Edits the link being edited, otherwise adds a new one. On success the
    /// category filter resets to all categories and the form closes. On a
    /// validation error nothing changes.
    pub fn submit_link_form(&mut self, form: LinkForm) -> Result<String> {
        let editing = match &self.modal {
            Modal::LinkForm { editing, .. } => editing.clone(),
            _ => None,
        };

        let id = match editing {
            Some(id) => {
                self.update_link(&id, form)?;
                id
            }
            None => self.add_link(form)?,
        };

        self.filter.category = CategoryFilter::All;
        self.close_modal();
        Ok(id)
    }

    // ==================== Links ====================

    /// Add a link at the front of the collection
    pub fn add_link(&mut self, form: LinkForm) -> Result<String> {
        let valid = form.validate()?;

        let mut link = Link::new(valid.title, valid.url).in_category(valid.category);
        link.description = valid.description;
        let id = link.id.clone();

        let mut links = self.links.clone();
        links.insert(0, link);
        self.commit_links(links)?;
        debug!("Added link {}", id);
        Ok(id)
    }

    /// Replace title, URL, category and description of a link
    pub fn update_link(&mut self, id: &str, form: LinkForm) -> Result<()> {
        let valid = form.validate()?;
        let index = self.link_index(id)?;

        let mut links = self.links.clone();
        let link = &mut links[index];
        link.set_title(valid.title);
        link.set_url(valid.url);
        link.set_category(valid.category);
        link.set_description(valid.description);

        self.commit_links(links)
    }

    /// Delete a link and its favorite mark
    pub fn delete_link(&mut self, id: &str) -> Result<()> {
        let index = self.link_index(id)?;
        let mut links = self.links.clone();
        links.remove(index);
        self.commit_links(links)?;

        if self.is_favorite(id) {
            let favorites = self.favorites.iter().filter(|f| *f != id).cloned().collect();
            self.commit_favorites(favorites)?;
        }
        debug!("Deleted link {}", id);
        Ok(())
    }

    /// Inline title edit; returns whether anything changed
    pub fn update_title(&mut self, id: &str, title: &str) -> Result<bool> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }

        let index = self.link_index(id)?;
        if self.links[index].title == title {
            return Ok(false);
        }

        let mut links = self.links.clone();
        links[index].set_title(title);
        self.commit_links(links)?;
        Ok(true)
    }

    /// Inline description edit; an empty value clears the description
    pub fn update_description(&mut self, id: &str, description: &str) -> Result<bool> {
        let description = match description.trim() {
            "" => None,
            d => Some(d.to_string()),
        };

        let index = self.link_index(id)?;
        if self.links[index].description == description {
            return Ok(false);
        }

        let mut links = self.links.clone();
        links[index].set_description(description);
        self.commit_links(links)?;
        Ok(true)
    }

    /// Drop a link from the `source` column onto the `target` column
    pub fn move_link(&mut self, link_id: &str, source: &str, target: &str) -> Result<bool> {
        if source == target {
            return Ok(false);
        }

        let index = self.link_index(link_id)?;
        let mut links = self.links.clone();
        links[index].set_category(target);
        self.commit_links(links)?;
        debug!("Moved link {} from {} to {}", link_id, source, target);
        Ok(true)
    }

    // ==================== Categories ====================

    /// Add a category from the management form and close the form
    pub fn add_category(&mut self, name: &str) -> Result<String> {
        let name = self.validate_category_name(name, None)?;
        let id = self.push_category(name)?;
        self.close_modal();
        Ok(id)
    }

    /// Add a category without opening any form
    ///
    /// Blank input is ignored and yields `None`.
    pub fn quick_add_category(&mut self, name: &str) -> Result<Option<String>> {
        if name.trim().is_empty() {
            return Ok(None);
        }
        let name = self.validate_category_name(name, None)?;
        self.push_category(name).map(Some)
    }

    /// Rename a category in place
    pub fn rename_category(&mut self, id: &str, name: &str) -> Result<()> {
        let name = self.validate_category_name(name, Some(id))?;
        let index = self.category_index(id)?;

        let mut categories = self.categories.clone();
        categories[index].set_name(name);
        self.commit_categories(categories)?;

        if let Modal::CategoryManager { renaming } = &mut self.modal {
            *renaming = None;
        }
        Ok(())
    }

    /// Delete a category, moving its links to "uncategorized"
    ///
    /// Returns the number of links reassigned.
    pub fn delete_category(&mut self, id: &str) -> Result<usize> {
        let index = self.category_index(id)?;

        let mut categories = self.categories.clone();
        categories.remove(index);
        renumber(&mut categories);

        let mut links = self.links.clone();
        let mut moved = 0;
        for link in links.iter_mut().filter(|l| l.category == id) {
            link.set_category(UNCATEGORIZED);
            moved += 1;
        }

        self.commit_categories(categories)?;
        self.commit_links(links)?;

        if self.filter.category == CategoryFilter::Only(id.to_string()) {
            self.filter.category = CategoryFilter::All;
        }
        debug!("Deleted category {} ({} links reassigned)", id, moved);
        Ok(moved)
    }

    /// Drop category `dragged` onto the position of `target`
    ///
    /// Unknown ids and dropping a category onto itself are no-ops.
    pub fn reorder_categories(&mut self, dragged: &str, target: &str) -> Result<bool> {
        if dragged == target {
            return Ok(false);
        }
        let from = self.categories.iter().position(|c| c.id == dragged);
        let to = self.categories.iter().position(|c| c.id == target);
        let (Some(from), Some(to)) = (from, to) else {
            return Ok(false);
        };

        let mut categories = self.categories.clone();
        let category = categories.remove(from);
        categories.insert(to, category);
        renumber(&mut categories);

        self.commit_categories(categories)?;
        Ok(true)
    }

    // ==================== Favorites ====================

    /// Flip the favorite mark of a link; returns the new state
    pub fn toggle_favorite(&mut self, link_id: &str) -> Result<bool> {
        self.link_index(link_id)?;

        let mut favorites = self.favorites.clone();
        let now_favorite = match favorites.iter().position(|f| f == link_id) {
            Some(pos) => {
                favorites.remove(pos);
                false
            }
            None => {
                favorites.push(link_id.to_string());
                true
            }
        };

        self.commit_favorites(favorites)?;
        Ok(now_favorite)
    }

    pub fn is_favorite(&self, link_id: &str) -> bool {
        self.favorites.iter().any(|f| f == link_id)
    }

    /// Favorite links in collection order, ignoring the filter
    pub fn favorite_links(&self) -> Vec<&Link> {
        favorite_links(&self.links, &self.favorites)
    }

    // ==================== Helpers ====================

    fn link_index(&self, id: &str) -> Result<usize> {
        self.links
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| Error::LinkNotFound(id.to_string()))
    }

    fn category_index(&self, id: &str) -> Result<usize> {
        self.categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| Error::CategoryNotFound(id.to_string()))
    }

    /// Save `links`, then adopt them; memory is untouched when the save fails
    fn commit_links(&mut self, links: Vec<Link>) -> Result<()> {
        self.backend.save_links(&links)?;
        self.links = links;
        Ok(())
    }

    fn commit_categories(&mut self, categories: Vec<Category>) -> Result<()> {
        self.backend.save_categories(&categories)?;
        self.categories = categories;
        Ok(())
    }

    fn commit_favorites(&mut self, favorites: Vec<String>) -> Result<()> {
        self.backend.save_favorites(&favorites)?;
        self.favorites = favorites;
        Ok(())
    }

    /// Trimmed name, rejecting blanks and names used by another category
    fn validate_category_name(&self, name: &str, except: Option<&str>) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCategoryName.into());
        }
        let taken = self
            .categories
            .iter()
            .any(|c| c.name == name && Some(c.id.as_str()) != except);
        if taken {
            return Err(ValidationError::DuplicateCategoryName(name.to_string()).into());
        }
        Ok(name.to_string())
    }

    fn push_category(&mut self, name: String) -> Result<String> {
        let category = Category::new(name, self.categories.len() as u32);
        let id = category.id.clone();

        let mut categories = self.categories.clone();
        categories.push(category);
        self.commit_categories(categories)?;
        debug!("Added category {}", id);
        Ok(id)
    }
}

/// Make `order` match list position
fn renumber(categories: &mut [Category]) {
    for (index, category) in categories.iter_mut().enumerate() {
        category.order = index as u32;
    }
}

/// Display name for a category id
///
/// Unknown ids display as themselves.
pub fn category_name<'a>(categories: &'a [Category], id: &'a str) -> &'a str {
    match categories.iter().find(|c| c.id == id) {
        Some(category) => &category.name,
        None if id == UNCATEGORIZED => UNCATEGORIZED_NAME,
        None => id,
    }
}

/// Group links into category columns
///
/// Columns follow category order, then "uncategorized", then unknown
/// category ids in first-seen order. Empty columns are dropped.
pub fn group_by_category<'a>(
    links: &[&'a Link],
    categories: &[Category],
) -> Vec<(String, Vec<&'a Link>)> {
    let mut groups: Vec<(String, Vec<&'a Link>)> = categories
        .iter()
        .map(|c| (c.id.clone(), Vec::new()))
        .collect();
    if !categories.iter().any(|c| c.id == UNCATEGORIZED) {
        groups.push((UNCATEGORIZED.to_string(), Vec::new()));
    }

    for link in links {
        let key = if link.category.is_empty() {
            UNCATEGORIZED
        } else {
            link.category.as_str()
        };
        match groups.iter_mut().find(|(id, _)| id == key) {
            Some((_, members)) => members.push(*link),
            None => groups.push((key.to_string(), vec![*link])),
        }
    }

    groups.retain(|(_, members)| !members.is_empty());
    groups
}

/// Links whose id is in `favorites`, in link order
pub fn favorite_links<'a>(links: &'a [Link], favorites: &[String]) -> Vec<&'a Link> {
    links
        .iter()
        .filter(|l| favorites.iter().any(|f| *f == l.id))
        .collect()
}
