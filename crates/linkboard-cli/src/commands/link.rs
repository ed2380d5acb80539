//! Link command handlers

use std::time::Duration;

use anyhow::{Context, Result};

use linkboard_core::models::UNCATEGORIZED;
use linkboard_core::storage::{Backend, FavoritesStore};
use linkboard_core::{CategoryFilter, LinkCollection};

use super::{resolve_category_id, resolve_link_id};
use crate::metadata::fetch_metadata;
use crate::output::{short_id, Output};
use crate::prompt::{confirm, prompt_optional, prompt_with_default};

/// Arguments of `link add`
#[derive(Debug, Default)]
pub struct NewLink {
    pub url: String,
    pub title: Option<String>,
    pub category: Option<String>,
    /// Create this category and file the link under it
    pub new_category: Option<String>,
    pub description: Option<String>,
    /// Fetch the page title when none is given; `None` disables fetching
    pub fetch_timeout: Option<Duration>,
}

/// Field changes of `link edit`
#[derive(Debug, Default)]
pub struct LinkChanges {
    pub title: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl LinkChanges {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.category.is_none()
            && self.description.is_none()
    }
}

/// Add a new link
pub fn add<B>(board: &mut LinkCollection<B>, new: NewLink, output: &Output) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    let created = match new.new_category.as_deref() {
        Some(name) => board
            .quick_add_category(name)
            .context("Failed to add category")?,
        None => None,
    };
    if let Some(id) = &created {
        output.success(&format!("Added category: {}", board.category_name(id)));
    }

    let category = match (created, new.category.as_deref()) {
        (Some(id), _) => Some(id),
        (None, Some(category)) => Some(resolve_category_id(board, category)?),
        (None, None) => None,
    };
    let mut form = match category {
        Some(id) => board.quick_add_to_category(&id),
        None => {
            let form = board.open_link_form(None)?;
            form.category(UNCATEGORIZED)
        }
    };

    let mut title = new.title;
    let mut description = new.description;
    if title.is_none() {
        if let Some(timeout) = new.fetch_timeout {
            let metadata = fetch_metadata(&new.url, timeout);
            title = metadata.title;
            description = description.or(metadata.description);
        }
    }

    form.title = title.unwrap_or_else(|| new.url.clone());
    form.url = new.url;
    if let Some(description) = description {
        form.description = description;
    }

    let id = board.submit_link_form(form).context("Failed to add link")?;

    output.success(&format!("Added link: {}", id));
    if let Some(link) = board.link(&id) {
        output.print_link(link, board.categories(), false);
    }
    Ok(())
}

/// List links, optionally filtered by category and search text
pub fn list<B>(
    board: &mut LinkCollection<B>,
    category: Option<String>,
    search: Option<String>,
    output: &Output,
) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    if let Some(category) = category {
        let filter = match CategoryFilter::parse(&category) {
            CategoryFilter::All => CategoryFilter::All,
            CategoryFilter::Only(value) => {
                CategoryFilter::Only(resolve_category_id(board, &value)?)
            }
        };
        board.set_category_filter(filter);
    }
    if let Some(search) = search {
        board.set_search(search);
    }

    output.print_links(&board.filtered_links(), board.categories());
    Ok(())
}

/// Show a single link
pub fn show<B>(board: &LinkCollection<B>, id: String, output: &Output) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    let id = resolve_link_id(board, &id)?;
    if let Some(link) = board.link(&id) {
        output.print_link(link, board.categories(), board.is_favorite(&id));
    }
    Ok(())
}

/// Edit a link, interactively when no changes are given
pub fn edit<B>(
    board: &mut LinkCollection<B>,
    id: String,
    changes: LinkChanges,
    output: &Output,
) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    let id = resolve_link_id(board, &id)?;
    let mut form = board.open_link_form(Some(&id))?;

    if changes.is_empty() {
        println!("Editing link: {}", id);
        println!("Press Enter to keep current value, or type new value.\n");

        if let Some(title) = prompt_with_default("Title", &form.title)? {
            form.title = title;
        }
        if let Some(url) = prompt_with_default("URL", &form.url)? {
            form.url = url;
        }

        let current = board.category_name(&form.category).to_string();
        if let Some(category) = prompt_with_default("Category", &current)? {
            form.category = resolve_category_id(board, &category)?;
        }

        if !form.description.is_empty() {
            println!("Current description: {}", form.description);
        }
        if let Some(description) = prompt_optional("New description ('-' to clear)")? {
            form.description = if description == "-" {
                String::new()
            } else {
                description
            };
        }
    } else {
        if let Some(title) = changes.title {
            form.title = title;
        }
        if let Some(url) = changes.url {
            form.url = url;
        }
        if let Some(category) = changes.category {
            form.category = resolve_category_id(board, &category)?;
        }
        if let Some(description) = changes.description {
            form.description = description;
        }
    }

    let result = board.submit_link_form(form);
    if result.is_err() {
        board.close_modal();
    }
    result.context("Failed to update link")?;

    output.success("Link updated");
    if let Some(link) = board.link(&id) {
        output.print_link(link, board.categories(), board.is_favorite(&id));
    }
    Ok(())
}

/// Change only the title of a link
pub fn rename<B>(
    board: &mut LinkCollection<B>,
    id: String,
    title: String,
    output: &Output,
) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    let id = resolve_link_id(board, &id)?;
    if board
        .update_title(&id, &title)
        .context("Failed to rename link")?
    {
        output.success(&format!("Renamed link {}", short_id(&id)));
    } else {
        output.message("Title unchanged.");
    }
    Ok(())
}

/// Set or clear the description of a link
pub fn describe<B>(
    board: &mut LinkCollection<B>,
    id: String,
    description: Option<String>,
    output: &Output,
) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    let id = resolve_link_id(board, &id)?;
    let description = description.unwrap_or_default();
    if board
        .update_description(&id, &description)
        .context("Failed to update description")?
    {
        output.success(&format!("Updated description of {}", short_id(&id)));
    } else {
        output.message("Description unchanged.");
    }
    Ok(())
}

/// Delete a link
pub fn delete<B>(board: &mut LinkCollection<B>, id: String, yes: bool, output: &Output) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    let id = resolve_link_id(board, &id)?;

    if !yes && output.should_prompt() {
        if let Some(link) = board.link(&id) {
            println!("Delete link: {} - {}", short_id(&link.id), link.title);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    board.delete_link(&id).context("Failed to delete link")?;
    output.success(&format!("Deleted link: {}", id));
    Ok(())
}

/// Move a link to another category
pub fn move_to<B>(
    board: &mut LinkCollection<B>,
    id: String,
    category: String,
    output: &Output,
) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    let id = resolve_link_id(board, &id)?;
    let target = resolve_category_id(board, &category)?;
    let source = board
        .link(&id)
        .map(|l| l.category.clone())
        .unwrap_or_default();

    if board
        .move_link(&id, &source, &target)
        .context("Failed to move link")?
    {
        output.success(&format!(
            "Moved link {} to {}",
            short_id(&id),
            board.category_name(&target)
        ));
    } else {
        output.message("Link is already in that category.");
    }
    Ok(())
}

/// Search links by title, description and URL
pub fn search<B>(board: &mut LinkCollection<B>, query: String, output: &Output) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    board.set_search(query);
    output.print_links(&board.filtered_links(), board.categories());
    Ok(())
}
