//! Command handlers

pub mod category;
pub mod config;
pub mod favorite;
pub mod link;
pub mod render;
pub mod status;

use anyhow::{bail, Context, Result};
use tracing::info;

use linkboard_core::models::UNCATEGORIZED;
use linkboard_core::storage::{Backend, FavoritesStore, HttpDocumentStore};
use linkboard_core::{Config, Error, FallbackBackend, LinkCollection, StorageError};

/// The collection as opened by the CLI
pub type Board = LinkCollection<FallbackBackend<HttpDocumentStore>>;

/// Open the configured backend and load the collection
pub fn open_board(config: &Config) -> Result<Board> {
    let backend = FallbackBackend::from_config(config).context("Failed to open storage")?;
    let mut board = LinkCollection::open(backend).context("Failed to load links")?;

    if config.seed_samples && board.seed_samples_if_empty()? {
        info!("Seeded sample links into empty collection");
    }
    Ok(board)
}

/// Recovery hint for a storage failure anywhere in the error chain
pub fn recovery_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        let storage = match cause.downcast_ref::<Error>() {
            Some(Error::Storage(e)) => Some(e),
            _ => cause.downcast_ref::<StorageError>(),
        };
        storage.and_then(StorageError::recovery_suggestion)
    })
}

/// Resolve a link ID (full ID or unique prefix)
pub fn resolve_link_id<B>(board: &LinkCollection<B>, id: &str) -> Result<String>
where
    B: Backend + FavoritesStore,
{
    if board.link(id).is_some() {
        return Ok(id.to_string());
    }

    let matches: Vec<_> = board
        .links()
        .iter()
        .filter(|l| l.id.starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No link found matching: {}", id),
        1 => Ok(matches[0].id.clone()),
        _ => {
            eprintln!("Multiple links match '{}':", id);
            for link in &matches {
                eprintln!("  {} - {}", link.id, link.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Resolve a category given by ID or by name (case-insensitive)
pub fn resolve_category_id<B>(board: &LinkCollection<B>, value: &str) -> Result<String>
where
    B: Backend + FavoritesStore,
{
    if value == UNCATEGORIZED || board.category(value).is_some() {
        return Ok(value.to_string());
    }

    let by_name: Vec<_> = board
        .categories()
        .iter()
        .filter(|c| c.name.eq_ignore_ascii_case(value))
        .collect();

    match by_name.as_slice() {
        [category] => Ok(category.id.clone()),
        [] => bail!(
            "No category matching '{}'. See `linkboard category list`.",
            value
        ),
        _ => bail!("Several categories are named '{}'. Use the category ID.", value),
    }
}
