//! Favorite command handlers

use anyhow::{Context, Result};

use linkboard_core::storage::{Backend, FavoritesStore};
use linkboard_core::LinkCollection;

use super::resolve_link_id;
use crate::output::{short_id, Output};

/// Flip the favorite mark of a link
pub fn toggle<B>(board: &mut LinkCollection<B>, id: String, output: &Output) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    let id = resolve_link_id(board, &id)?;
    let favorite = board
        .toggle_favorite(&id)
        .context("Failed to update favorites")?;

    if favorite {
        output.success(&format!("Added {} to favorites", short_id(&id)));
    } else {
        output.success(&format!("Removed {} from favorites", short_id(&id)));
    }
    Ok(())
}

/// List favorite links
pub fn list<B>(board: &LinkCollection<B>, output: &Output) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    output.print_links(&board.favorite_links(), board.categories());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::*;

    #[test]
    fn test_toggle_by_prefix() {
        let mut board = board_with(&[("A", "https://a.com", "work")]);
        let id = board.links()[0].id.clone();

        toggle(&mut board, id[..5].to_string(), &quiet()).unwrap();
        assert!(board.is_favorite(&id));
        assert_eq!(board.favorite_links().len(), 1);

        toggle(&mut board, id.clone(), &quiet()).unwrap();
        assert!(!board.is_favorite(&id));
        list(&board, &quiet()).unwrap();
    }
}
