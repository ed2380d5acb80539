//! Category command handlers

use anyhow::{bail, Context, Result};

use linkboard_core::storage::{Backend, FavoritesStore};
use linkboard_core::LinkCollection;

use super::resolve_category_id;
use crate::output::Output;
use crate::prompt::confirm;

/// Add a category
pub fn add<B>(board: &mut LinkCollection<B>, name: String, output: &Output) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    board.open_category_manager();
    let result = board.add_category(&name);
    board.close_modal();

    let id = result.context("Failed to add category")?;
    output.success(&format!("Added category: {} ({})", name.trim(), id));
    Ok(())
}

/// List categories with link counts
pub fn list<B>(board: &LinkCollection<B>, output: &Output) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    let counts: Vec<_> = board
        .categories()
        .iter()
        .map(|category| {
            let count = board
                .links()
                .iter()
                .filter(|l| l.category == category.id)
                .count();
            (category, count)
        })
        .collect();

    output.print_categories(&counts);
    Ok(())
}

/// Rename a category
pub fn rename<B>(
    board: &mut LinkCollection<B>,
    category: String,
    name: String,
    output: &Output,
) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    let id = existing_category(board, &category)?;

    board.open_category_manager();
    board.begin_rename_category(&id)?;
    let result = board.rename_category(&id, &name);
    board.close_modal();

    result.context("Failed to rename category")?;
    output.success(&format!("Renamed category {} to {}", id, name.trim()));
    Ok(())
}

/// Delete a category, moving its links to "Uncategorized"
pub fn delete<B>(
    board: &mut LinkCollection<B>,
    category: String,
    yes: bool,
    output: &Output,
) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    let id = existing_category(board, &category)?;

    if !yes && output.should_prompt() {
        println!(
            "Delete category: {}. Its links will become uncategorized.",
            board.category_name(&id)
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let moved = board
        .delete_category(&id)
        .context("Failed to delete category")?;
    output.success(&format!(
        "Deleted category {} ({} link(s) moved to Uncategorized)",
        id, moved
    ));
    Ok(())
}

/// Move a category to the position of another one
pub fn move_before<B>(
    board: &mut LinkCollection<B>,
    category: String,
    before: String,
    output: &Output,
) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    let dragged = existing_category(board, &category)?;
    let target = existing_category(board, &before)?;

    if board
        .reorder_categories(&dragged, &target)
        .context("Failed to reorder categories")?
    {
        output.success(&format!("Moved category {} to position of {}", dragged, target));
    } else {
        output.message("Category order unchanged.");
    }
    Ok(())
}

/// Resolve a stored category; the "uncategorized" sentinel is not one
fn existing_category<B>(board: &LinkCollection<B>, value: &str) -> Result<String>
where
    B: Backend + FavoritesStore,
{
    let id = resolve_category_id(board, value)?;
    if board.category(&id).is_none() {
        bail!("'{}' is not a stored category", value);
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::*;
    use linkboard_core::models::UNCATEGORIZED;
    use linkboard_core::Modal;

    fn ids<B: Backend + FavoritesStore>(board: &LinkCollection<B>) -> Vec<String> {
        board.categories().iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_add_and_duplicate() {
        let mut board = board();
        add(&mut board, "Reading".into(), &quiet()).unwrap();
        assert_eq!(board.categories().len(), 6);
        assert_eq!(board.modal(), &Modal::Closed);

        assert!(add(&mut board, "reading ".into(), &quiet()).is_ok());
        assert!(add(&mut board, "Reading".into(), &quiet()).is_err());
        assert!(add(&mut board, "".into(), &quiet()).is_err());
        assert_eq!(board.modal(), &Modal::Closed);
    }

    #[test]
    fn test_rename_by_name() {
        let mut board = board();
        rename(&mut board, "Work".into(), "Job".into(), &quiet()).unwrap();
        assert_eq!(board.category_name("work"), "Job");
        assert!(rename(&mut board, "work".into(), "Study".into(), &quiet()).is_err());
    }

    #[test]
    fn test_delete_moves_links() {
        let mut board = board_with(&[("A", "https://a.com", "tools")]);
        delete(&mut board, "tools".into(), true, &quiet()).unwrap();

        assert!(board.category("tools").is_none());
        assert_eq!(board.links()[0].category, UNCATEGORIZED);
        assert!(delete(&mut board, UNCATEGORIZED.into(), true, &quiet()).is_err());
    }

    #[test]
    fn test_move_before() {
        let mut board = board();
        move_before(&mut board, "social".into(), "study".into(), &quiet()).unwrap();
        assert_eq!(
            ids(&board),
            vec!["work", "social", "study", "entertainment", "tools"]
        );
    }

    #[test]
    fn test_list_runs() {
        let board = board_with(&[("A", "https://a.com", "tools")]);
        list(&board, &quiet()).unwrap();
    }
}
