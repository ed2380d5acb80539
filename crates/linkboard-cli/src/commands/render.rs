//! Render command handler
//!
//! Writes the board as a standalone HTML page.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use linkboard_core::render::render_page;
use linkboard_core::storage::{Backend, FavoritesStore};
use linkboard_core::{CategoryFilter, LinkCollection};

use super::resolve_category_id;
use crate::output::Output;

/// Options of `render`
#[derive(Debug, Default)]
pub struct RenderOptions {
    pub output: PathBuf,
    pub category: Option<String>,
    pub search: Option<String>,
    pub open: bool,
}

/// Render the board to an HTML file
pub fn render<B>(board: &mut LinkCollection<B>, options: RenderOptions, output: &Output) -> Result<()>
where
    B: Backend + FavoritesStore,
{
    if let Some(category) = options.category {
        let filter = match CategoryFilter::parse(&category) {
            CategoryFilter::All => CategoryFilter::All,
            CategoryFilter::Only(value) => {
                CategoryFilter::Only(resolve_category_id(board, &value)?)
            }
        };
        board.set_category_filter(filter);
    }
    if let Some(search) = options.search {
        board.set_search(search);
    }

    let page = render_page(&board.view());

    if let Some(parent) = options.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    std::fs::write(&options.output, page)
        .with_context(|| format!("Failed to write {:?}", options.output))?;
    debug!("Rendered board to {:?}", options.output);

    output.success(&format!("Wrote {}", options.output.display()));

    if options.open {
        open::that(&options.output)
            .with_context(|| format!("Failed to open {:?}", options.output))?;
    }
    Ok(())
}
