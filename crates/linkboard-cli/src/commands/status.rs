//! Status command handler

use anyhow::Result;

use linkboard_core::storage::DocumentStore;
use linkboard_core::{BackendKind, Config, FallbackBackend, LinkCollection};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show<D: DocumentStore>(
    board: &LinkCollection<FallbackBackend<D>>,
    config: &Config,
    output: &Output,
) -> Result<()> {
    let backend = board.backend();
    let database = config.sqlite_path();
    let database_size = std::fs::metadata(&database).map(|m| m.len()).unwrap_or(0);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "backend": backend.last_used().to_string(),
                    "remote_configured": backend.has_remote(),
                    "remote_url": config.remote_url,
                    "remote_enabled": config.remote_enabled,
                    "storage": {
                        "data_dir": config.data_dir,
                        "database": database,
                        "database_size": database_size
                    },
                    "counts": {
                        "links": board.links().len(),
                        "categories": board.categories().len(),
                        "favorites": board.favorites().len()
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", backend.last_used());
        }
        OutputFormat::Human => {
            println!("linkboard Status");
            println!("================");
            println!();
            println!("Backend:");
            println!("  In use: {}", backend.last_used());
            if backend.has_remote() && backend.last_used() == BackendKind::Local {
                println!("  Remote store unreachable, using local storage");
            }
            println!(
                "  Remote: {}",
                if config.remote_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            if let Some(ref url) = config.remote_url {
                println!("  Server: {}", url);
            }
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Database: {} ({} bytes)", database.display(), database_size);
            println!();
            println!("Contents:");
            println!("  Links:      {}", board.links().len());
            println!("  Categories: {}", board.categories().len());
            println!("  Favorites:  {}", board.favorites().len());
        }
    }

    Ok(())
}
