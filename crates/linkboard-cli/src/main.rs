//! linkboard CLI
//!
//! Command-line interface for linkboard - links grouped by category.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use linkboard_core::Config;

mod commands;
mod metadata;
mod output;
mod prompt;

use commands::link::{LinkChanges, NewLink};
use commands::render::RenderOptions;
use commands::Board;
use output::{Output, OutputFormat};

/// Environment variable holding the log level
const LOG_ENV: &str = "LINKBOARD_LOG";

#[derive(Parser)]
#[command(name = "linkboard")]
#[command(about = "linkboard - Links grouped by category")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage links
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
    /// Manage categories
    #[command(alias = "cat")]
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage favorites
    Fav {
        #[command(subcommand)]
        command: FavCommands,
    },
    /// Write the board as an HTML page
    Render {
        /// Output file (default: <data_dir>/board.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only show this category (ID or name, or "all")
        #[arg(short, long)]
        category: Option<String>,
        /// Only show links matching this text
        #[arg(short, long)]
        search: Option<String>,
        /// Open the page in the default browser
        #[arg(long)]
        open: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (backend in use, data location, counts)
    Status,
}

#[derive(Subcommand)]
enum LinkCommands {
    /// Add a new link
    #[command(alias = "create")]
    Add {
        /// URL to save
        url: String,
        /// Title (fetched from the page when omitted)
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Category ID or name
        #[arg(short, long, conflicts_with = "new_category")]
        category: Option<String>,
        /// Create a category with this name and file the link under it
        #[arg(long, value_name = "NAME")]
        new_category: Option<String>,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Do not fetch the page title
        #[arg(long)]
        no_fetch: bool,
    },
    /// List links
    #[command(alias = "ls")]
    List {
        /// Filter by category (ID or name, or "all")
        #[arg(short, long)]
        category: Option<String>,
        /// Filter by text in title, description or URL
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show link details
    Show {
        /// Link ID (full ID or prefix)
        id: String,
    },
    /// Edit a link (prompts when no fields are given)
    Edit {
        /// Link ID (full ID or prefix)
        id: String,
        #[arg(short = 'T', long)]
        title: Option<String>,
        #[arg(short, long)]
        url: Option<String>,
        /// Category ID or name
        #[arg(short, long)]
        category: Option<String>,
        /// New description (empty to clear)
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change the title of a link
    Rename {
        /// Link ID (full ID or prefix)
        id: String,
        /// New title
        title: String,
    },
    /// Set the description of a link (omit to clear it)
    Describe {
        /// Link ID (full ID or prefix)
        id: String,
        description: Option<String>,
    },
    /// Delete a link
    #[command(alias = "rm")]
    Delete {
        /// Link ID (full ID or prefix)
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a link to another category
    #[command(alias = "mv")]
    Move {
        /// Link ID (full ID or prefix)
        id: String,
        /// Target category ID or name
        category: String,
    },
    /// Search links
    Search {
        /// Search query
        query: String,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Add a category
    Add {
        /// Category name
        name: String,
    },
    /// List categories
    #[command(alias = "ls")]
    List,
    /// Rename a category
    Rename {
        /// Category ID or name
        category: String,
        /// New name
        name: String,
    },
    /// Delete a category (its links become uncategorized)
    #[command(alias = "rm")]
    Delete {
        /// Category ID or name
        category: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a category to the position of another
    Move {
        /// Category to move
        category: String,
        /// Category whose position it takes
        before: String,
    },
}

#[derive(Subcommand)]
enum FavCommands {
    /// Mark or unmark a link as favorite
    Toggle {
        /// Link ID (full ID or prefix)
        id: String,
    },
    /// List favorite links
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, remote_url, remote_enabled, remote_timeout_secs, seed_samples, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:?}", err);
        if let Some(hint) = commands::recovery_hint(&err) {
            eprintln!("\nHint: {}", hint);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return match command {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key.clone(), value.clone(), config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    let mut board = commands::open_board(&config)?;
    debug!("Using {} storage", board.backend().last_used());

    match cli.command {
        Commands::Link { command } => handle_link_command(command, &mut board, &config, &output),
        Commands::Category { command } => handle_category_command(command, &mut board, &output),
        Commands::Fav { command } => match command {
            FavCommands::Toggle { id } => commands::favorite::toggle(&mut board, id, &output),
            FavCommands::List => commands::favorite::list(&board, &output),
        },
        Commands::Render {
            output: path,
            category,
            search,
            open,
        } => {
            let options = RenderOptions {
                output: path.unwrap_or_else(|| config.data_dir.join("board.html")),
                category,
                search,
                open,
            };
            commands::render::render(&mut board, options, &output)
        }
        Commands::Status => commands::status::show(&board, &config, &output),
        Commands::Config { .. } => Ok(()), // Handled above
    }
}

fn handle_link_command(
    command: LinkCommands,
    board: &mut Board,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        LinkCommands::Add {
            url,
            title,
            category,
            new_category,
            description,
            no_fetch,
        } => {
            let new = NewLink {
                url,
                title,
                category,
                new_category,
                description,
                fetch_timeout: (!no_fetch).then(|| fetch_timeout(config)),
            };
            commands::link::add(board, new, output)
        }
        LinkCommands::List { category, search } => {
            commands::link::list(board, category, search, output)
        }
        LinkCommands::Show { id } => commands::link::show(board, id, output),
        LinkCommands::Edit {
            id,
            title,
            url,
            category,
            description,
        } => {
            let changes = LinkChanges {
                title,
                url,
                category,
                description,
            };
            commands::link::edit(board, id, changes, output)
        }
        LinkCommands::Rename { id, title } => commands::link::rename(board, id, title, output),
        LinkCommands::Describe { id, description } => {
            commands::link::describe(board, id, description, output)
        }
        LinkCommands::Delete { id, yes } => commands::link::delete(board, id, yes, output),
        LinkCommands::Move { id, category } => commands::link::move_to(board, id, category, output),
        LinkCommands::Search { query } => commands::link::search(board, query, output),
    }
}

fn handle_category_command(
    command: CategoryCommands,
    board: &mut Board,
    output: &Output,
) -> Result<()> {
    match command {
        CategoryCommands::Add { name } => commands::category::add(board, name, output),
        CategoryCommands::List => commands::category::list(board, output),
        CategoryCommands::Rename { category, name } => {
            commands::category::rename(board, category, name, output)
        }
        CategoryCommands::Delete { category, yes } => {
            commands::category::delete(board, category, yes, output)
        }
        CategoryCommands::Move { category, before } => {
            commands::category::move_before(board, category, before, output)
        }
    }
}

/// Metadata fetches share the remote store timeout
fn fetch_timeout(config: &Config) -> Duration {
    config.remote_timeout()
}

/// Initialize logging
///
/// Level comes from LINKBOARD_LOG (warnings only when unset). Logs go to
/// config.log_file when set, otherwise to stderr.
fn init_logging(config: &Config) {
    let level = std::env::var(LOG_ENV).unwrap_or_else(|_| "warn".to_string());
    let env_filter = EnvFilter::new(format!(
        "linkboard_core={},linkboard_cli={}",
        level, level
    ));

    let log_file = config.log_file.as_ref().and_then(|path| {
        match File::options().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Warning: Could not open log file {:?}: {}", path, e);
                None
            }
        }
    });

    // Ignore error if already initialized
    let _ = match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init(),
    };
}
