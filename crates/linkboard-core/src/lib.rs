//! linkboard core library
//!
//! This crate provides the core of linkboard, a bookmark board that groups
//! links into user-defined categories.
//!
//! # Architecture
//!
//! - **LinkCollection**: in-memory state (links, categories, favorites,
//!   filter, open form) and every user operation on it
//! - **Backend**: persistence contract, implemented by local SQLite storage,
//!   a remote document store adapter and a remote-first fallback
//! - **render**: pure HTML rendering of the board
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let backend = FallbackBackend::from_config(&config)?;
//! let mut collection = LinkCollection::open(backend)?;
//!
//! // Add a link
//! collection.add_link(LinkForm::new("Example", "https://example.com"))?;
//!
//! // Render the board
//! let page = render::render_page(&collection.view());
//! ```
//!
//! # Modules
//!
//! - `collection`: State container and form state (main entry point)
//! - `models`: Links, categories and sentinel ids
//! - `filter`: Category filter and search
//! - `render`: HTML renderer
//! - `storage`: Local, remote and fallback persistence
//! - `config`: Application configuration

pub mod collection;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod render;
pub mod storage;

pub use collection::{LinkCollection, LinkForm, Modal};
pub use config::Config;
pub use error::{Error, Result, ValidationError};
pub use filter::{CategoryFilter, Filter};
pub use models::{Category, Link};
pub use render::BoardView;
pub use storage::{Backend, BackendKind, FallbackBackend, FavoritesStore, LocalStorage, StorageError};
