//! Storage layer
//!
//! Persists the two entity collections (links and categories) and the
//! favorites set.
//!
//! ## Architecture
//!
//! - **LocalStorage**: SQLite key-value file, always available
//! - **RemoteBackend**: adapter over an opaque [`DocumentStore`]
//! - **FallbackBackend**: tries the remote first, falls back to local on error
//!
//! Every save is a whole-collection overwrite written as one batch.

pub mod document;
pub mod error;
pub mod fallback;
pub mod local;
pub mod remote;
pub mod schema;

pub use document::{Document, DocumentStore, HttpDocumentStore, MemoryDocumentStore};
pub use error::{StorageError, StorageResult};
pub use fallback::FallbackBackend;
pub use local::LocalStorage;
pub use remote::RemoteBackend;
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};

use crate::models::{Category, Link};

/// Both collections as loaded from a backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub links: Vec<Link>,
    pub categories: Vec<Category>,
}

/// Which store served a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Remote,
    Local,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Remote => write!(f, "remote"),
            BackendKind::Local => write!(f, "local"),
        }
    }
}

/// Persistence contract for links and categories
pub trait Backend {
    /// Load both collections
    fn load_all(&mut self) -> StorageResult<Snapshot>;

    /// Overwrite the stored links with `links`
    fn save_links(&mut self, links: &[Link]) -> StorageResult<()>;

    /// Overwrite the stored categories with `categories`
    fn save_categories(&mut self, categories: &[Category]) -> StorageResult<()>;
}

/// Persistence for the favorites set, kept apart from the link collection
pub trait FavoritesStore {
    fn load_favorites(&mut self) -> StorageResult<Vec<String>>;

    fn save_favorites(&mut self, favorites: &[String]) -> StorageResult<()>;
}
