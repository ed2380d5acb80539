//! Remote-first backend with local fallback
//!
//! The remote backend is chosen at startup: it is present only when a remote
//! store is configured and enabled. Each call tries the remote first and, on
//! any error, logs a warning and repeats the call against local storage.
//! There is no retry and no reconciliation between the two stores.

use tracing::{info, warn};

use super::document::{DocumentStore, HttpDocumentStore};
use super::error::StorageResult;
use super::local::LocalStorage;
use super::remote::RemoteBackend;
use super::{Backend, BackendKind, FavoritesStore, Snapshot};
use crate::config::Config;
use crate::models::{Category, Link};

/// Backend that prefers a remote store and degrades to local storage
pub struct FallbackBackend<D> {
    remote: Option<RemoteBackend<D>>,
    local: LocalStorage,
    last_used: BackendKind,
}

impl FallbackBackend<HttpDocumentStore> {
    /// Build the backend described by `config`
    pub fn from_config(config: &Config) -> StorageResult<Self> {
        let local = LocalStorage::open(config)?;

        let remote = match config.active_remote_url() {
            Some(url) => {
                info!("Using remote document store at {}", url);
                Some(HttpDocumentStore::new(url, config.remote_timeout())?)
            }
            None => {
                info!("Remote store not configured, using local storage");
                None
            }
        };

        Ok(Self::new(remote, local))
    }
}

impl<D: DocumentStore> FallbackBackend<D> {
    pub fn new(remote: Option<D>, local: LocalStorage) -> Self {
        let last_used = if remote.is_some() {
            BackendKind::Remote
        } else {
            BackendKind::Local
        };
        Self {
            remote: remote.map(RemoteBackend::new),
            local,
            last_used,
        }
    }

    /// Local-only backend
    pub fn local_only(local: LocalStorage) -> Self {
        Self::new(None, local)
    }

    /// Whether a remote store was selected at startup
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// The store that served the most recent call
    pub fn last_used(&self) -> BackendKind {
        self.last_used
    }

    /// Access the local storage
    pub fn local(&self) -> &LocalStorage {
        &self.local
    }

    /// Access the remote backend, if any
    pub fn remote(&self) -> Option<&RemoteBackend<D>> {
        self.remote.as_ref()
    }

    fn with_fallback<T>(
        &mut self,
        operation: &str,
        remote_op: impl FnOnce(&mut RemoteBackend<D>) -> StorageResult<T>,
        local_op: impl FnOnce(&mut LocalStorage) -> StorageResult<T>,
    ) -> StorageResult<T> {
        if let Some(remote) = self.remote.as_mut() {
            match remote_op(remote) {
                Ok(value) => {
                    self.last_used = BackendKind::Remote;
                    return Ok(value);
                }
                Err(e) => {
                    warn!("Remote {} failed, falling back to local storage: {}", operation, e);
                }
            }
        }

        self.last_used = BackendKind::Local;
        local_op(&mut self.local)
    }
}

impl<D: DocumentStore> Backend for FallbackBackend<D> {
    fn load_all(&mut self) -> StorageResult<Snapshot> {
        self.with_fallback("load", |r| r.load_all(), |l| l.load_all())
    }

    fn save_links(&mut self, links: &[Link]) -> StorageResult<()> {
        self.with_fallback(
            "save of links",
            |r| r.save_links(links),
            |l| l.save_links(links),
        )
    }

    fn save_categories(&mut self, categories: &[Category]) -> StorageResult<()> {
        self.with_fallback(
            "save of categories",
            |r| r.save_categories(categories),
            |l| l.save_categories(categories),
        )
    }
}

impl<D> FavoritesStore for FallbackBackend<D> {
    fn load_favorites(&mut self) -> StorageResult<Vec<String>> {
        self.local.load_favorites()
    }

    fn save_favorites(&mut self, favorites: &[String]) -> StorageResult<()> {
        self.local.save_favorites(favorites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_categories;
    use crate::storage::document::Document;
    use crate::storage::remote::LINKS_COLLECTION;
    use crate::storage::{MemoryDocumentStore, StorageError};

    /// Document store that is always unreachable
    struct OfflineStore;

    impl DocumentStore for OfflineStore {
        fn fetch_collection(&mut self, collection: &str) -> StorageResult<Vec<Document>> {
            Err(StorageError::HttpStatus {
                url: format!("http://offline/{}", collection),
                status: 503,
            })
        }

        fn replace_collection(&mut self, collection: &str, _: Vec<Document>) -> StorageResult<()> {
            Err(StorageError::HttpStatus {
                url: format!("http://offline/{}", collection),
                status: 503,
            })
        }
    }

    #[test]
    fn test_local_only_uses_local() {
        let local = LocalStorage::open_in_memory().unwrap();
        let mut backend: FallbackBackend<MemoryDocumentStore> = FallbackBackend::local_only(local);
        assert!(!backend.has_remote());

        backend
            .save_links(&[Link::new("Rust", "https://rust-lang.org")])
            .unwrap();
        assert_eq!(backend.last_used(), BackendKind::Local);
        assert_eq!(backend.load_all().unwrap().links.len(), 1);
    }

    #[test]
    fn test_remote_success_does_not_touch_local() {
        let local = LocalStorage::open_in_memory().unwrap();
        let mut backend = FallbackBackend::new(Some(MemoryDocumentStore::new()), local);

        backend
            .save_links(&[Link::new("Rust", "https://rust-lang.org")])
            .unwrap();
        assert_eq!(backend.last_used(), BackendKind::Remote);
        assert!(backend.local().get_item("links").unwrap().is_none());
        assert_eq!(backend.remote().unwrap().store().len(LINKS_COLLECTION), 1);
    }

    #[test]
    fn test_remote_failure_falls_back_on_save() {
        let local = LocalStorage::open_in_memory().unwrap();
        let mut backend = FallbackBackend::new(Some(OfflineStore), local);

        let link = Link::new("Rust", "https://rust-lang.org");
        backend.save_links(std::slice::from_ref(&link)).unwrap();
        assert_eq!(backend.last_used(), BackendKind::Local);

        let snapshot = backend.load_all().unwrap();
        assert_eq!(backend.last_used(), BackendKind::Local);
        assert_eq!(snapshot.links, vec![link]);
        assert_eq!(snapshot.categories, default_categories());
    }

    #[test]
    fn test_favorites_always_local() {
        let local = LocalStorage::open_in_memory().unwrap();
        let mut backend = FallbackBackend::new(Some(MemoryDocumentStore::new()), local);

        backend.save_favorites(&["abc".to_string()]).unwrap();
        assert_eq!(backend.load_favorites().unwrap(), vec!["abc"]);
        assert!(backend.local().get_item("favorites").unwrap().is_some());
    }

    #[test]
    fn test_from_config_without_remote() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };

        let backend = FallbackBackend::from_config(&config).unwrap();
        assert!(!backend.has_remote());
        assert_eq!(backend.last_used(), BackendKind::Local);
    }
}
