//! Local key-value storage
//!
//! A small SQLite-backed stand-in for browser local storage. Values are JSON
//! strings stored under the keys `links`, `categories` and `favorites`.
//!
//! Storage location: `~/.local/share/linkboard/linkboard.db` (configurable via `Config`)

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::schema::{init_schema, needs_init};
use super::{Backend, FavoritesStore, Snapshot};
use crate::config::Config;
use crate::models::{default_categories, Category, Link};

/// Key holding the JSON array of links
pub const LINKS_KEY: &str = "links";
/// Key holding the JSON array of categories
pub const CATEGORIES_KEY: &str = "categories";
/// Key holding the JSON array of favorite link ids
pub const FAVORITES_KEY: &str = "favorites";

/// SQLite key-value store
pub struct LocalStorage {
    conn: Connection,
}

impl LocalStorage {
    /// Open or create the local database described by `config`
    pub fn open(config: &Config) -> StorageResult<Self> {
        let path = config.sqlite_path();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::directory(e, parent.to_path_buf()))?;
        }

        let conn = Connection::open(&path)?;
        if needs_init(&conn)? {
            init_schema(&conn)?;
        }

        debug!("Opened local storage at {:?}", path);
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Read the raw value stored under `key`
    pub fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    /// Remove `key`; returns whether it existed
    pub fn remove_item(&self, key: &str) -> StorageResult<bool> {
        let removed = self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(removed > 0)
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// Decode the JSON value under `key`
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.get_item(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::serialization(key, e)),
            None => Ok(None),
        }
    }

    /// Encode `value` as JSON under `key`
    pub fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::serialization(key, e))?;
        self.set_item(key, &raw)
    }
}

impl Backend for LocalStorage {
    fn load_all(&mut self) -> StorageResult<Snapshot> {
        let links: Vec<Link> = self.load_json(LINKS_KEY)?.unwrap_or_default();
        let categories: Vec<Category> = self
            .load_json(CATEGORIES_KEY)?
            .unwrap_or_else(default_categories);

        debug!(
            links = links.len(),
            categories = categories.len(),
            "Loaded from local storage"
        );
        Ok(Snapshot { links, categories })
    }

    fn save_links(&mut self, links: &[Link]) -> StorageResult<()> {
        self.save_json(LINKS_KEY, links)?;
        debug!(count = links.len(), "Saved links to local storage");
        Ok(())
    }

    fn save_categories(&mut self, categories: &[Category]) -> StorageResult<()> {
        self.save_json(CATEGORIES_KEY, categories)?;
        debug!(count = categories.len(), "Saved categories to local storage");
        Ok(())
    }
}

impl FavoritesStore for LocalStorage {
    fn load_favorites(&mut self) -> StorageResult<Vec<String>> {
        Ok(self.load_json(FAVORITES_KEY)?.unwrap_or_default())
    }

    fn save_favorites(&mut self, favorites: &[String]) -> StorageResult<()> {
        self.save_json(FAVORITES_KEY, favorites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_get_set_remove_item() {
        let storage = LocalStorage::open_in_memory().unwrap();
        assert!(storage.get_item("theme").unwrap().is_none());

        storage.set_item("theme", "\"dark\"").unwrap();
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("\"dark\""));

        storage.set_item("theme", "\"light\"").unwrap();
        assert_eq!(storage.keys().unwrap(), vec!["theme"]);

        assert!(storage.remove_item("theme").unwrap());
        assert!(!storage.remove_item("theme").unwrap());
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn test_empty_store_loads_default_categories() {
        let mut storage = LocalStorage::open_in_memory().unwrap();
        let snapshot = storage.load_all().unwrap();
        assert!(snapshot.links.is_empty());
        assert_eq!(snapshot.categories, default_categories());
    }

    #[test]
    fn test_round_trip() {
        let mut storage = LocalStorage::open_in_memory().unwrap();

        let categories = vec![Category::new("Reading", 0), Category::new("Music", 1)];
        let links = vec![
            Link::new("Rust", "https://rust-lang.org").in_category(categories[0].id.clone()),
            Link::new("Docs", "https://docs.rs").with_description("crate docs"),
        ];

        storage.save_categories(&categories).unwrap();
        storage.save_links(&links).unwrap();

        let snapshot = storage.load_all().unwrap();
        assert_eq!(snapshot.links, links);
        assert_eq!(snapshot.categories, categories);
    }

    #[test]
    fn test_saved_empty_categories_stay_empty() {
        let mut storage = LocalStorage::open_in_memory().unwrap();
        storage.save_categories(&[]).unwrap();
        assert!(storage.load_all().unwrap().categories.is_empty());
    }

    #[test]
    fn test_favorites_round_trip() {
        let mut storage = LocalStorage::open_in_memory().unwrap();
        assert!(storage.load_favorites().unwrap().is_empty());

        let favorites = vec!["a".to_string(), "b".to_string()];
        storage.save_favorites(&favorites).unwrap();
        assert_eq!(storage.load_favorites().unwrap(), favorites);
    }

    #[test]
    fn test_corrupt_value_reports_key() {
        let mut storage = LocalStorage::open_in_memory().unwrap();
        storage.set_item(LINKS_KEY, "{not json").unwrap();

        let err = storage.load_all().unwrap_err();
        assert!(matches!(err, StorageError::Serialization { ref key, .. } if key == LINKS_KEY));
    }

    #[test]
    fn test_open_under_a_file_reports_directory_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let config = Config {
            data_dir: blocker.join("data"),
            ..Config::default()
        };

        let err = match LocalStorage::open(&config) {
            Err(e) => e,
            Ok(_) => panic!("opening below a regular file must fail"),
        };
        assert!(matches!(
            err,
            StorageError::CreateDirectory { ref path, .. } if *path == blocker.join("data")
        ));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let link = Link::new("Persistent", "https://persist.com");
        {
            let mut storage = LocalStorage::open(&config).unwrap();
            storage.save_links(std::slice::from_ref(&link)).unwrap();
        }

        assert!(config.sqlite_path().exists());

        let mut storage = LocalStorage::open(&config).unwrap();
        assert_eq!(storage.load_all().unwrap().links, vec![link]);
    }
}
