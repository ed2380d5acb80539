//! Remote document store interface
//!
//! The remote store is an opaque collaborator: named collections of JSON
//! documents keyed by id. The only operations needed are reading a whole
//! collection and replacing a whole collection in one batch.
//!
//! ## HTTP protocol
//!
//! - `GET {base}/{collection}` returns `[{"id": ..., "fields": {...}}, ...]`
//!   (404 means the collection is empty)
//! - `PUT {base}/{collection}` with the same array shape replaces it

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::error::{StorageError, StorageResult};

/// A single document: its id plus a JSON object of fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Collections of JSON documents keyed by id
pub trait DocumentStore {
    /// Read every document of `collection`, in no particular order
    fn fetch_collection(&mut self, collection: &str) -> StorageResult<Vec<Document>>;

    /// Replace the whole of `collection` with `documents` as one batch
    fn replace_collection(
        &mut self,
        collection: &str,
        documents: Vec<Document>,
    ) -> StorageResult<()>;
}

/// In-process document store
#[derive(Debug, Default, Clone)]
pub struct MemoryDocumentStore {
    collections: BTreeMap<String, BTreeMap<String, Document>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, BTreeMap::len)
    }

    /// Look up one document
    pub fn get(&self, collection: &str, id: &str) -> Option<&Document> {
        self.collections.get(collection)?.get(id)
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn fetch_collection(&mut self, collection: &str) -> StorageResult<Vec<Document>> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    fn replace_collection(
        &mut self,
        collection: &str,
        documents: Vec<Document>,
    ) -> StorageResult<()> {
        let docs = documents
            .into_iter()
            .map(|doc| (doc.id.clone(), doc))
            .collect();
        self.collections.insert(collection.to_string(), docs);
        Ok(())
    }
}

/// Document store reached over HTTP
pub struct HttpDocumentStore {
    client: Client,
    base_url: String,
}

impl HttpDocumentStore {
    /// Create a client for the store rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> StorageResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("linkboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| StorageError::Http {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }
}

impl DocumentStore for HttpDocumentStore {
    fn fetch_collection(&mut self, collection: &str) -> StorageResult<Vec<Document>> {
        let url = self.collection_url(collection);
        let http_err = |source: reqwest::Error| StorageError::Http {
            url: url.clone(),
            source,
        };

        let response = self.client.get(&url).send().map_err(http_err)?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Remote collection {} does not exist yet", collection);
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(StorageError::HttpStatus {
                url: url.clone(),
                status: response.status().as_u16(),
            });
        }

        let documents: Vec<Document> = response.json().map_err(http_err)?;
        debug!(count = documents.len(), "Fetched remote collection {}", collection);
        Ok(documents)
    }

    fn replace_collection(
        &mut self,
        collection: &str,
        documents: Vec<Document>,
    ) -> StorageResult<()> {
        let url = self.collection_url(collection);

        let response = self
            .client
            .put(&url)
            .json(&documents)
            .send()
            .map_err(|source| StorageError::Http {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(StorageError::HttpStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        debug!(count = documents.len(), "Replaced remote collection {}", collection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, value: Value) -> Document {
        match value {
            Value::Object(fields) => Document::new(id, fields),
            _ => panic!("fields must be an object"),
        }
    }

    #[test]
    fn test_memory_store_replace_and_fetch() {
        let mut store = MemoryDocumentStore::new();
        assert!(store.fetch_collection("links").unwrap().is_empty());

        store
            .replace_collection(
                "links",
                vec![doc("a", json!({"title": "A"})), doc("b", json!({"title": "B"}))],
            )
            .unwrap();
        assert_eq!(store.len("links"), 2);
        assert_eq!(store.get("links", "a").unwrap().fields["title"], "A");

        store
            .replace_collection("links", vec![doc("c", json!({"title": "C"}))])
            .unwrap();
        let docs = store.fetch_collection("links").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "c");
        assert_eq!(store.len("categories"), 0);
    }

    #[test]
    fn test_document_wire_shape() {
        let document = doc("work", json!({"name": "Work", "order": 0}));
        let wire = serde_json::to_value(&document).unwrap();
        assert_eq!(wire, json!({"id": "work", "fields": {"name": "Work", "order": 0}}));

        let parsed: Document = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert!(parsed.fields.is_empty());
    }

    #[test]
    fn test_http_store_trims_base_url() {
        let store =
            HttpDocumentStore::new("http://localhost:8080/db/", Duration::from_secs(1)).unwrap();
        assert_eq!(store.base_url(), "http://localhost:8080/db");
        assert_eq!(
            store.collection_url("links"),
            "http://localhost:8080/db/links"
        );
    }

    #[test]
    fn test_http_store_unreachable_is_http_error() {
        // Port 9 (discard) is not listening on test machines
        let mut store =
            HttpDocumentStore::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = store.fetch_collection("links").unwrap_err();
        assert!(matches!(err, StorageError::Http { .. }));
        assert!(err.recovery_suggestion().is_some());
    }
}
