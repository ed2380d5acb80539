//! Remote backend over a document store
//!
//! Maps links and categories onto two collections, `links` and `categories`,
//! one document per entity keyed by its id. Each save stamps the documents
//! with a `serverUpdatedAt` field and writes the collection as one batch.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::document::{Document, DocumentStore};
use super::error::{StorageError, StorageResult};
use super::{Backend, Snapshot};
use crate::models::{default_categories, Category, Link};

/// Collection holding link documents
pub const LINKS_COLLECTION: &str = "links";
/// Collection holding category documents
pub const CATEGORIES_COLLECTION: &str = "categories";
/// Field written by the adapter on every save
pub const SERVER_TIMESTAMP_FIELD: &str = "serverUpdatedAt";

/// [`Backend`] implementation on top of a [`DocumentStore`]
pub struct RemoteBackend<D> {
    store: D,
}

impl<D: DocumentStore> RemoteBackend<D> {
    pub fn new(store: D) -> Self {
        Self { store }
    }

    /// Access the underlying document store
    pub fn store(&self) -> &D {
        &self.store
    }

    fn load_categories(&mut self) -> StorageResult<Vec<Category>> {
        let documents = self.store.fetch_collection(CATEGORIES_COLLECTION)?;

        if documents.is_empty() {
            info!("Remote store has no categories, creating defaults");
            let defaults = default_categories();
            self.save_categories(&defaults)?;
            return Ok(defaults);
        }

        let mut categories: Vec<Category> = documents
            .into_iter()
            .map(|doc| from_document(CATEGORIES_COLLECTION, doc))
            .collect::<StorageResult<_>>()?;
        categories.sort_by_key(|c| c.order);
        Ok(categories)
    }

    fn load_links(&mut self) -> StorageResult<Vec<Link>> {
        let mut links: Vec<Link> = self
            .store
            .fetch_collection(LINKS_COLLECTION)?
            .into_iter()
            .map(|doc| from_document(LINKS_COLLECTION, doc))
            .collect::<StorageResult<_>>()?;
        // Newest first
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }
}

impl<D: DocumentStore> Backend for RemoteBackend<D> {
    fn load_all(&mut self) -> StorageResult<Snapshot> {
        let categories = self.load_categories()?;
        let links = self.load_links()?;
        debug!(
            links = links.len(),
            categories = categories.len(),
            "Loaded from remote store"
        );
        Ok(Snapshot { links, categories })
    }

    fn save_links(&mut self, links: &[Link]) -> StorageResult<()> {
        let documents = links
            .iter()
            .map(|link| to_document(LINKS_COLLECTION, &link.id, link))
            .collect::<StorageResult<Vec<_>>>()?;
        self.store.replace_collection(LINKS_COLLECTION, documents)
    }

    fn save_categories(&mut self, categories: &[Category]) -> StorageResult<()> {
        let documents = categories
            .iter()
            .enumerate()
            .map(|(index, category)| -> StorageResult<Document> {
                let mut doc = to_document(CATEGORIES_COLLECTION, &category.id, category)?;
                doc.fields.insert("order".to_string(), Value::from(index as u64));
                Ok(doc)
            })
            .collect::<StorageResult<Vec<_>>>()?;
        self.store
            .replace_collection(CATEGORIES_COLLECTION, documents)
    }
}

/// Encode an entity as a document, dropping the id from its fields
fn to_document<T: Serialize>(collection: &str, id: &str, entity: &T) -> StorageResult<Document> {
    let value =
        serde_json::to_value(entity).map_err(|e| StorageError::serialization(collection, e))?;

    let Value::Object(mut fields) = value else {
        return Err(StorageError::InvalidDocument {
            collection: collection.to_string(),
            id: id.to_string(),
            details: "entity did not serialize to an object".to_string(),
        });
    };

    fields.remove("id");
    fields.insert(
        SERVER_TIMESTAMP_FIELD.to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );
    Ok(Document::new(id, fields))
}

/// Decode a document, restoring its id into the entity
fn from_document<T: DeserializeOwned>(collection: &str, doc: Document) -> StorageResult<T> {
    let Document { id, mut fields } = doc;
    fields.insert("id".to_string(), Value::String(id.clone()));

    serde_json::from_value(Value::Object(fields)).map_err(|e| StorageError::InvalidDocument {
        collection: collection.to_string(),
        id,
        details: e.to_string(),
    })
}
