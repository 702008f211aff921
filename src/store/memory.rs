use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::{Document, DocumentStore, Filter, StoreError, StoredDocument};

/// In-process store keeping each collection as an insertion-ordered list.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<BTreeMap<String, Vec<StoredDocument>>>,
    inserts: AtomicUsize,
    finds: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `insert_one` calls served so far.
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::Relaxed)
    }

    /// Number of `find_many` calls served so far.
    pub fn find_count(&self) -> usize {
        self.finds.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<String, StoreError> {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                body: document,
            });
        Ok(id)
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        self.finds.fetch_add(1, Ordering::Relaxed);
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(documents
            .iter()
            .filter(|doc| filter.matches(&doc.body))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        Ok(collections.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_find_preserves_insertion_order_and_limit() {
        let store = MemoryDocumentStore::new();
        let mut ids = Vec::new();
        for n in 0..5 {
            ids.push(store.insert_one("product", doc(json!({"n": n}))).await.unwrap());
        }

        let found = store.find_many("product", &Filter::new(), 3).await.unwrap();
        let found_ids: Vec<_> = found.iter().map(|d| d.id.clone()).collect();
        assert_eq!(found_ids, ids[..3].to_vec());
        assert_eq!(store.insert_count(), 5);
        assert_eq!(store.find_count(), 1);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = MemoryDocumentStore::new();
        store.insert_one("product", doc(json!({"brand": "LG"}))).await.unwrap();
        store.insert_one("servicecenter", doc(json!({"brands": ["LG"]}))).await.unwrap();

        let filter = Filter::new().equals("brand", "LG");
        assert_eq!(store.find_many("product", &filter, 100).await.unwrap().len(), 1);
        assert!(store.find_many("servicecenter", &filter, 100).await.unwrap().is_empty());
        assert!(store.find_many("warranty", &Filter::new(), 100).await.unwrap().is_empty());
        assert_eq!(
            store.list_collection_names().await.unwrap(),
            vec!["product".to_string(), "servicecenter".to_string()]
        );
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = MemoryDocumentStore::new();
        let a = store.insert_one("product", Document::new()).await.unwrap();
        let b = store.insert_one("product", Document::new()).await.unwrap();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }
}
