//! Record store abstraction and the in-memory implementation

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use toolvault_core::Result;

/// Keyed JSON records grouped into named collections
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    /// Insert or replace a record
    async fn put(&self, collection: &str, id: &str, record: Value) -> Result<()>;

    /// Remove a record, returning whether it existed
    async fn delete(&self, collection: &str, id: &str) -> Result<bool>;

    /// Every record in a collection, ordered by id
    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|records| records.get(id))
            .cloned())
    }

    async fn put(&self, collection: &str, id: &str, record: Value) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), record);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .is_some_and(|records| records.remove(id).is_some()))
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .map(|(id, record)| (id.clone(), record.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_crud() {
        let store = MemoryStore::new();
        store.put("history", "b", json!({"n": 2})).await.unwrap();
        store.put("history", "a", json!({"n": 1})).await.unwrap();

        assert_eq!(store.get("history", "a").await.unwrap(), Some(json!({"n": 1})));
        assert_eq!(store.get("templates", "a").await.unwrap(), None);

        let ids: Vec<String> = store
            .list("history")
            .await
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);

        assert!(store.delete("history", "a").await.unwrap());
        assert!(!store.delete("history", "a").await.unwrap());
        assert!(!store.delete("missing", "a").await.unwrap());
    }
}
