//! JSON-file backed record store.
//!
//! Each collection lives in `<root>/<collection>.json` as a single object
//! mapping ids to records. Writes go to a temp file first and are renamed
//! into place, so a crash never leaves a half-written collection.

use crate::store::RecordStore;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use toolvault_core::{Error, Result, ToolVaultConfig};

pub struct FileStore {
    root: PathBuf,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store rooted at the configured (or platform default) directory
    pub fn from_config(config: &ToolVaultConfig) -> Result<Self> {
        Ok(Self::new(config.resolve_store_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, collection: &str) -> Result<PathBuf> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::store_error(format!(
                "Invalid collection name '{}'",
                collection
            )));
        }
        Ok(self.root.join(format!("{}.json", collection)))
    }

    async fn read_collection(&self, collection: &str) -> Result<Map<String, Value>> {
        let path = self.collection_path(collection)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(Error::io(e)),
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(records)) => Ok(records),
            Ok(_) => Err(Error::store_error(format!(
                "{} does not contain a JSON object",
                path.display()
            ))),
            Err(e) => Err(Error::store_error(format!(
                "Failed to parse {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn write_collection(&self, collection: &str, records: &Map<String, Value>) -> Result<()> {
        let path = self.collection_path(collection)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(Error::io)?;

        let content = serde_json::to_string_pretty(records)
            .map_err(|e| Error::store_error(format!("Failed to serialize {}: {}", collection, e)))?;

        // Write to temp file first
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, content)
            .await
            .map_err(Error::io)?;

        // Atomic rename
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(Error::io)?;

        log::debug!("Wrote {} record(s) to {}", records.len(), path.display());
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let mut records = self.read_collection(collection).await?;
        Ok(records.remove(id))
    }

    async fn put(&self, collection: &str, id: &str, record: Value) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_collection(collection).await?;
        records.insert(id.to_string(), record);
        self.write_collection(collection, &records).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_collection(collection).await?;
        if records.shift_remove(id).is_none() {
            return Ok(false);
        }
        self.write_collection(collection, &records).await?;
        Ok(true)
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>> {
        let records = self.read_collection(collection).await?;
        let mut entries: Vec<(String, Value)> = records.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_persists_across_instances() {
        let temp = TempDir::new().unwrap();

        let store = FileStore::new(temp.path());
        store.put("history", "x", json!({"tool": "hash"})).await.unwrap();
        drop(store);

        let reopened = FileStore::new(temp.path());
        assert_eq!(
            reopened.get("history", "x").await.unwrap(),
            Some(json!({"tool": "hash"}))
        );
        assert!(temp.path().join("history.json").exists());
        assert!(!temp.path().join("history.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("not-yet-created"));
        assert!(store.list("templates").await.unwrap().is_empty());
        assert!(!store.delete("templates", "a").await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_path_like_collection_names() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        let err = store.put("../escape", "a", json!(1)).await.unwrap_err();
        assert!(matches!(err, Error::StoreError { .. }));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let temp = TempDir::new().unwrap();
        tokio::fs::write(temp.path().join("history.json"), "[1, 2")
            .await
            .unwrap();
        let store = FileStore::new(temp.path());
        assert!(matches!(
            store.list("history").await.unwrap_err(),
            Error::StoreError { .. }
        ));
    }
}
