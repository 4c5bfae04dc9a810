//! Execution history with bookmarks

use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use toolvault_core::{Error, OutputType, Result};
use uuid::Uuid;

const COLLECTION: &str = "history";

/// One recorded tool execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub tool_id: String,
    pub parameters: Value,
    pub result: Value,
    /// Type the result was rendered as
    pub output_type: OutputType,
    pub executed_at: DateTime<Utc>,
    #[serde(default)]
    pub bookmarked: bool,
}

impl HistoryEntry {
    pub fn new(
        tool_id: impl Into<String>,
        parameters: Value,
        result: Value,
        output_type: OutputType,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tool_id: tool_id.into(),
            parameters,
            result,
            output_type,
            executed_at: Utc::now(),
            bookmarked: false,
        }
    }

    pub fn with_executed_at(mut self, executed_at: DateTime<Utc>) -> Self {
        self.executed_at = executed_at;
        self
    }

    pub fn bookmarked(mut self, bookmarked: bool) -> Self {
        self.bookmarked = bookmarked;
        self
    }
}

/// Bounded execution log over a [`RecordStore`]
pub struct ExecutionHistory<S: RecordStore> {
    store: Arc<S>,
    limit: usize,
}

impl<S: RecordStore> ExecutionHistory<S> {
    /// `limit` caps how many entries are kept (at least one)
    pub fn new(store: Arc<S>, limit: usize) -> Self {
        Self {
            store,
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Store an entry, evicting the oldest non-bookmarked ones past the limit
    pub async fn record(&self, entry: HistoryEntry) -> Result<HistoryEntry> {
        let record = serde_json::to_value(&entry)
            .map_err(|e| Error::store_error(format!("Failed to serialize history entry: {}", e)))?;
        self.store.put(COLLECTION, &entry.id, record).await?;
        log::debug!("Recorded {} execution {}", entry.tool_id, entry.id);

        self.evict().await?;
        Ok(entry)
    }

    async fn evict(&self) -> Result<()> {
        let entries = self.list().await?;
        if entries.len() <= self.limit {
            return Ok(());
        }

        let excess = entries.len() - self.limit;
        // list() is newest first, so walk from the back
        let victims: Vec<&HistoryEntry> = entries
            .iter()
            .rev()
            .filter(|e| !e.bookmarked)
            .take(excess)
            .collect();
        if victims.len() < excess {
            log::warn!(
                "History holds {} bookmarked entries, above the limit of {}",
                entries.iter().filter(|e| e.bookmarked).count(),
                self.limit
            );
        }
        for victim in victims {
            self.store.delete(COLLECTION, &victim.id).await?;
        }
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<HistoryEntry>> {
        match self.store.get(COLLECTION, id).await? {
            Some(record) => Ok(Some(decode(record)?)),
            None => Ok(None),
        }
    }

    /// All entries, newest first
    pub async fn list(&self) -> Result<Vec<HistoryEntry>> {
        let mut entries = self
            .store
            .list(COLLECTION)
            .await?
            .into_iter()
            .map(|(_, record)| decode(record))
            .collect::<Result<Vec<_>>>()?;
        entries.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));
        Ok(entries)
    }

    /// Bookmarked entries, newest first
    pub async fn bookmarked(&self) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.list().await?;
        entries.retain(|e| e.bookmarked);
        Ok(entries)
    }

    pub async fn set_bookmark(&self, id: &str, bookmarked: bool) -> Result<HistoryEntry> {
        let mut entry = self
            .get(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("history entry {}", id)))?;
        entry.bookmarked = bookmarked;
        let record = serde_json::to_value(&entry)
            .map_err(|e| Error::store_error(format!("Failed to serialize history entry: {}", e)))?;
        self.store.put(COLLECTION, id, record).await?;
        Ok(entry)
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        self.store.delete(COLLECTION, id).await
    }

    /// Remove every entry, returning how many were removed
    pub async fn clear(&self) -> Result<usize> {
        let records = self.store.list(COLLECTION).await?;
        for (id, _) in &records {
            self.store.delete(COLLECTION, id).await?;
        }
        Ok(records.len())
    }
}

fn decode(record: Value) -> Result<HistoryEntry> {
    serde_json::from_value(record)
        .map_err(|e| Error::store_error(format!("Corrupt history entry: {}", e)))
}
