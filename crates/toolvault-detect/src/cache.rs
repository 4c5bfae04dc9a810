//! Memoized detection keyed by content.
//!
//! Values are identified by a SHA-256 digest of their serialized form plus
//! the serialized metadata, so structurally equal inputs share an entry.

use crate::engine::TypeDetector;
use dashmap::DashMap;
use serde_json::Value;
use sha2::{Digest, Sha256};
use toolvault_core::{Error, OutputMetadata, OutputType, Result};

/// Content key for a (value, metadata) pair
pub fn cache_key(value: &Value, metadata: Option<&OutputMetadata>) -> Result<String> {
    let mut hasher = Sha256::new();
    let value_bytes = serde_json::to_vec(value)
        .map_err(|e| Error::detection_error(format!("Failed to serialize value: {}", e)))?;
    hasher.update(&value_bytes);
    hasher.update([0u8]);
    if let Some(meta) = metadata {
        let meta_bytes = serde_json::to_vec(meta)
            .map_err(|e| Error::detection_error(format!("Failed to serialize metadata: {}", e)))?;
        hasher.update(&meta_bytes);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Bounded memo of detection outcomes
pub struct DetectionCache {
    entries: DashMap<String, OutputType>,
    capacity: usize,
}

impl DetectionCache {
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Cached type for a key
    pub fn get(&self, key: &str) -> Option<OutputType> {
        self.entries.get(key).map(|entry| *entry)
    }

    /// Detect through the cache. Failed detections are not memoized.
    pub fn detect(
        &self,
        detector: &TypeDetector,
        value: &Value,
        metadata: Option<&OutputMetadata>,
    ) -> Result<OutputType> {
        let key = cache_key(value, metadata)?;
        if let Some(hit) = self.get(&key) {
            log::trace!("Detection cache hit {}", &key[..12]);
            return Ok(hit);
        }

        let detected = detector.try_detect(value, metadata)?;
        if self.entries.len() >= self.capacity {
            log::debug!("Detection cache full ({} entries), clearing", self.capacity);
            self.entries.clear();
        }
        self.entries.insert(key, detected);
        Ok(detected)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
