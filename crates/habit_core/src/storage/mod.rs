//! Persistence on top of a whole-value key-value store.

pub mod cache;
pub mod habits;
pub mod kv;
pub mod logs;
pub mod progress;

use std::num::NonZeroUsize;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{StorageError, StorageResult};

pub use cache::{CacheStats, LogsCache};
pub use habits::HabitStore;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use logs::{ChunkMeta, ChunkedLogStore, LogsIndex};
pub use progress::ProgressStore;

pub mod keys {
    pub const HABITS: &str = "habits";
    pub const LOGS_INDEX: &str = "habit-logs-index";
    pub const LOGS_CHUNK_PREFIX: &str = "habit-logs-chunk";
    pub const PROGRESS: &str = "user-progress";

    pub fn chunk(chunk_id: &str) -> String {
        format!("{LOGS_CHUNK_PREFIX}-{chunk_id}")
    }

    pub fn chunk_id_from_key(key: &str) -> Option<&str> {
        key.strip_prefix(LOGS_CHUNK_PREFIX)?.strip_prefix('-')
    }
}

pub const DEFAULT_CHUNK_SIZE_DAYS: u32 = 100;
pub const DEFAULT_MAX_CHUNKS_IN_MEMORY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageConfig {
    pub chunk_size_days: u32,
    pub max_chunks_in_memory: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            chunk_size_days: DEFAULT_CHUNK_SIZE_DAYS,
            max_chunks_in_memory: DEFAULT_MAX_CHUNKS_IN_MEMORY,
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> StorageResult<()> {
        if self.chunk_size_days == 0 {
            return Err(StorageError::InvalidConfig(
                "chunk size must be at least one day".into(),
            ));
        }
        self.cache_capacity().map(|_| ())
    }

    pub(crate) fn cache_capacity(&self) -> StorageResult<NonZeroUsize> {
        NonZeroUsize::new(self.max_chunks_in_memory).ok_or_else(|| {
            StorageError::InvalidConfig("cache must hold at least one chunk".into())
        })
    }
}

/// Read and decode `key`. Undecodable values are treated as absent.
pub(crate) fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StorageResult<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(key, %err, "discarding corrupt stored value");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_keys_round_trip() {
        let key = keys::chunk("197");
        assert_eq!(key, "habit-logs-chunk-197");
        assert_eq!(keys::chunk_id_from_key(&key), Some("197"));
        assert_eq!(keys::chunk_id_from_key("habit-logs-index"), None);
        assert_eq!(keys::chunk_id_from_key("habits"), None);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(StorageConfig::default().validate().is_ok());
        let no_days = StorageConfig {
            chunk_size_days: 0,
            ..StorageConfig::default()
        };
        assert!(no_days.validate().is_err());
        let no_cache = StorageConfig {
            max_chunks_in_memory: 0,
            ..StorageConfig::default()
        };
        assert!(no_cache.validate().is_err());
    }

    #[test]
    fn corrupt_json_reads_as_missing() {
        let store = MemoryStore::new();
        store.set("user-progress", "{not json").unwrap();
        let value: Option<Vec<u32>> = read_json(&store, "user-progress").unwrap();
        assert!(value.is_none());
    }
}
