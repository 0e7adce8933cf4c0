use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use crate::model::HabitLog;

pub type ChunkData = Arc<[HabitLog]>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Decoded chunks keyed by chunk id. When full, inserting a new chunk evicts
/// the one accessed longest ago.
#[derive(Debug)]
pub struct LogsCache {
    entries: LruCache<String, ChunkData>,
    stats: CacheStats,
}

impl LogsCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    pub fn get(&mut self, chunk_id: &str) -> Option<ChunkData> {
        match self.entries.get(chunk_id) {
            Some(data) => {
                self.stats.hits += 1;
                Some(Arc::clone(data))
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn set(&mut self, chunk_id: impl Into<String>, data: ChunkData) {
        self.entries.put(chunk_id.into(), data);
    }

    pub fn contains(&self, chunk_id: &str) -> bool {
        self.entries.contains(chunk_id)
    }

    /// Cached chunk ids, most recently used first.
    pub fn chunk_ids(&self) -> Vec<String> {
        self.entries.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
