use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::cache::{CacheStats, ChunkData, LogsCache};
use super::kv::KeyValueStore;
use super::{keys, read_json, StorageConfig};
use crate::error::StorageResult;
use crate::model::HabitLog;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMeta {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub habit_ids: Vec<String>,
    pub size: usize,
}

impl ChunkMeta {
    /// `logs` must be sorted by date and non-empty.
    fn describe(logs: &[HabitLog]) -> Option<Self> {
        let first = logs.first()?;
        let last = logs.last()?;
        let mut habit_ids: Vec<String> = Vec::new();
        for log in logs {
            if !habit_ids.contains(&log.habit_id) {
                habit_ids.push(log.habit_id.clone());
            }
        }
        Some(Self {
            start_date: first.date,
            end_date: last.date,
            habit_ids,
            size: logs.len(),
        })
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.end_date >= start && self.start_date <= end
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogsIndex {
    pub total_logs: usize,
    pub chunks: BTreeMap<String, ChunkMeta>,
}

impl LogsIndex {
    fn from_chunks(chunks: &BTreeMap<String, Vec<HabitLog>>) -> Self {
        let chunks: BTreeMap<String, ChunkMeta> = chunks
            .iter()
            .filter_map(|(id, logs)| ChunkMeta::describe(logs).map(|meta| (id.clone(), meta)))
            .collect();
        Self {
            total_logs: chunks.values().map(|meta| meta.size).sum(),
            chunks,
        }
    }
}

/// Days since 1970-01-01, negative before the epoch.
fn days_since_epoch(date: NaiveDate) -> i64 {
    date.signed_duration_since(NaiveDate::default()).num_days()
}

/// Fixed-width time bucket of `date`.
pub fn chunk_id_for(date: NaiveDate, chunk_size_days: u32) -> String {
    days_since_epoch(date)
        .div_euclid(i64::from(chunk_size_days))
        .to_string()
}

fn sort_by_date(logs: &mut [HabitLog]) {
    logs.sort_by_key(|log| log.date);
}

/// Log history split into time-bucketed chunks, one backing-store key each,
/// plus an index of chunk date ranges used to answer range queries.
pub struct ChunkedLogStore {
    backend: Arc<dyn KeyValueStore>,
    chunk_size_days: u32,
    cache: Mutex<LogsCache>,
}

impl ChunkedLogStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, config: StorageConfig) -> StorageResult<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            chunk_size_days: config.chunk_size_days,
            cache: Mutex::new(LogsCache::new(config.cache_capacity()?)),
        })
    }

    pub fn chunk_id(&self, date: NaiveDate) -> String {
        chunk_id_for(date, self.chunk_size_days)
    }

    /// Missing or corrupt indexes read as empty.
    pub fn load_index(&self) -> StorageResult<LogsIndex> {
        Ok(read_json(self.backend.as_ref(), keys::LOGS_INDEX)?.unwrap_or_default())
    }

    fn write_chunk(&self, chunk_id: &str, logs: Vec<HabitLog>) -> StorageResult<()> {
        let payload = serde_json::to_string(&logs)?;
        self.backend.set(&keys::chunk(chunk_id), &payload)?;
        self.cache.lock().set(chunk_id, ChunkData::from(logs));
        Ok(())
    }

    fn load_chunk(&self, chunk_id: &str) -> StorageResult<ChunkData> {
        if let Some(cached) = self.cache.lock().get(chunk_id) {
            return Ok(cached);
        }
        let logs: Vec<HabitLog> =
            read_json(self.backend.as_ref(), &keys::chunk(chunk_id))?.unwrap_or_default();
        debug!(chunk_id, size = logs.len(), "loaded chunk from storage");
        let data = ChunkData::from(logs);
        self.cache.lock().set(chunk_id, Arc::clone(&data));
        Ok(data)
    }

    fn stored_chunk_ids(&self) -> StorageResult<BTreeSet<String>> {
        Ok(self
            .backend
            .keys()?
            .iter()
            .filter_map(|key| keys::chunk_id_from_key(key))
            .map(str::to_string)
            .collect())
    }

    /// Replace the stored history with `logs`.
    ///
    /// Chunks are written before the index so an interrupted save leaves
    /// chunk data from which [`Self::rebuild_index`] can recover.
    pub fn save_logs(&self, logs: &[HabitLog]) -> StorageResult<()> {
        let mut chunks: BTreeMap<String, Vec<HabitLog>> = BTreeMap::new();
        for log in logs {
            chunks
                .entry(self.chunk_id(log.date))
                .or_default()
                .push(log.clone());
        }
        for chunk_logs in chunks.values_mut() {
            sort_by_date(chunk_logs);
        }

        let index = LogsIndex::from_chunks(&chunks);
        for (chunk_id, chunk_logs) in chunks {
            self.write_chunk(&chunk_id, chunk_logs)?;
        }

        for stale in self.stored_chunk_ids()? {
            if !index.chunks.contains_key(&stale) {
                self.backend.remove(&keys::chunk(&stale))?;
                debug!(chunk_id = %stale, "removed stale chunk");
            }
        }

        self.backend
            .set(keys::LOGS_INDEX, &serde_json::to_string(&index)?)?;
        debug!(
            total_logs = index.total_logs,
            chunks = index.chunks.len(),
            "saved logs"
        );
        Ok(())
    }

    pub fn get_logs(&self) -> StorageResult<Vec<HabitLog>> {
        let index = self.load_index()?;
        let mut all = Vec::with_capacity(index.total_logs);
        for chunk_id in index.chunks.keys() {
            all.extend(self.load_chunk(chunk_id)?.iter().cloned());
        }
        sort_by_date(&mut all);
        Ok(all)
    }

    /// Logs dated within `start..=end`, loading only chunks whose range overlaps.
    pub fn get_logs_for_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<HabitLog>> {
        let index = self.load_index()?;
        let mut relevant = Vec::new();
        for (chunk_id, meta) in &index.chunks {
            if !meta.overlaps(start, end) {
                continue;
            }
            let chunk = self.load_chunk(chunk_id)?;
            relevant.extend(
                chunk
                    .iter()
                    .filter(|log| log.date >= start && log.date <= end)
                    .cloned(),
            );
        }
        sort_by_date(&mut relevant);
        Ok(relevant)
    }

    /// Factory reset: every chunk, the index, habits and progress.
    pub fn clear_all_habit_data(&self) -> StorageResult<()> {
        for key in self.backend.keys()? {
            let owned = keys::chunk_id_from_key(&key).is_some()
                || key == keys::LOGS_INDEX
                || key == keys::HABITS
                || key == keys::PROGRESS;
            if owned {
                self.backend.remove(&key)?;
            }
        }
        self.cache.lock().clear();
        info!("cleared all habit data");
        Ok(())
    }

    /// Rebuild the index from chunk contents alone.
    pub fn rebuild_index(&self) -> StorageResult<LogsIndex> {
        self.cache.lock().clear();
        let mut chunks: BTreeMap<String, Vec<HabitLog>> = BTreeMap::new();
        for chunk_id in self.stored_chunk_ids()? {
            let mut logs = self.load_chunk(&chunk_id)?.to_vec();
            sort_by_date(&mut logs);
            chunks.insert(chunk_id, logs);
        }
        let index = LogsIndex::from_chunks(&chunks);
        self.backend
            .set(keys::LOGS_INDEX, &serde_json::to_string(&index)?)?;
        info!(
            total_logs = index.total_logs,
            chunks = index.chunks.len(),
            "rebuilt logs index"
        );
        Ok(index)
    }

    /// Rebuild the index when it disagrees with the chunks actually stored.
    /// Returns whether a rebuild happened.
    pub fn recover_index(&self) -> StorageResult<bool> {
        let raw_index = self.backend.get(keys::LOGS_INDEX)?;
        let index: Option<LogsIndex> = read_json(self.backend.as_ref(), keys::LOGS_INDEX)?;
        let stored = self.stored_chunk_ids()?;

        let consistent = match &index {
            Some(index) => index.chunks.keys().cloned().collect::<BTreeSet<_>>() == stored,
            None => raw_index.is_none() && stored.is_empty(),
        };
        if consistent {
            return Ok(false);
        }
        warn!(
            indexed = index.as_ref().map(|i| i.chunks.len()).unwrap_or(0),
            stored = stored.len(),
            "logs index out of sync with chunks"
        );
        self.rebuild_index()?;
        Ok(true)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    pub fn cached_chunk_ids(&self) -> Vec<String> {
        self.cache.lock().chunk_ids()
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}
