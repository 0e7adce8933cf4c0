use std::sync::Arc;

use tracing::debug;

use super::kv::KeyValueStore;
use super::{keys, read_json};
use crate::error::StorageResult;
use crate::model::Habit;

/// Habits shown to a user who has never saved any.
pub fn default_habits() -> Vec<Habit> {
    vec![
        Habit::new("default-1", "Daily Exercise", "#0667d2").with_order(0),
        Habit::new("default-2", "8h sleep", "#059669").with_order(2),
    ]
}

/// The habit list, stored whole under a single key.
pub struct HabitStore {
    backend: Arc<dyn KeyValueStore>,
}

impl HabitStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Falls back to [`default_habits`] when nothing usable is stored.
    pub fn get_habits(&self) -> StorageResult<Vec<Habit>> {
        match read_json(self.backend.as_ref(), keys::HABITS)? {
            Some(habits) => Ok(habits),
            None => {
                debug!("no stored habits, using defaults");
                Ok(default_habits())
            }
        }
    }

    pub fn save_habits(&self, habits: &[Habit]) -> StorageResult<()> {
        self.backend
            .set(keys::HABITS, &serde_json::to_string(habits)?)?;
        debug!(count = habits.len(), "saved habits");
        Ok(())
    }
}
