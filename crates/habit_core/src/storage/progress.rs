use std::sync::Arc;

use tracing::{debug, warn};

use super::kv::KeyValueStore;
use super::{keys, read_json};
use crate::error::StorageResult;
use crate::model::UserProgress;
use crate::scoring::calculate_level;

pub struct ProgressStore {
    backend: Arc<dyn KeyValueStore>,
}

impl ProgressStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Missing or corrupt progress reads as the default. A stored level that
    /// disagrees with the stored points is replaced by the derived one.
    pub fn get_progress(&self) -> StorageResult<UserProgress> {
        let Some(mut progress) = read_json::<UserProgress>(self.backend.as_ref(), keys::PROGRESS)?
        else {
            return Ok(UserProgress::default());
        };
        let derived = calculate_level(progress.points);
        if progress.level != derived {
            warn!(
                stored = progress.level,
                derived,
                points = progress.points,
                "stored level disagrees with points"
            );
            progress.set_points(progress.points);
        }
        Ok(progress)
    }

    pub fn save_progress(&self, progress: &UserProgress) -> StorageResult<()> {
        self.backend
            .set(keys::PROGRESS, &serde_json::to_string(progress)?)?;
        debug!(points = progress.points, level = progress.level, "saved progress");
        Ok(())
    }
}
