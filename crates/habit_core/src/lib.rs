pub mod characters;
pub mod demo;
pub mod error;
pub mod model;
pub mod scoring;
pub mod service;
pub mod storage;

pub use error::{StorageError, StorageResult};
pub use model::{BonusType, Habit, HabitFrequency, HabitLog, ScoreEvent, UserProgress};
pub use scoring::{
    calculate_level, calculate_points_for_habit, level_title, next_level_threshold,
    previous_level_threshold, recalculate_all_points,
};
pub use service::{HabitTracker, HabitTrackerBuilder};
pub use storage::{ChunkedLogStore, FileStore, KeyValueStore, MemoryStore, StorageConfig};
