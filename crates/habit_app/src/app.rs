use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use habit_core::characters::{is_variant_unlocked, points_to_next_unlock, unlock_level};
use habit_core::{FileStore, HabitTracker, StorageConfig};
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub(crate) data_dir: PathBuf,
    pub(crate) storage: StorageConfig,
    pub(crate) demo_days: Option<u32>,
    pub(crate) today: Option<NaiveDate>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("HABIT_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(days) = std::env::var("HABIT_CHUNK_SIZE_DAYS") {
            if let Ok(value) = days.trim().parse::<u32>() {
                if value > 0 {
                    config.storage.chunk_size_days = value;
                }
            }
        }
        if let Ok(chunks) = std::env::var("HABIT_CACHE_CHUNKS") {
            if let Ok(value) = chunks.trim().parse::<usize>() {
                if value > 0 {
                    config.storage.max_chunks_in_memory = value;
                }
            }
        }
        if let Ok(days) = std::env::var("HABIT_DEMO_DAYS") {
            if let Ok(value) = days.trim().parse::<u32>() {
                config.demo_days = Some(value);
            }
        }
        if let Ok(today) = std::env::var("HABIT_TODAY") {
            match NaiveDate::parse_from_str(today.trim(), "%Y-%m-%d") {
                Ok(date) => config.today = Some(date),
                Err(err) => warn!(value = %today, %err, "ignoring HABIT_TODAY"),
            }
        }
        Ok(config)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_demo_days(mut self, days: u32) -> Self {
        self.demo_days = Some(days);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./habit-data"),
            storage: StorageConfig::default(),
            demo_days: None,
            today: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HabitLine {
    pub name: String,
    pub current_streak: u32,
    pub best_streak: u32,
    pub done_today: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantLine {
    pub name: &'static str,
    pub description: &'static str,
    pub unlock_level: u32,
    pub unlocked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub today: NaiveDate,
    pub points: u64,
    pub level: u32,
    pub title: String,
    pub next_threshold: u64,
    pub points_to_next_unlock: Option<u64>,
    pub character: &'static str,
    pub variants: Vec<VariantLine>,
    pub drift: i64,
    pub habits: Vec<HabitLine>,
    pub archived: usize,
}

pub fn build_report(tracker: &HabitTracker, today: NaiveDate, drift: i64) -> Report {
    let progress = tracker.progress();
    let level = tracker.level_info();
    let groups = tracker.grouped_habits();
    let habits = groups
        .active
        .iter()
        .map(|habit| {
            let streak = tracker.streak_info(&habit.id, today);
            HabitLine {
                name: habit.name.clone(),
                current_streak: streak.current,
                best_streak: streak.best,
                done_today: tracker.is_habit_completed(&habit.id, today),
            }
        })
        .collect();
    let character = progress.selected_character.character;
    let variants = character
        .variants()
        .iter()
        .map(|variant| VariantLine {
            name: variant.name,
            description: variant.description,
            unlock_level: unlock_level(variant.id),
            unlocked: is_variant_unlocked(variant.id, level.level),
        })
        .collect();
    Report {
        today,
        points: progress.points,
        level: level.level,
        title: level.title,
        next_threshold: level.next_threshold,
        points_to_next_unlock: points_to_next_unlock(progress.points),
        character: character.display_name(),
        variants,
        drift,
        habits,
        archived: groups.archived.len(),
    }
}

/// Open the data directory, optionally seed demo history, repair progress
/// against the log history and report the result.
pub fn run(config: AppConfig) -> Result<Report> {
    info!(path = %config.data_dir.display(), "opening habit data");
    let backend = FileStore::open(&config.data_dir)
        .with_context(|| format!("failed to open {}", config.data_dir.display()))?;
    let tracker = HabitTracker::builder()
        .with_backend(Arc::new(backend))
        .with_storage_config(config.storage)
        .build()?;

    let today = config.today();
    if let Some(days) = config.demo_days {
        if tracker.logs().is_empty() {
            let generated = tracker.generate_demo_history(days, today, &mut rand::rng())?;
            info!(generated, days, "seeded demo history");
        } else {
            debug!("history present, skipping demo data");
        }
    }

    let drift = tracker.reconcile()?;
    let report = build_report(&tracker, today, drift);
    info!(
        %today,
        points = report.points,
        level = report.level,
        title = %report.title,
        next = report.next_threshold,
        drift,
        "progress"
    );
    for line in &report.habits {
        info!(
            habit = %line.name,
            current = line.current_streak,
            best = line.best_streak,
            done = line.done_today,
            "streak"
        );
    }
    for variant in &report.variants {
        debug!(
            character = report.character,
            variant = variant.name,
            description = variant.description,
            level = variant.unlock_level,
            unlocked = variant.unlocked,
            "character variant"
        );
    }
    let stats = tracker.log_store().cache_stats();
    debug!(hits = stats.hits, misses = stats.misses, "chunk cache");
    Ok(report)
}
