use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::characters::{is_variant_unlocked, CharacterSelection};
use crate::demo::generate_historical_logs;
use crate::model::{self, Habit, HabitGroups, HabitLog, ScoreEvent, UserProgress};
use crate::scoring::{
    calculate_points_for_habit, level_info, recalculate_all_points, streak_info, LevelInfo,
    Recalculation, StreakInfo,
};
use crate::storage::habits::default_habits;
use crate::storage::{
    ChunkedLogStore, HabitStore, KeyValueStore, MemoryStore, ProgressStore, StorageConfig,
};

struct TrackerState {
    habits: Vec<Habit>,
    logs: Vec<HabitLog>,
    progress: UserProgress,
}

/// Habits, their completion logs and the derived progress, kept in memory and
/// written through to a [`KeyValueStore`] on every mutation.
pub struct HabitTracker {
    log_store: ChunkedLogStore,
    habit_store: HabitStore,
    progress_store: ProgressStore,
    state: RwLock<TrackerState>,
}

pub struct HabitTrackerBuilder {
    backend: Option<Arc<dyn KeyValueStore>>,
    storage: StorageConfig,
}

impl HabitTrackerBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            storage: StorageConfig::default(),
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn KeyValueStore>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_storage_config(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }

    /// Opens the stores and loads everything. Without a backend the tracker
    /// runs on a fresh in-memory store.
    pub fn build(self) -> Result<HabitTracker> {
        let backend: Arc<dyn KeyValueStore> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(MemoryStore::new()),
        };
        let log_store = ChunkedLogStore::new(Arc::clone(&backend), self.storage)
            .context("invalid storage configuration")?;
        if log_store.recover_index()? {
            warn!("logs index was rebuilt from chunk data");
        }

        let habit_store = HabitStore::new(Arc::clone(&backend));
        let progress_store = ProgressStore::new(backend);
        let state = TrackerState {
            habits: habit_store.get_habits().context("loading habits")?,
            logs: log_store.get_logs().context("loading logs")?,
            progress: progress_store.get_progress().context("loading progress")?,
        };
        info!(
            habits = state.habits.len(),
            logs = state.logs.len(),
            points = state.progress.points,
            "habit tracker loaded"
        );

        Ok(HabitTracker {
            log_store,
            habit_store,
            progress_store,
            state: RwLock::new(state),
        })
    }
}

impl Default for HabitTrackerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Millisecond timestamp ids, bumped past any id already taken.
fn next_habit_id(habits: &[Habit]) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    while habits.iter().any(|habit| habit.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

fn find_habit<'a>(habits: &'a mut [Habit], habit_id: &str) -> Result<&'a mut Habit> {
    habits
        .iter_mut()
        .find(|habit| habit.id == habit_id)
        .ok_or_else(|| anyhow!("unknown habit `{habit_id}`"))
}

fn upsert_log(logs: &mut Vec<HabitLog>, incoming: HabitLog) {
    match logs
        .iter_mut()
        .find(|log| log.habit_id == incoming.habit_id && log.date == incoming.date)
    {
        Some(existing) => existing.completed = incoming.completed,
        None => logs.push(incoming),
    }
}

impl HabitTracker {
    pub fn builder() -> HabitTrackerBuilder {
        HabitTrackerBuilder::new()
    }

    pub fn habits(&self) -> Vec<Habit> {
        self.state.read().habits.clone()
    }

    pub fn grouped_habits(&self) -> HabitGroups {
        model::sort_and_group_habits(&self.state.read().habits)
    }

    pub fn logs(&self) -> Vec<HabitLog> {
        self.state.read().logs.clone()
    }

    pub fn logs_for_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<HabitLog>> {
        Ok(self.log_store.get_logs_for_date_range(start, end)?)
    }

    pub fn progress(&self) -> UserProgress {
        self.state.read().progress.clone()
    }

    pub fn level_info(&self) -> LevelInfo {
        level_info(self.state.read().progress.points)
    }

    pub fn streak_info(&self, habit_id: &str, today: NaiveDate) -> StreakInfo {
        streak_info(habit_id, &self.state.read().logs, today)
    }

    pub fn completed_habits(&self, date: NaiveDate) -> Vec<String> {
        model::completed_habits(date, &self.state.read().logs)
    }

    pub fn is_habit_completed(&self, habit_id: &str, date: NaiveDate) -> bool {
        model::is_habit_completed(habit_id, date, &self.state.read().logs)
    }

    pub fn log_store(&self) -> &ChunkedLogStore {
        &self.log_store
    }

    pub fn add_habit(&self, name: impl Into<String>, color: impl Into<String>) -> Result<Habit> {
        let mut state = self.state.write();
        let order = state.habits.iter().map(|h| h.order).max().unwrap_or(-1) + 1;
        let habit = Habit::new(next_habit_id(&state.habits), name, color).with_order(order);

        let mut habits = state.habits.clone();
        habits.push(habit.clone());
        self.habit_store.save_habits(&habits)?;
        state.habits = habits;
        info!(id = %habit.id, name = %habit.name, "added habit");
        Ok(habit)
    }

    pub fn update_habit(
        &self,
        habit_id: &str,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<()> {
        let mut state = self.state.write();
        let mut habits = state.habits.clone();
        let habit = find_habit(&mut habits, habit_id)?;
        habit.name = name.into();
        habit.color = color.into();
        self.habit_store.save_habits(&habits)?;
        state.habits = habits;
        info!(id = habit_id, "updated habit");
        Ok(())
    }

    pub fn archive_habit(&self, habit_id: &str) -> Result<()> {
        self.apply_bulk_mutation("archive", |habits, _| {
            let habit = find_habit(habits, habit_id)?;
            habit.archived = true;
            habit.archived_at = Some(Utc::now());
            Ok(())
        })?;
        Ok(())
    }

    pub fn unarchive_habit(&self, habit_id: &str) -> Result<()> {
        self.apply_bulk_mutation("unarchive", |habits, _| {
            let habit = find_habit(habits, habit_id)?;
            habit.archived = false;
            habit.archived_at = None;
            Ok(())
        })?;
        Ok(())
    }

    /// Removes the habit together with its whole history.
    pub fn delete_habit(&self, habit_id: &str) -> Result<()> {
        self.apply_bulk_mutation("delete", |habits, logs| {
            find_habit(habits, habit_id)?;
            habits.retain(|habit| habit.id != habit_id);
            logs.retain(|log| log.habit_id != habit_id);
            Ok(())
        })?;
        Ok(())
    }

    /// Flip the completion of `habit_id` on `date` and return what completing
    /// it earned. Un-completing returns no events.
    ///
    /// Archived habits ignore days after their archive date.
    ///
    /// Stored points come from a full replay, while a milestone stays announced
    /// once it has been awarded. When a broken streak grows back to such a
    /// milestone the replay pays it again but no event reports it, so the
    /// returned events can sum to less than the change in stored points.
    pub fn toggle_habit(&self, habit_id: &str, date: NaiveDate) -> Result<Vec<ScoreEvent>> {
        let mut state = self.state.write();
        let habit = state
            .habits
            .iter()
            .find(|habit| habit.id == habit_id)
            .cloned()
            .ok_or_else(|| anyhow!("unknown habit `{habit_id}`"))?;
        if !habit.accepts_completion_on(date) {
            debug!(id = habit_id, %date, "habit archived before this day, ignoring toggle");
            return Ok(Vec::new());
        }

        let mut logs = state.logs.clone();
        let completing = match logs
            .iter_mut()
            .find(|log| log.habit_id == habit_id && log.date == date)
        {
            Some(log) => {
                log.completed = !log.completed;
                log.completed
            }
            None => {
                logs.push(HabitLog::completed(habit_id, date));
                true
            }
        };
        self.log_store.save_logs(&logs).context("saving logs")?;

        let (events, mut awarded) = if completing {
            let calculation =
                calculate_points_for_habit(&habit, date, &state.habits, &logs, &state.progress);
            (
                calculation.events,
                calculation.updated_progress.awarded_streak_milestones,
            )
        } else {
            (Vec::new(), state.progress.awarded_streak_milestones.clone())
        };

        let mut progress =
            recalculate_all_points(&state.habits, &logs, &state.progress).updated_progress;
        for (id, replayed) in std::mem::take(&mut progress.awarded_streak_milestones) {
            awarded.entry(id).or_default().extend(replayed);
        }
        progress.awarded_streak_milestones = awarded;

        self.progress_store
            .save_progress(&progress)
            .context("saving progress")?;
        info!(
            id = habit_id,
            %date,
            completed = completing,
            points = progress.points,
            level = progress.level,
            "toggled habit"
        );
        state.logs = logs;
        state.progress = progress;
        Ok(events)
    }

    /// `order` follows the position in `habit_ids`; habits not listed keep
    /// their relative order after the listed ones.
    pub fn reorder_habits(&self, habit_ids: &[String]) -> Result<()> {
        let mut state = self.state.write();
        let mut habits = state.habits.clone();
        habits.sort_by_key(|habit| habit.order);
        let mut unlisted = habit_ids.len() as i64;
        for habit in &mut habits {
            match habit_ids.iter().position(|id| *id == habit.id) {
                Some(position) => habit.order = position as i64,
                None => {
                    habit.order = unlisted;
                    unlisted += 1;
                }
            }
        }
        let mut progress = state.progress.clone();
        progress.habit_order = habit_ids.to_vec();

        self.habit_store.save_habits(&habits)?;
        self.progress_store.save_progress(&progress)?;
        state.habits = habits;
        state.progress = progress;
        debug!(count = habit_ids.len(), "reordered habits");
        Ok(())
    }

    /// Drops every log. Habits and the character choice stay.
    pub fn clear_score(&self) -> Result<()> {
        self.apply_bulk_mutation("clear score", |_, logs| {
            logs.clear();
            Ok(())
        })?;
        Ok(())
    }

    /// Drops every habit and log. The character choice stays.
    pub fn clear_all(&self) -> Result<()> {
        self.apply_bulk_mutation("clear all", |habits, logs| {
            habits.clear();
            logs.clear();
            Ok(())
        })?;
        Ok(())
    }

    /// Erases all stored data and returns to first-launch state.
    pub fn factory_reset(&self) -> Result<()> {
        let mut state = self.state.write();
        self.log_store.clear_all_habit_data()?;
        *state = TrackerState {
            habits: default_habits(),
            logs: Vec::new(),
            progress: UserProgress::default(),
        };
        info!("factory reset");
        Ok(())
    }

    /// Upsert `incoming` by habit and date. Logs of unknown habits are dropped.
    pub fn import_logs(&self, incoming: Vec<HabitLog>) -> Result<usize> {
        let mut imported = 0;
        self.apply_bulk_mutation("import", |habits, logs| {
            let known: BTreeSet<&str> = habits.iter().map(|h| h.id.as_str()).collect();
            for log in incoming {
                if !known.contains(log.habit_id.as_str()) {
                    warn!(id = %log.habit_id, date = %log.date, "skipping log of unknown habit");
                    continue;
                }
                upsert_log(logs, log);
                imported += 1;
            }
            Ok(())
        })?;
        Ok(imported)
    }

    /// Replace the history with generated logs for every active habit.
    pub fn generate_demo_history<R: Rng + ?Sized>(
        &self,
        days_back: u32,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<usize> {
        let mut generated = 0;
        self.apply_bulk_mutation("demo history", |habits, logs| {
            let active: Vec<String> = habits
                .iter()
                .filter(|habit| !habit.archived)
                .map(|habit| habit.id.clone())
                .collect();
            if active.is_empty() {
                bail!("add at least one habit before generating demo history");
            }
            *logs = generate_historical_logs(&active, days_back, today, rng);
            generated = logs.len();
            Ok(())
        })?;
        Ok(generated)
    }

    pub fn select_character(&self, selection: CharacterSelection) -> Result<()> {
        let mut state = self.state.write();
        if !selection.character.has_variant(&selection.variant) {
            bail!(
                "{} has no variant `{}`",
                selection.character.display_name(),
                selection.variant
            );
        }
        if !is_variant_unlocked(&selection.variant, state.progress.level) {
            bail!(
                "variant `{}` is locked at level {}",
                selection.variant,
                state.progress.level
            );
        }
        let mut progress = state.progress.clone();
        progress.selected_character = selection;
        self.progress_store.save_progress(&progress)?;
        state.progress = progress;
        Ok(())
    }

    /// Replace stored progress with a full replay. Returns replayed minus
    /// stored points.
    pub fn reconcile(&self) -> Result<i64> {
        let mut state = self.state.write();
        let replay = recalculate_all_points(&state.habits, &state.logs, &state.progress);
        let drift = replay.total_points as i64 - state.progress.points as i64;
        if drift != 0 {
            warn!(
                stored = state.progress.points,
                replayed = replay.total_points,
                "progress drifted from log history"
            );
        }
        self.progress_store.save_progress(&replay.updated_progress)?;
        state.progress = replay.updated_progress;
        Ok(drift)
    }

    /// Apply `mutate` to copies of the habits and logs, replay the full
    /// history, then persist all three. Nothing is committed if `mutate` fails.
    #[instrument(skip(self, mutate))]
    pub fn apply_bulk_mutation<F>(&self, label: &str, mutate: F) -> Result<Recalculation>
    where
        F: FnOnce(&mut Vec<Habit>, &mut Vec<HabitLog>) -> Result<()>,
    {
        let mut state = self.state.write();
        let mut habits = state.habits.clone();
        let mut logs = state.logs.clone();
        mutate(&mut habits, &mut logs)?;

        let mut replay = recalculate_all_points(&habits, &logs, &state.progress);
        let known: BTreeSet<&str> = habits.iter().map(|h| h.id.as_str()).collect();
        replay
            .updated_progress
            .habit_order
            .retain(|id| known.contains(id.as_str()));

        self.habit_store
            .save_habits(&habits)
            .context("saving habits")?;
        self.log_store.save_logs(&logs).context("saving logs")?;
        self.progress_store
            .save_progress(&replay.updated_progress)
            .context("saving progress")?;
        info!(
            habits = habits.len(),
            logs = logs.len(),
            points = replay.total_points,
            "applied bulk mutation"
        );

        state.habits = habits;
        state.logs = logs;
        state.progress = replay.updated_progress.clone();
        Ok(replay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::CharacterKind;
    use crate::model::BonusType;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tracker() -> (Arc<MemoryStore>, HabitTracker) {
        let backend = Arc::new(MemoryStore::new());
        let tracker = HabitTracker::builder()
            .with_backend(backend.clone())
            .build()
            .unwrap();
        (backend, tracker)
    }

    fn empty_tracker() -> HabitTracker {
        let (_, tracker) = tracker();
        tracker.clear_all().unwrap();
        tracker
    }

    #[test]
    fn fresh_tracker_has_default_habits() {
        let (_, tracker) = tracker();
        let names: Vec<_> = tracker.habits().into_iter().map(|h| h.name).collect();
        assert_eq!(names, vec!["Daily Exercise", "8h sleep"]);
        assert_eq!(tracker.progress().level, 1);
    }

    #[test]
    fn added_habits_get_unique_ids_and_next_order() {
        let tracker = empty_tracker();
        let first = tracker.add_habit("Read", "#111111").unwrap();
        let second = tracker.add_habit("Walk", "#222222").unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.order, 0);
        assert_eq!(second.order, 1);
    }

    #[test]
    fn unknown_habit_is_an_error() {
        let tracker = empty_tracker();
        assert!(tracker.toggle_habit("nope", day("2024-01-01")).is_err());
        assert!(tracker.update_habit("nope", "x", "#000000").is_err());
        assert!(tracker.delete_habit("nope").is_err());
    }

    #[test]
    fn toggling_twice_restores_points() {
        let tracker = empty_tracker();
        let habit = tracker.add_habit("Read", "#111111").unwrap();
        let date = day("2024-01-01");

        let events = tracker.toggle_habit(&habit.id, date).unwrap();
        assert_eq!(events[0].kind, BonusType::Completion);
        assert_eq!(tracker.progress().points, 10);
        assert!(tracker.is_habit_completed(&habit.id, date));

        assert!(tracker.toggle_habit(&habit.id, date).unwrap().is_empty());
        assert_eq!(tracker.progress().points, 0);
        assert!(!tracker.is_habit_completed(&habit.id, date));
        assert_eq!(tracker.logs().len(), 1);
    }

    #[test]
    fn week_scenario_never_reannounces_milestone() {
        let tracker = empty_tracker();
        let habit = tracker.add_habit("Exercise", "#0667d2").unwrap();
        let start = day("2024-01-01");
        let mut last = Vec::new();
        for offset in 0..7 {
            last = tracker
                .toggle_habit(&habit.id, start + Duration::days(offset))
                .unwrap();
        }
        assert!(last
            .iter()
            .any(|e| e.kind == BonusType::Streak && e.details == "7-day streak on Exercise!"));
        assert_eq!(tracker.progress().points, 305);

        let seventh = day("2024-01-07");
        tracker.toggle_habit(&habit.id, seventh).unwrap();
        assert_eq!(tracker.progress().points, 170);
        let again = tracker.toggle_habit(&habit.id, seventh).unwrap();
        assert!(again.iter().all(|e| e.kind != BonusType::Streak));
        assert_eq!(tracker.progress().points, 305);
        assert_eq!(tracker.reconcile().unwrap(), 0);
    }

    #[test]
    fn regrown_streak_is_paid_without_reannouncing() {
        let tracker = empty_tracker();
        let habit = tracker.add_habit("Read", "#111111").unwrap();
        let start = day("2024-01-01");
        for offset in 0..7 {
            tracker
                .toggle_habit(&habit.id, start + Duration::days(offset))
                .unwrap();
        }
        tracker.toggle_habit(&habit.id, day("2024-01-04")).unwrap();
        for offset in 7..10 {
            tracker
                .toggle_habit(&habit.id, start + Duration::days(offset))
                .unwrap();
        }
        // 10 + 15 + 20 + 30, then 10 + 15 + 20 + 25 + 35 + 35 after the gap
        assert_eq!(tracker.progress().points, 215);

        let events = tracker.toggle_habit(&habit.id, day("2024-01-11")).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].details, "Completed Read (Day 7)");
        assert_eq!(events[0].points, 35);
        assert_eq!(tracker.progress().points, 215 + 35 + 100);
        assert!(tracker.progress().has_awarded_milestone(&habit.id, 7));
        assert_eq!(tracker.reconcile().unwrap(), 0);
    }

    #[test]
    fn archived_habit_ignores_later_days() {
        let tracker = empty_tracker();
        let habit = tracker.add_habit("Read", "#111111").unwrap();
        tracker.archive_habit(&habit.id).unwrap();
        let future = Utc::now().date_naive() + Duration::days(3);
        assert!(tracker.toggle_habit(&habit.id, future).unwrap().is_empty());
        assert!(tracker.logs().is_empty());

        let groups = tracker.grouped_habits();
        assert_eq!(groups.archived.len(), 1);
        tracker.unarchive_habit(&habit.id).unwrap();
        assert_eq!(tracker.grouped_habits().active.len(), 1);
        assert!(tracker.habits()[0].archived_at.is_none());
    }

    #[test]
    fn delete_cascades_and_rescores() {
        let tracker = empty_tracker();
        let keep = tracker.add_habit("Read", "#111111").unwrap();
        let drop = tracker.add_habit("Walk", "#222222").unwrap();
        let date = day("2024-02-01");
        tracker.toggle_habit(&keep.id, date).unwrap();
        tracker.toggle_habit(&drop.id, date).unwrap();
        // Replay scores both completions against the full day, so each one
        // collects base 10 plus the 2x daily combo of 10.
        assert_eq!(tracker.progress().points, 40);

        tracker.delete_habit(&drop.id).unwrap();
        assert_eq!(tracker.progress().points, 10);
        assert!(tracker.logs().iter().all(|log| log.habit_id == keep.id));
    }

    #[test]
    fn reorder_assigns_positions() {
        let tracker = empty_tracker();
        let a = tracker.add_habit("A", "#111111").unwrap();
        let b = tracker.add_habit("B", "#222222").unwrap();
        let c = tracker.add_habit("C", "#333333").unwrap();
        tracker
            .reorder_habits(&[c.id.clone(), a.id.clone()])
            .unwrap();
        let active: Vec<_> = tracker
            .grouped_habits()
            .active
            .into_iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(active, vec![c.id.clone(), a.id.clone(), b.id]);
        assert_eq!(tracker.progress().habit_order, vec![c.id, a.id]);
    }

    #[test]
    fn import_upserts_and_skips_unknown() {
        let tracker = empty_tracker();
        let habit = tracker.add_habit("Read", "#111111").unwrap();
        let date = day("2024-03-01");
        tracker.toggle_habit(&habit.id, date).unwrap();

        let imported = tracker
            .import_logs(vec![
                HabitLog::completed(habit.id.as_str(), date),
                HabitLog::completed(habit.id.as_str(), date + Duration::days(1)),
                HabitLog::completed("ghost", date),
            ])
            .unwrap();
        assert_eq!(imported, 2);
        assert_eq!(tracker.logs().len(), 2);
        assert_eq!(tracker.progress().points, 25);
    }

    #[test]
    fn clear_score_keeps_habits_and_character() {
        let tracker = empty_tracker();
        let habit = tracker.add_habit("Read", "#111111").unwrap();
        tracker.toggle_habit(&habit.id, day("2024-01-01")).unwrap();
        tracker
            .select_character(CharacterSelection {
                character: CharacterKind::CartoonPenguin,
                variant: "Character01".into(),
            })
            .unwrap();

        tracker.clear_score().unwrap();
        assert_eq!(tracker.progress().points, 0);
        assert!(tracker.logs().is_empty());
        assert_eq!(tracker.habits().len(), 1);
        assert_eq!(
            tracker.progress().selected_character.character,
            CharacterKind::CartoonPenguin
        );
    }

    #[test]
    fn locked_variant_is_rejected() {
        let tracker = empty_tracker();
        let locked = CharacterSelection {
            character: CharacterKind::CuteCat,
            variant: "Character03".into(),
        };
        assert!(tracker.select_character(locked).is_err());
        let missing = CharacterSelection {
            character: CharacterKind::CartoonPenguin,
            variant: "Character02".into(),
        };
        assert!(tracker.select_character(missing).is_err());
    }

    #[test]
    fn failed_mutation_commits_nothing() {
        let tracker = empty_tracker();
        tracker.add_habit("Read", "#111111").unwrap();
        let result = tracker.apply_bulk_mutation("failing", |habits, _| {
            habits.clear();
            bail!("boom")
        });
        assert!(result.is_err());
        assert_eq!(tracker.habits().len(), 1);
    }

    #[test]
    fn demo_history_needs_an_active_habit() {
        let tracker = empty_tracker();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(tracker
            .generate_demo_history(30, day("2024-01-31"), &mut rng)
            .is_err());

        tracker.add_habit("Read", "#111111").unwrap();
        let count = tracker
            .generate_demo_history(30, day("2024-01-31"), &mut rng)
            .unwrap();
        assert_eq!(tracker.logs().len(), count);
        assert!(count > 0);
        assert_eq!(tracker.reconcile().unwrap(), 0);
    }

    #[test]
    fn reconcile_repairs_drift() {
        let (backend, tracker) = tracker();
        tracker.clear_all().unwrap();
        let habit = tracker.add_habit("Read", "#111111").unwrap();
        tracker.toggle_habit(&habit.id, day("2024-01-01")).unwrap();
        backend
            .set("user-progress", r#"{"points":5000,"level":7}"#)
            .unwrap();

        let reopened = HabitTracker::builder()
            .with_backend(backend)
            .build()
            .unwrap();
        assert_eq!(reopened.reconcile().unwrap(), 10 - 5000);
        assert_eq!(reopened.progress().points, 10);
        assert_eq!(reopened.progress().level, 1);
    }

    #[test]
    fn factory_reset_returns_to_defaults() {
        let (backend, tracker) = tracker();
        let habit = tracker.add_habit("Read", "#111111").unwrap();
        tracker.toggle_habit(&habit.id, day("2024-01-01")).unwrap();
        tracker.factory_reset().unwrap();
        assert!(backend.is_empty());
        assert_eq!(tracker.habits().len(), 2);
        assert_eq!(tracker.progress(), UserProgress::default());
    }
}
