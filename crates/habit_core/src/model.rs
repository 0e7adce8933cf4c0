use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::characters::CharacterSelection;
use crate::scoring::level::calculate_level;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HabitFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub frequency: HabitFrequency,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
    pub order: i64,
}

impl Habit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            created_at: Utc::now(),
            frequency: HabitFrequency::Daily,
            archived: false,
            archived_at: None,
            order: 0,
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// An archived habit keeps its history but stops accepting completions
    /// for days after the archive date.
    pub fn accepts_completion_on(&self, date: NaiveDate) -> bool {
        match (self.archived, self.archived_at) {
            (true, Some(archived_at)) => date <= archived_at.date_naive(),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    pub habit_id: String,
    pub date: NaiveDate,
    pub completed: bool,
}

impl HabitLog {
    pub fn completed(habit_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            habit_id: habit_id.into(),
            date,
            completed: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub points: u64,
    pub level: u32,
    /// Superseded by on-the-fly streak computation; kept so older payloads load.
    #[serde(default)]
    pub streaks: BTreeMap<String, u32>,
    #[serde(default)]
    pub last_completed_dates: BTreeMap<String, NaiveDate>,
    #[serde(default)]
    pub awarded_streak_milestones: BTreeMap<String, BTreeSet<u32>>,
    #[serde(default)]
    pub selected_character: CharacterSelection,
    #[serde(default)]
    pub habit_order: Vec<String>,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            points: 0,
            level: 1,
            streaks: BTreeMap::new(),
            last_completed_dates: BTreeMap::new(),
            awarded_streak_milestones: BTreeMap::new(),
            selected_character: CharacterSelection::default(),
            habit_order: Vec::new(),
        }
    }
}

impl UserProgress {
    pub fn set_points(&mut self, points: u64) {
        self.points = points;
        self.level = calculate_level(points);
    }

    pub fn add_points(&mut self, points: u64) {
        self.set_points(self.points.saturating_add(points));
    }

    pub fn has_awarded_milestone(&self, habit_id: &str, streak: u32) -> bool {
        self.awarded_streak_milestones
            .get(habit_id)
            .is_some_and(|awarded| awarded.contains(&streak))
    }

    /// Returns `false` when the milestone had already been recorded.
    pub fn mark_milestone_awarded(&mut self, habit_id: &str, streak: u32) -> bool {
        self.awarded_streak_milestones
            .entry(habit_id.to_string())
            .or_default()
            .insert(streak)
    }

    /// Scoring state is wiped; the character choice and ordering survive.
    pub fn reset_scoring(&self) -> Self {
        Self {
            selected_character: self.selected_character.clone(),
            habit_order: self.habit_order.clone(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BonusType {
    Completion,
    Streak,
    Multicombo,
    FirstHabit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEvent {
    #[serde(rename = "type")]
    pub kind: BonusType,
    pub points: u64,
    pub details: String,
    pub timestamp: i64,
}

impl ScoreEvent {
    pub fn new(kind: BonusType, points: u64, details: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            kind,
            points,
            details: details.into(),
            timestamp: date_timestamp_millis(date),
        }
    }
}

/// Milliseconds since the Unix epoch for UTC midnight of `date`.
pub fn date_timestamp_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitGroups {
    pub active: Vec<Habit>,
    pub archived: Vec<Habit>,
}

/// Sort by display order and split archived habits from active ones.
pub fn sort_and_group_habits(habits: &[Habit]) -> HabitGroups {
    let mut sorted = habits.to_vec();
    sorted.sort_by_key(|habit| habit.order);
    let (archived, active) = sorted.into_iter().partition(|habit| habit.archived);
    HabitGroups { active, archived }
}

pub fn is_habit_completed(habit_id: &str, date: NaiveDate, logs: &[HabitLog]) -> bool {
    logs.iter()
        .any(|log| log.habit_id == habit_id && log.date == date && log.completed)
}

pub fn completed_habits(date: NaiveDate, logs: &[HabitLog]) -> Vec<String> {
    logs.iter()
        .filter(|log| log.date == date && log.completed)
        .map(|log| log.habit_id.clone())
        .collect()
}
