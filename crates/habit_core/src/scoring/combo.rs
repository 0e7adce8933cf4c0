use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::base_points::base_points_for_streak;
use super::config::{
    COMBO_HIGH_MULTI_BONUS, COMBO_HIGH_MULTI_COUNT, COMBO_LONG_STREAK_BONUS,
    COMBO_LONG_STREAK_DAYS, COMBO_MONTHLY_BONUS, COMBO_PER_EXTRA_ACHIEVEMENT,
    COMBO_STREAK_WEIGHT_BASE, COMBO_STREAK_WEIGHT_CAP, DAILY_COMBO_STREAK_FACTOR,
};
use super::streak::calculate_streak;
use crate::model::{Habit, HabitLog};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AchievementKind {
    Streak,
    Monthly,
    Multi,
}

/// Something that happened during one scoring event and can feed a milestone combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub kind: AchievementKind,
    /// Streak length, month count or number of habits in the combo.
    pub value: u32,
    pub points: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComboResult {
    pub points: u64,
    pub multiplier: f64,
    pub details: String,
}

impl ComboResult {
    fn none() -> Self {
        Self {
            points: 0,
            multiplier: 1.0,
            details: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCombo {
    pub completed_habits: u32,
    pub points: u64,
}

/// Bonus for completing several habits on `date`.
///
/// Average base points of the day's completions, scaled up by 1% per day of
/// average streak. Fewer than two completions pay nothing.
pub fn daily_combo(habits: &[Habit], logs: &[HabitLog], date: NaiveDate) -> DailyCombo {
    let known: HashSet<&str> = habits.iter().map(|habit| habit.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let streaks: Vec<u32> = logs
        .iter()
        .filter(|log| log.date == date && log.completed)
        .filter(|log| known.contains(log.habit_id.as_str()))
        .filter(|log| seen.insert(log.habit_id.as_str()))
        .map(|log| calculate_streak(&log.habit_id, logs, Some(date)))
        .collect();

    let count = streaks.len() as u32;
    if count < 2 {
        return DailyCombo {
            completed_habits: count,
            points: 0,
        };
    }

    let total_base: u64 = streaks.iter().map(|s| base_points_for_streak(*s)).sum();
    let avg_base = total_base as f64 / f64::from(count);
    let avg_streak = streaks.iter().map(|s| f64::from(*s)).sum::<f64>() / f64::from(count);
    let points = (avg_base * (1.0 + avg_streak * DAILY_COMBO_STREAK_FACTOR)).round() as u64;
    DailyCombo {
        completed_habits: count,
        points,
    }
}

pub fn daily_combo_bonus(habits: &[Habit], logs: &[HabitLog], date: NaiveDate) -> u64 {
    daily_combo(habits, logs, date).points
}

/// Capped exponential weight for streak achievements: `1.2^min(streak / 10, 10)`.
pub fn streak_weight(streak: u32) -> f64 {
    let exponent = (f64::from(streak) / 10.0).min(COMBO_STREAK_WEIGHT_CAP);
    COMBO_STREAK_WEIGHT_BASE.powf(exponent)
}

pub fn combo_multiplier(achievements: &[Achievement]) -> f64 {
    if achievements.is_empty() {
        return 1.0;
    }
    let mut multiplier = 1.0 + (achievements.len() - 1) as f64 * COMBO_PER_EXTRA_ACHIEVEMENT;
    if achievements
        .iter()
        .any(|a| a.kind == AchievementKind::Streak && a.value >= COMBO_LONG_STREAK_DAYS)
    {
        multiplier += COMBO_LONG_STREAK_BONUS;
    }
    if achievements.iter().any(|a| a.kind == AchievementKind::Monthly) {
        multiplier += COMBO_MONTHLY_BONUS;
    }
    if achievements
        .iter()
        .any(|a| a.kind == AchievementKind::Multi && a.value >= COMBO_HIGH_MULTI_COUNT)
    {
        multiplier += COMBO_HIGH_MULTI_BONUS;
    }
    multiplier
}

fn combo_details(achievements: &[Achievement], multiplier: f64) -> String {
    let max_of = |kind: AchievementKind| {
        achievements
            .iter()
            .filter(|a| a.kind == kind)
            .map(|a| a.value)
            .max()
    };

    let mut parts = Vec::new();
    if let Some(streak) = max_of(AchievementKind::Streak) {
        parts.push(format!("{streak}-day streak"));
    }
    if max_of(AchievementKind::Monthly).is_some() {
        parts.push("monthly completion".to_string());
    }
    if let Some(count) = max_of(AchievementKind::Multi) {
        parts.push(format!("{count}x combo"));
    }
    format!("Epic combo: {} ({multiplier:.1}x)", parts.join(" + "))
}

/// Bonus for several achievements landing on the same scoring event.
pub fn milestone_combo(achievements: &[Achievement]) -> ComboResult {
    if achievements.len() < 2 {
        return ComboResult::none();
    }

    let weighted: f64 = achievements
        .iter()
        .map(|a| match a.kind {
            AchievementKind::Streak => a.points as f64 * streak_weight(a.value),
            AchievementKind::Monthly | AchievementKind::Multi => a.points as f64,
        })
        .sum();
    let multiplier = combo_multiplier(achievements);

    ComboResult {
        points: (weighted * multiplier).round() as u64,
        multiplier,
        details: combo_details(achievements, multiplier),
    }
}
