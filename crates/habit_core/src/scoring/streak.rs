use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::HabitLog;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StreakInfo {
    pub current: u32,
    pub best: u32,
}

fn completed_dates(habit_id: &str, logs: &[HabitLog]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = logs
        .iter()
        .filter(|log| log.habit_id == habit_id && log.completed)
        .map(|log| log.date)
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Consecutive completed days for `habit_id` ending at or before `reference_date`.
///
/// Logs dated after the reference are ignored, so the streak is always "as of"
/// that day. Without a reference date there is no streak.
pub fn calculate_streak(
    habit_id: &str,
    logs: &[HabitLog],
    reference_date: Option<NaiveDate>,
) -> u32 {
    let Some(reference) = reference_date else {
        return 0;
    };

    let mut streak = 0;
    let mut cursor = reference;
    for date in completed_dates(habit_id, logs).into_iter().rev() {
        if date > reference {
            continue;
        }
        if (cursor - date).num_days() > 1 {
            break;
        }
        streak += 1;
        cursor = date;
    }
    streak
}

/// Longest run of consecutive completed days anywhere in the history.
pub fn calculate_best_streak(habit_id: &str, logs: &[HabitLog]) -> u32 {
    let dates = completed_dates(habit_id, logs);
    let mut best = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;
    for date in dates {
        current = match previous {
            Some(prev) if (date - prev).num_days() == 1 => current + 1,
            _ => 1,
        };
        best = best.max(current);
        previous = Some(date);
    }
    best
}

pub fn streak_info(habit_id: &str, logs: &[HabitLog], today: NaiveDate) -> StreakInfo {
    let current = calculate_streak(habit_id, logs, Some(today));
    StreakInfo {
        current,
        best: calculate_best_streak(habit_id, logs).max(current),
    }
}
