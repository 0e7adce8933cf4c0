use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::model::HabitLog;

pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month.and_then(|d| d.pred_opt()).unwrap_or(first);
    (first, last)
}

/// True only when every day of the month containing `date` has a completed log.
///
/// Days later in the month are part of the check, so a month cannot pass
/// before its last day is completed.
pub fn is_month_completed(habit_id: &str, date: NaiveDate, logs: &[HabitLog]) -> bool {
    let (first, last) = month_bounds(date);
    let done: HashSet<NaiveDate> = logs
        .iter()
        .filter(|log| log.habit_id == habit_id && log.completed)
        .filter(|log| log.date >= first && log.date <= last)
        .map(|log| log.date)
        .collect();
    first.iter_days().take_while(|day| *day <= last).all(|day| done.contains(&day))
}
