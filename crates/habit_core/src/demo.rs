//! Synthetic completion history for trying the tracker out.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::model::HabitLog;

const BASE_SKIP_PROBABILITY: f64 = 0.1;

/// Chance of missing a day grows with the streak being defended.
fn skip_probability(streak: u32, current: f64) -> f64 {
    match streak {
        0..=30 => current,
        31..=100 => 0.15,
        101..=365 => 0.2,
        _ => 0.25,
    }
}

/// Completed logs for every day in `today - days_back ..= today`, with random
/// gaps. Sorted by date.
pub fn generate_historical_logs<R: Rng + ?Sized>(
    habit_ids: &[String],
    days_back: u32,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<HabitLog> {
    let start = today - Duration::days(i64::from(days_back));
    let mut logs = Vec::new();

    for habit_id in habit_ids {
        let mut streak = 0u32;
        let mut skip = BASE_SKIP_PROBABILITY;
        for date in start.iter_days().take_while(|date| *date <= today) {
            skip = skip_probability(streak, skip);
            if rng.random::<f64>() > skip {
                logs.push(HabitLog::completed(habit_id.as_str(), date));
                streak += 1;
            } else {
                streak = 0;
                skip = BASE_SKIP_PROBABILITY;
            }
        }
    }

    logs.sort_by_key(|log| log.date);
    logs
}
