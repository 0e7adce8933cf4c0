use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::base_points::base_points_for_streak;
use super::combo::{daily_combo, milestone_combo, Achievement, AchievementKind};
use super::config::MONTHLY_COMPLETION_BONUS;
use super::milestones::streak_milestone_bonus;
use super::monthly::is_month_completed;
use super::streak::calculate_streak;
use crate::model::{BonusType, Habit, HabitLog, ScoreEvent, UserProgress};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PointCalculation {
    pub points: u64,
    pub events: Vec<ScoreEvent>,
    pub updated_progress: UserProgress,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recalculation {
    pub total_points: u64,
    pub updated_progress: UserProgress,
}

/// Score one completion of `habit` on `date`.
///
/// Logs dated after `date` are ignored. The returned progress carries the new
/// milestone awards and the added points (with the level re-derived).
pub fn calculate_points_for_habit(
    habit: &Habit,
    date: NaiveDate,
    habits: &[Habit],
    logs: &[HabitLog],
    progress: &UserProgress,
) -> PointCalculation {
    let history: Vec<HabitLog> = logs.iter().filter(|log| log.date <= date).cloned().collect();
    let mut updated_progress = progress.clone();
    let (points, events) = score_completion(habit, date, habits, &history, &mut updated_progress);
    PointCalculation {
        points,
        events,
        updated_progress,
    }
}

/// `history` must not contain logs dated after `date`.
fn score_completion(
    habit: &Habit,
    date: NaiveDate,
    habits: &[Habit],
    history: &[HabitLog],
    progress: &mut UserProgress,
) -> (u64, Vec<ScoreEvent>) {
    let mut events = Vec::new();
    let mut achievements: Vec<Achievement> = Vec::new();

    let streak = calculate_streak(&habit.id, history, Some(date));
    let base = base_points_for_streak(streak);
    let mut total = base;
    events.push(ScoreEvent::new(
        BonusType::Completion,
        base,
        format!("Completed {} (Day {streak})", habit.name),
        date,
    ));

    let milestone_bonus = streak_milestone_bonus(streak);
    if milestone_bonus > 0 && progress.mark_milestone_awarded(&habit.id, streak) {
        total += milestone_bonus;
        events.push(ScoreEvent::new(
            BonusType::Streak,
            milestone_bonus,
            format!("{streak}-day streak on {}!", habit.name),
            date,
        ));
        achievements.push(Achievement {
            kind: AchievementKind::Streak,
            value: streak,
            points: milestone_bonus,
        });
    }

    if is_month_completed(&habit.id, date, history) {
        total += MONTHLY_COMPLETION_BONUS;
        events.push(ScoreEvent::new(
            BonusType::Streak,
            MONTHLY_COMPLETION_BONUS,
            format!("Full month completion for {}!", habit.name),
            date,
        ));
        achievements.push(Achievement {
            kind: AchievementKind::Monthly,
            value: 1,
            points: MONTHLY_COMPLETION_BONUS,
        });
    }

    let combo = daily_combo(habits, history, date);
    if combo.points > 0 {
        total += combo.points;
        events.push(ScoreEvent::new(
            BonusType::Multicombo,
            combo.points,
            format!("{}x daily combo!", combo.completed_habits),
            date,
        ));
        achievements.push(Achievement {
            kind: AchievementKind::Multi,
            value: combo.completed_habits,
            points: combo.points,
        });
    }

    if achievements.len() >= 2 {
        let epic = milestone_combo(&achievements);
        if epic.points > 0 {
            total += epic.points;
            events.push(ScoreEvent::new(BonusType::Multicombo, epic.points, epic.details, date));
        }
    }

    progress.add_points(total);
    debug!(habit = %habit.id, %date, streak, points = total, "scored completion");
    (total, events)
}

/// Replay the whole history in date order and rebuild progress from scratch.
///
/// Milestone awards are reset first, so the result depends only on `habits`
/// and `logs`. Logs of unknown habits are skipped.
pub fn recalculate_all_points(
    habits: &[Habit],
    logs: &[HabitLog],
    progress: &UserProgress,
) -> Recalculation {
    let mut updated_progress = progress.reset_scoring();
    for habit in habits {
        updated_progress
            .awarded_streak_milestones
            .insert(habit.id.clone(), Default::default());
    }

    let by_id: HashMap<&str, &Habit> = habits.iter().map(|h| (h.id.as_str(), h)).collect();
    let mut sorted = logs.to_vec();
    sorted.sort_by_key(|log| log.date);

    let mut start = 0;
    while start < sorted.len() {
        let date = sorted[start].date;
        let end = start + sorted[start..].partition_point(|log| log.date == date);
        let history = &sorted[..end];
        for log in sorted[start..end].iter().filter(|log| log.completed) {
            if let Some(habit) = by_id.get(log.habit_id.as_str()) {
                score_completion(habit, date, habits, history, &mut updated_progress);
            }
        }
        start = end;
    }

    let total_points = updated_progress.points;
    debug!(total_points, logs = logs.len(), "recalculated all points");
    Recalculation {
        total_points,
        updated_progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn exercise() -> Habit {
        Habit::new("exercise", "Exercise", "#0667d2")
    }

    fn week(habit: &str) -> Vec<HabitLog> {
        let start = day("2024-01-01");
        (0..7)
            .map(|offset| HabitLog::completed(habit, start + Duration::days(offset)))
            .collect()
    }

    #[test]
    fn first_completion_scores_base_points() {
        let habit = exercise();
        let logs = vec![HabitLog::completed("exercise", day("2024-01-01"))];
        let result = calculate_points_for_habit(
            &habit,
            day("2024-01-01"),
            &[habit.clone()],
            &logs,
            &UserProgress::default(),
        );
        assert_eq!(result.points, 10);
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].kind, BonusType::Completion);
        assert_eq!(result.events[0].details, "Completed Exercise (Day 1)");
        assert_eq!(result.updated_progress.points, 10);
    }

    #[test]
    fn seventh_day_pays_milestone_once() {
        let habit = exercise();
        let habits = vec![habit.clone()];
        let logs = week("exercise");
        let date = day("2024-01-07");

        let first =
            calculate_points_for_habit(&habit, date, &habits, &logs, &UserProgress::default());
        assert_eq!(first.points, 35 + 100);
        assert!(first
            .events
            .iter()
            .any(|e| e.kind == BonusType::Streak && e.details == "7-day streak on Exercise!"));
        assert!(first.updated_progress.has_awarded_milestone("exercise", 7));

        let again =
            calculate_points_for_habit(&habit, date, &habits, &logs, &first.updated_progress);
        assert_eq!(again.points, 35);
        assert!(again.events.iter().all(|e| e.kind != BonusType::Streak));
    }

    #[test]
    fn future_logs_do_not_leak_into_past_scores() {
        let habit = exercise();
        let logs = week("exercise");
        let result = calculate_points_for_habit(
            &habit,
            day("2024-01-02"),
            &[habit.clone()],
            &logs,
            &UserProgress::default(),
        );
        assert_eq!(result.points, 15);
    }

    #[test]
    fn daily_combo_is_reported() {
        let a = Habit::new("a", "Read", "#111111");
        let b = Habit::new("b", "Walk", "#222222");
        let date = day("2024-05-01");
        let logs = vec![HabitLog::completed("a", date), HabitLog::completed("b", date)];
        let result =
            calculate_points_for_habit(&b, date, &[a, b.clone()], &logs, &UserProgress::default());
        let combo: Vec<_> = result
            .events
            .iter()
            .filter(|e| e.kind == BonusType::Multicombo)
            .collect();
        assert_eq!(combo.len(), 1);
        assert_eq!(combo[0].details, "2x daily combo!");
        assert_eq!(result.points, 10 + 10);
    }

    #[test]
    fn monthly_completion_alone_has_no_combo() {
        let habit = Habit::new("h", "Stretch", "#333333");
        let start = day("2024-02-01");
        let logs: Vec<HabitLog> = (0..29)
            .map(|offset| HabitLog::completed("h", start + Duration::days(offset)))
            .collect();
        // Day 29 of February 2024: streak 29 (no milestone) but the month is complete.
        let result = calculate_points_for_habit(
            &habit,
            day("2024-02-29"),
            &[habit.clone()],
            &logs,
            &UserProgress::default(),
        );
        assert_eq!(result.points, 35 + MONTHLY_COMPLETION_BONUS);
        assert!(result
            .events
            .iter()
            .any(|e| e.details == "Full month completion for Stretch!"));
        assert!(result.events.iter().all(|e| !e.details.starts_with("Epic combo")));
    }

    #[test]
    fn thirtieth_of_april_fires_epic_combo() {
        let habit = Habit::new("h", "Stretch", "#333333");
        let start = day("2024-04-01");
        let logs: Vec<HabitLog> = (0..30)
            .map(|offset| HabitLog::completed("h", start + Duration::days(offset)))
            .collect();
        let result = calculate_points_for_habit(
            &habit,
            day("2024-04-30"),
            &[habit.clone()],
            &logs,
            &UserProgress::default(),
        );
        let events: Vec<_> = result
            .events
            .iter()
            .map(|e| (e.kind, e.points, e.details.as_str()))
            .collect();
        assert_eq!(
            events,
            vec![
                (BonusType::Completion, 50, "Completed Stretch (Day 30)"),
                (BonusType::Streak, 500, "30-day streak on Stretch!"),
                (BonusType::Streak, 500, "Full month completion for Stretch!"),
                (
                    BonusType::Multicombo,
                    1910,
                    "Epic combo: 30-day streak + monthly completion (1.4x)"
                ),
            ]
        );
        assert_eq!(result.points, 2960);
        assert_eq!(result.updated_progress.points, 2960);
    }

    #[test]
    fn milestone_with_daily_combo_fires_epic_combo() {
        let a = Habit::new("a", "Read", "#111111");
        let b = Habit::new("b", "Walk", "#222222");
        let date = day("2024-01-03");
        let mut logs: Vec<HabitLog> = (0..3)
            .map(|offset| HabitLog::completed("a", day("2024-01-01") + Duration::days(offset)))
            .collect();
        logs.push(HabitLog::completed("b", date));

        let result =
            calculate_points_for_habit(&a, date, &[a.clone(), b], &logs, &UserProgress::default());
        // Read on day 3 (20 base, 30 milestone) and Walk on day 1 (10 base) make a 15 combo
        let expected_epic = milestone_combo(&[
            Achievement {
                kind: AchievementKind::Streak,
                value: 3,
                points: 30,
            },
            Achievement {
                kind: AchievementKind::Multi,
                value: 2,
                points: 15,
            },
        ]);
        assert_eq!(expected_epic.points, 56);

        let last = result.events.last().unwrap();
        assert_eq!(last.kind, BonusType::Multicombo);
        assert_eq!(last.details, "Epic combo: 3-day streak + 2x combo (1.2x)");
        assert_eq!(last.points, expected_epic.points);
        assert_eq!(result.events.len(), 4);
        assert_eq!(result.points, 20 + 30 + 15 + 56);
        assert_eq!(result.points, result.events.iter().map(|e| e.points).sum::<u64>());
    }

    #[test]
    fn recalculation_matches_sequential_scoring() {
        let habit = exercise();
        let habits = vec![habit.clone()];
        let logs = week("exercise");

        let mut progress = UserProgress::default();
        for log in &logs {
            progress = calculate_points_for_habit(&habit, log.date, &habits, &logs, &progress)
                .updated_progress;
        }

        let replay = recalculate_all_points(&habits, &logs, &UserProgress::default());
        assert_eq!(replay.total_points, progress.points);
        // 10+15+20+25+35+35+35 base, 30 (day 3) + 100 (day 7) milestones
        assert_eq!(replay.total_points, 175 + 130);
        assert_eq!(replay.updated_progress.level, progress.level);
    }

    #[test]
    fn recalculation_ignores_prior_awards() {
        let habit = exercise();
        let habits = vec![habit.clone()];
        let logs = week("exercise");
        let mut stale = UserProgress::default();
        stale.mark_milestone_awarded("exercise", 3);
        stale.mark_milestone_awarded("exercise", 7);
        stale.set_points(99_999);

        let fresh = recalculate_all_points(&habits, &logs, &UserProgress::default());
        let from_stale = recalculate_all_points(&habits, &logs, &stale);
        assert_eq!(fresh.total_points, from_stale.total_points);
        assert_eq!(
            fresh.updated_progress.awarded_streak_milestones,
            from_stale.updated_progress.awarded_streak_milestones
        );
    }

    #[test]
    fn recalculation_skips_unknown_and_incomplete_logs() {
        let habit = exercise();
        let logs = vec![
            HabitLog::completed("exercise", day("2024-01-01")),
            HabitLog::completed("deleted", day("2024-01-01")),
            HabitLog {
                habit_id: "exercise".into(),
                date: day("2024-01-02"),
                completed: false,
            },
        ];
        let replay = recalculate_all_points(&[habit], &logs, &UserProgress::default());
        assert_eq!(replay.total_points, 10);
    }
}
