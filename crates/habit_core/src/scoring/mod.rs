//! Pure scoring pipeline: streaks, base points, milestones, combos and levels.

pub mod base_points;
pub mod combo;
pub mod config;
pub mod engine;
pub mod level;
pub mod milestones;
pub mod monthly;
pub mod streak;

pub use base_points::base_points_for_streak;
pub use engine::{
    calculate_points_for_habit, recalculate_all_points, PointCalculation, Recalculation,
};
pub use level::{
    calculate_level, level_info, level_title, next_level_threshold, previous_level_threshold,
    LevelInfo,
};
pub use milestones::streak_milestone_bonus;
pub use monthly::is_month_completed;
pub use streak::{calculate_best_streak, calculate_streak, streak_info, StreakInfo};
