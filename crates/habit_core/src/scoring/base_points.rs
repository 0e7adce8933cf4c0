use super::config::{
    EARLY_BASE_POINTS, EARLY_STEP_POINTS, EARLY_STREAK_DAYS, LEGENDARY_BASE_POINTS, STREAK_BANDS,
};

/// Points for a single completion given the streak it extends.
///
/// The first four days ramp up (10, 15, 20, 25); after that the value is banded.
pub fn base_points_for_streak(streak: u32) -> u64 {
    if streak <= EARLY_STREAK_DAYS {
        let day = u64::from(streak.max(1));
        return EARLY_BASE_POINTS + (day - 1) * EARLY_STEP_POINTS;
    }
    STREAK_BANDS
        .iter()
        .find(|(upper, _)| streak <= *upper)
        .map(|(_, points)| *points)
        .unwrap_or(LEGENDARY_BASE_POINTS)
}
