//! Game balance tables. Pure data; the lookups live in the sibling modules.

use once_cell::sync::Lazy;

/// Base points for streak lengths inside each band.
pub const STREAK_BANDS: &[(u32, u64)] = &[(29, 35), (99, 50), (199, 75), (364, 100)];
pub const EARLY_STREAK_DAYS: u32 = 4;
pub const EARLY_BASE_POINTS: u64 = 10;
pub const EARLY_STEP_POINTS: u64 = 5;
pub const LEGENDARY_BASE_POINTS: u64 = 150;

pub const MONTHLY_COMPLETION_BONUS: u64 = 500;

/// Streak length → one-time bonus, ascending by streak length.
pub const STREAK_MILESTONES: &[(u32, u64)] = &[
    (3, 30),
    (7, 100),
    (14, 250),
    (21, 400),
    (30, 500),
    (50, 600),
    (75, 1000),
    (90, 1200),
    (100, 1500),
    (111, 2000),
    (150, 2500),
    (180, 3000),
    (200, 3500),
    (222, 4000),
    (250, 4500),
    (300, 5000),
    (333, 6000),
    (350, 7000),
    (365, 10000),
    (400, 12000),
    (500, 15000),
    (600, 20000),
    (730, 30000),
    (1000, 50000),
];

/// Flat daily-combo table from before the weighted formula. Not used for scoring.
pub const LEGACY_MULTI_HABIT_BONUS: &[(usize, u64)] =
    &[(2, 10), (3, 15), (4, 25), (5, 50), (10, 100)];

pub const DAILY_COMBO_STREAK_FACTOR: f64 = 0.01;

pub const COMBO_STREAK_WEIGHT_BASE: f64 = 1.2;
pub const COMBO_STREAK_WEIGHT_CAP: f64 = 10.0;
pub const COMBO_PER_EXTRA_ACHIEVEMENT: f64 = 0.2;
pub const COMBO_LONG_STREAK_DAYS: u32 = 100;
pub const COMBO_LONG_STREAK_BONUS: f64 = 0.3;
pub const COMBO_MONTHLY_BONUS: f64 = 0.2;
pub const COMBO_HIGH_MULTI_COUNT: u32 = 5;
pub const COMBO_HIGH_MULTI_BONUS: f64 = 0.2;

const FIXED_LEVEL_THRESHOLDS: [u64; 15] = [
    20, 100, 250, 500, 1000, 1800, 3000, 4500, 6500, 9000, 12000, 15500, 19500, 24000, 29000,
];
const GENERATED_LEVELS: usize = 85;

/// Cumulative point boundaries; `LEVEL_THRESHOLDS[i]` closes level `i + 1`.
pub static LEVEL_THRESHOLDS: Lazy<Vec<u64>> = Lazy::new(|| {
    let mut thresholds = FIXED_LEVEL_THRESHOLDS.to_vec();
    for _ in 0..GENERATED_LEVELS {
        let level = thresholds.len() + 1;
        let growth = match level {
            0..=30 => 1.15,
            31..=50 => 1.12,
            _ => 1.10,
        };
        let previous = thresholds[thresholds.len() - 1];
        thresholds.push((previous as f64 * growth).floor() as u64);
    }
    thresholds
});

pub const LEVEL_TITLES: [&str; 101] = [
    "Habit Novice",
    "Routine Starter",
    "Discipline Seeker",
    "Pattern Builder",
    "Consistency Keeper",
    "Habit Explorer",
    "Progress Tracker",
    "Dedication Finder",
    "Rhythm Master",
    "Foundation Champion",
    "Discipline Sculptor",
    "Rhythm Builder",
    "Milestone Maker",
    "Focus Engineer",
    "Goal Tracker",
    "Dedication Strategist",
    "Persistence Pilot",
    "Momentum Keeper",
    "Milestone Chaser",
    "Effort Sustainer",
    "Momentum Maverick",
    "Focus Virtuoso",
    "Dedication Conqueror",
    "Routine Alchemist",
    "Resilience Sculptor",
    "Master Planner",
    "Streak Weaver",
    "Goal Guardian",
    "Perseverance Artisan",
    "Milestone Visionary",
    "Rhythm Commander",
    "Habitologist",
    "Progress Tactician",
    "Consistency Commander",
    "Milestone Strategist",
    "Discipline Innovator",
    "Determination Pilot",
    "Pace Setter",
    "Goal Sculptor",
    "Effort Strategist",
    "Consistency Architect",
    "Resilience Vanguard",
    "Perseverance Guardian",
    "Dedication Tactician",
    "Momentum Strategist",
    "Progress Architect",
    "Growth Strategist",
    "Goal Visionary",
    "Rhythm Champion",
    "Streak Maestro",
    "Habit Titan",
    "Momentum Virtuoso",
    "Consistency Luminary",
    "Dedication Conqueror",
    "Persistence Luminary",
    "Growth Sentinel",
    "Streak Innovator",
    "Rhythm Vanguard",
    "Goal Virtuoso",
    "Focus Luminary",
    "Progress Guardian",
    "Momentum Alchemist",
    "Consistency Innovator",
    "Perseverance Vanguard",
    "Dedication Visionary",
    "Persistence Champion",
    "Resilience Titan",
    "Habit Commander",
    "Goal Maverick",
    "Focus Sentinel",
    "Rhythm Pioneer",
    "Streak Guardian",
    "Effort Commander",
    "Dedication Strategist",
    "Perseverance Commander",
    "Consistency Visionary",
    "Growth Commander",
    "Momentum Titan",
    "Habit Visionary",
    "Persistence Architect",
    "Goal Pioneer",
    "Rhythm Tactician",
    "Dedication Luminary",
    "Momentum Champion",
    "Effort Innovator",
    "Growth Alchemist",
    "Focus Architect",
    "Rhythm Maverick",
    "Progress Titan",
    "Momentum Vanguard",
    "Streak Commander",
    "Consistency Titan",
    "Effort Sentinel",
    "Perseverance Tactician",
    "Rhythm Alchemist",
    "Momentum Visionary",
    "Focus Virtuoso",
    "Goal Sentinel",
    "Habit Luminary",
    "Legendary Streak Architect",
    "Eternal Apex Streak Champion",
];
