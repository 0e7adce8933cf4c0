use serde::{Deserialize, Serialize};

use super::config::{LEVEL_THRESHOLDS, LEVEL_TITLES};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub level: u32,
    pub title: String,
    pub next_threshold: u64,
    pub previous_threshold: u64,
}

/// Level for a cumulative point total. Thresholds are exclusive upper bounds,
/// so exactly 20 points is already level 2.
pub fn calculate_level(points: u64) -> u32 {
    let index = LEVEL_THRESHOLDS.partition_point(|threshold| *threshold <= points);
    index as u32 + 1
}

pub fn max_level() -> u32 {
    LEVEL_THRESHOLDS.len() as u32 + 1
}

pub fn level_title(level: u32) -> &'static str {
    let index = (level.max(1) as usize - 1).min(LEVEL_TITLES.len() - 1);
    LEVEL_TITLES[index]
}

pub fn next_level_threshold(points: u64) -> u64 {
    let level = calculate_level(points) as usize;
    LEVEL_THRESHOLDS
        .get(level - 1)
        .or_else(|| LEVEL_THRESHOLDS.last())
        .copied()
        .unwrap_or_default()
}

pub fn previous_level_threshold(points: u64) -> u64 {
    let level = calculate_level(points) as usize;
    if level > 1 {
        LEVEL_THRESHOLDS[level - 2]
    } else {
        0
    }
}

pub fn level_info(points: u64) -> LevelInfo {
    let level = calculate_level(points);
    LevelInfo {
        level,
        title: level_title(level).to_string(),
        next_threshold: next_level_threshold(points),
        previous_threshold: previous_level_threshold(points),
    }
}
