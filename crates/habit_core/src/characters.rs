//! Companion characters and the levels at which their variants unlock.
//!
//! Nothing in the scoring engine depends on this module; it only reads levels.

use serde::{Deserialize, Serialize};

use crate::scoring::config::LEVEL_THRESHOLDS;
use crate::scoring::level::calculate_level;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CharacterKind {
    #[default]
    CuteCat,
    CartoonPenguin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterVariant {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

impl CharacterKind {
    pub fn display_name(self) -> &'static str {
        match self {
            CharacterKind::CuteCat => "Cute Cat",
            CharacterKind::CartoonPenguin => "Cartoon Penguin",
        }
    }

    pub fn variants(self) -> &'static [CharacterVariant] {
        match self {
            CharacterKind::CuteCat => &[
                CharacterVariant {
                    id: "Character01",
                    name: "Orange Tabby",
                    description: "A friendly orange cat",
                },
                CharacterVariant {
                    id: "Character02",
                    name: "Gray Tabby",
                    description: "A mysterious gray cat",
                },
                CharacterVariant {
                    id: "Character03",
                    name: "Black Cat",
                    description: "A lucky black cat",
                },
            ],
            CharacterKind::CartoonPenguin => &[CharacterVariant {
                id: "Character01",
                name: "Classic",
                description: "A cheerful penguin",
            }],
        }
    }

    pub fn has_variant(self, variant: &str) -> bool {
        self.variants().iter().any(|candidate| candidate.id == variant)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterSelection {
    pub character: CharacterKind,
    pub variant: String,
}

impl Default for CharacterSelection {
    fn default() -> Self {
        Self {
            character: CharacterKind::CuteCat,
            variant: "Character01".to_string(),
        }
    }
}

/// Variant id → level required to use it.
pub const VARIANT_UNLOCK_LEVELS: &[(&str, u32)] = &[
    ("Character01", 1),
    ("Character02", 2),
    ("Character03", 3),
    ("Character04", 4),
    ("Character05", 5),
    ("Character06", 6),
    ("Character07", 7),
    ("Character08", 8),
    ("Character09", 10),
    ("Character10", 12),
    ("Character11", 14),
    ("Character12", 16),
    ("Character13", 20),
    ("Character14", 25),
    ("Character15", 30),
];

pub fn unlock_level(variant: &str) -> u32 {
    VARIANT_UNLOCK_LEVELS
        .iter()
        .find(|(id, _)| *id == variant)
        .map(|(_, level)| *level)
        .unwrap_or(1)
}

pub fn is_variant_unlocked(variant: &str, level: u32) -> bool {
    level >= unlock_level(variant)
}

pub fn next_unlock_level(current_level: u32) -> Option<u32> {
    VARIANT_UNLOCK_LEVELS
        .iter()
        .map(|(_, level)| *level)
        .filter(|level| *level > current_level)
        .min()
}

/// Points still missing before the next variant unlocks, `None` once everything is unlocked.
pub fn points_to_next_unlock(points: u64) -> Option<u64> {
    let next_level = next_unlock_level(calculate_level(points))?;
    // Reaching level N means passing the threshold that closes level N - 1.
    let index = usize::try_from(next_level).ok()?.checked_sub(2)?;
    let required = *LEVEL_THRESHOLDS.get(index)?;
    Some(required.saturating_sub(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selection_is_unlocked_from_start() {
        let selection = CharacterSelection::default();
        assert!(selection.character.has_variant(&selection.variant));
        assert!(is_variant_unlocked(&selection.variant, 1));
    }

    #[test]
    fn unknown_variants_unlock_at_level_one() {
        assert_eq!(unlock_level("Mystery"), 1);
    }

    #[test]
    fn later_variants_need_levels() {
        assert!(!is_variant_unlocked("Character03", 2));
        assert!(is_variant_unlocked("Character03", 3));
        assert_eq!(next_unlock_level(8), Some(10));
        assert_eq!(next_unlock_level(30), None);
    }

    #[test]
    fn points_to_next_unlock_counts_down_to_threshold() {
        // Level 1 → next unlock at level 2, reached at 20 points.
        assert_eq!(points_to_next_unlock(5), Some(15));
        // Level 2 (20..100) → next unlock at level 3, reached at 100 points.
        assert_eq!(points_to_next_unlock(40), Some(60));
    }

    #[test]
    fn selection_serializes_character_name() {
        let json = serde_json::to_string(&CharacterSelection::default()).unwrap();
        assert_eq!(json, r#"{"character":"CuteCat","variant":"Character01"}"#);
    }
}
