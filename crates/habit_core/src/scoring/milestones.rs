use super::config::STREAK_MILESTONES;

/// One-time bonus for reaching exactly `streak` days, 0 when it is not a milestone.
pub fn streak_milestone_bonus(streak: u32) -> u64 {
    STREAK_MILESTONES
        .binary_search_by_key(&streak, |(days, _)| *days)
        .map(|idx| STREAK_MILESTONES[idx].1)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_for_lookup() {
        assert!(STREAK_MILESTONES.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn known_milestones() {
        assert_eq!(streak_milestone_bonus(3), 30);
        assert_eq!(streak_milestone_bonus(7), 100);
        assert_eq!(streak_milestone_bonus(1000), 50000);
    }

    #[test]
    fn other_lengths_pay_nothing() {
        assert_eq!(streak_milestone_bonus(0), 0);
        assert_eq!(streak_milestone_bonus(8), 0);
        assert_eq!(streak_milestone_bonus(1001), 0);
    }
}
