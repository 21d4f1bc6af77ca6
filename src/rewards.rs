//! Ink economy constants and the reward formulas.
//!
//! Both the state engine (when crediting) and the analytics heat index (when
//! reconstructing what a day earned) go through these functions.

use crate::models::RevisionStats;

pub const RATE_MINUTE: f64 = 0.5;
pub const RATE_CORRECT: f64 = 0.5;
pub const REWARD_REVISION_FIXED: i64 = 10;
pub const COST_POSTPONE: i64 = 10;
pub const STARTING_INK: i64 = 200;

/// Days after a lecture on which its revisions fall due.
pub const REVISION_OFFSETS_DAYS: [i64; 4] = [1, 3, 9, 14];

pub const ONBOARDING_TARGET_MONTHS: u32 = 6;

/// Minutes credited to a completed revision that never recorded a duration.
pub const ASSUMED_REVISION_MINUTES: u32 = 15;

pub fn correct_answers(attempted: u32, incorrect: u32) -> u32 {
    attempted.saturating_sub(incorrect)
}

pub fn lecture_ink(minutes: u32) -> i64 {
    combined_ink(minutes, 0)
}

pub fn practice_ink(correct: u32) -> i64 {
    combined_ink(0, correct)
}

// Floor is taken over the sum, not per term
pub fn combined_ink(minutes: u32, correct: u32) -> i64 {
    (minutes as f64 * RATE_MINUTE + correct as f64 * RATE_CORRECT).floor() as i64
}

pub fn revision_ink(stats: Option<&RevisionStats>) -> i64 {
    let performance = stats
        .map(|s| {
            combined_ink(
                s.duration_minutes,
                correct_answers(s.questions_attempted, s.questions_incorrect),
            )
        })
        .unwrap_or(0);
    REWARD_REVISION_FIXED + performance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_never_negative() {
        assert_eq!(correct_answers(20, 5), 15);
        assert_eq!(correct_answers(5, 20), 0);
        assert_eq!(correct_answers(0, 0), 0);
    }

    #[test]
    fn lecture_ink_floors_half_rate() {
        for minutes in 1..=1000u32 {
            assert_eq!(lecture_ink(minutes), (minutes / 2) as i64);
        }
    }

    #[test]
    fn practice_ink_floors_half_rate() {
        assert_eq!(practice_ink(15), 7);
        assert_eq!(practice_ink(16), 8);
        assert_eq!(practice_ink(0), 0);
    }

    #[test]
    fn combined_floors_the_sum() {
        // 0.5 + 0.5 = 1, flooring each term separately would give 0
        assert_eq!(combined_ink(1, 1), 1);
        assert_eq!(combined_ink(45, 12), 28);
    }

    #[test]
    fn revision_ink_fixed_without_stats() {
        assert_eq!(revision_ink(None), REWARD_REVISION_FIXED);
    }

    #[test]
    fn revision_ink_adds_performance() {
        let stats = RevisionStats {
            duration_minutes: 30,
            questions_attempted: 10,
            questions_incorrect: 3,
        };
        // 10 + floor(15 + 3.5)
        assert_eq!(revision_ink(Some(&stats)), 28);
    }

    #[test]
    fn offsets_are_fixed() {
        assert_eq!(REVISION_OFFSETS_DAYS, [1, 3, 9, 14]);
    }
}
