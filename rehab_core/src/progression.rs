//! Progression logic for scaling set counts by week.
//!
//! The schedule runs for six weeks:
//! - Weeks 1-2: prescribed sets (x1.0)
//! - Weeks 3-4: x1.1
//! - Weeks 5-6: x1.2
//!
//! Deload replaces the schedule entirely with one set fewer than prescribed.

use crate::program::Program;
use crate::types::{Exercise, MAX_WEEK, MIN_WEEK};

/// Progression multiplier for a week, in tenths (10 = x1.0)
///
/// Steps happen exactly at weeks 3 and 5. Weeks outside the schedule are
/// treated as the nearest valid week.
pub fn multiplier_tenths(week: u8) -> u32 {
    match week.clamp(MIN_WEEK, MAX_WEEK) {
        1 | 2 => 10,
        3 | 4 => 11,
        _ => 12,
    }
}

/// Progression multiplier as a percentage, for display
pub fn multiplier_percent(week: u8) -> u32 {
    multiplier_tenths(week) * 10
}

/// Effective number of sets for an exercise
///
/// Rounding is half-up, computed in integer tenths so that the result is
/// exact: `(base * tenths + 5) / 10`. With deload active the week is ignored
/// and the result is `max(1, base - 1)`. Never returns less than 1.
///
/// The product is taken in `u64` and saturates at `u32::MAX`, so any base
/// count is safe even though programs cap it at `MAX_BASE_SETS`.
pub fn effective_sets(base_sets: u32, week: u8, deload: bool) -> u32 {
    let sets = if deload {
        base_sets.saturating_sub(1)
    } else {
        let scaled = (u64::from(base_sets) * u64::from(multiplier_tenths(week)) + 5) / 10;
        u32::try_from(scaled).unwrap_or(u32::MAX)
    };
    sets.max(1)
}

/// One row of a rendered plan
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedExercise<'a> {
    pub exercise: &'a Exercise,
    pub sets: u32,
}

/// Every exercise of the program with its effective set count
pub fn plan_for(program: &Program, week: u8, deload: bool) -> Vec<PlannedExercise<'_>> {
    program
        .exercises()
        .iter()
        .map(|exercise| PlannedExercise {
            exercise,
            sets: effective_sets(exercise.base_sets, week, deload),
        })
        .collect()
}

/// Total number of sets in one session of the program
pub fn total_sets(program: &Program, week: u8, deload: bool) -> u32 {
    plan_for(program, week, deload).iter().map(|p| p.sets).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::build_default_program;

    #[test]
    fn test_reference_values() {
        assert_eq!(effective_sets(3, 1, false), 3);
        assert_eq!(effective_sets(3, 3, false), 3); // 3.3 -> 3
        assert_eq!(effective_sets(3, 5, false), 4); // 3.6 -> 4
    }

    #[test]
    fn test_multiplier_steps_at_three_and_five() {
        assert_eq!(multiplier_tenths(2), 10);
        assert_eq!(multiplier_tenths(3), 11);
        assert_eq!(multiplier_tenths(4), 11);
        assert_eq!(multiplier_tenths(5), 12);
        assert_eq!(multiplier_tenths(6), 12);
        assert_eq!(multiplier_percent(5), 120);
    }

    #[test]
    fn test_half_rounds_up() {
        // 5 * 1.1 = 5.5, which floating point would put a hair either side of
        assert_eq!(effective_sets(5, 3, false), 6);
        assert_eq!(effective_sets(15, 4, false), 17); // 16.5
    }

    #[test]
    fn test_non_decreasing_across_weeks() {
        for base in 1..=20 {
            let mut previous = 0;
            for week in MIN_WEEK..=MAX_WEEK {
                let sets = effective_sets(base, week, false);
                assert!(
                    sets >= previous,
                    "base {} dropped from {} to {} at week {}",
                    base,
                    previous,
                    sets,
                    week
                );
                previous = sets;
            }
        }
    }

    #[test]
    fn test_deload_ignores_week() {
        for base in 1..=10 {
            for week in MIN_WEEK..=MAX_WEEK {
                assert_eq!(effective_sets(base, week, true), (base - 1).max(1));
            }
        }
    }

    #[test]
    fn test_never_below_one() {
        assert_eq!(effective_sets(1, 1, true), 1);
        assert_eq!(effective_sets(1, 1, false), 1);
        assert_eq!(effective_sets(0, 1, false), 1);
    }

    #[test]
    fn test_huge_base_does_not_overflow() {
        assert_eq!(effective_sets(400_000_000, 5, false), 480_000_000);
        assert_eq!(effective_sets(u32::MAX, 6, false), u32::MAX);
        assert_eq!(effective_sets(u32::MAX, 1, true), u32::MAX - 1);
    }

    #[test]
    fn test_plan_for_default_program() {
        let program = build_default_program();
        let plan = plan_for(&program, 5, false);
        assert_eq!(plan.len(), 5);
        assert!(plan.iter().all(|p| p.sets == 4));
        assert_eq!(total_sets(&program, 1, false), 15);
        assert_eq!(total_sets(&program, 1, true), 10);
    }
}
