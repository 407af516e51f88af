//! Pure goal-progress calculations.
//!
//! These functions derive display and decision values from a goal and a
//! current step count without touching any store state.

use crate::{Error, Result, StepGoal};

/// Fraction of the goal's target covered by `current_steps`, capped at 1.0.
///
/// A zero target is excluded by the `StepGoal` constructor; a goal that was
/// deserialized around that check still fails here rather than dividing by
/// zero.
pub fn goal_progress(goal: &StepGoal, current_steps: u64) -> Result<f64> {
    if goal.target_steps == 0 {
        return Err(Error::InvalidGoal(format!(
            "goal {} has a zero step target",
            goal.id
        )));
    }

    let ratio = current_steps as f64 / f64::from(goal.target_steps);
    Ok(ratio.min(1.0))
}

/// Whether `current_steps` satisfies the goal's target
pub fn is_goal_achieved(goal: &StepGoal, current_steps: u64) -> bool {
    current_steps >= u64::from(goal.target_steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GoalType;
    use chrono::NaiveDate;

    fn goal(target: u32) -> StepGoal {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        StepGoal::new(GoalType::Daily, target, start).unwrap()
    }

    #[test]
    fn test_progress_is_ratio_capped_at_one() {
        let g = goal(10_000);
        assert_eq!(goal_progress(&g, 0).unwrap(), 0.0);
        assert_eq!(goal_progress(&g, 5_000).unwrap(), 0.5);
        assert_eq!(goal_progress(&g, 10_000).unwrap(), 1.0);
        assert_eq!(goal_progress(&g, 25_000).unwrap(), 1.0);
    }

    #[test]
    fn test_progress_always_in_unit_interval() {
        let g = goal(7_500);
        for steps in [0u64, 1, 3_749, 7_499, 7_500, 7_501, 1_000_000] {
            let p = goal_progress(&g, steps).unwrap();
            assert!((0.0..=1.0).contains(&p), "progress {} out of range", p);
        }
    }

    #[test]
    fn test_achieved_iff_at_or_over_target() {
        let g = goal(10_000);
        assert!(!is_goal_achieved(&g, 9_999));
        assert!(is_goal_achieved(&g, 10_000));
        assert!(is_goal_achieved(&g, 10_001));
    }

    #[test]
    fn test_achieved_implies_full_progress() {
        let g = goal(4_000);
        for steps in [4_000u64, 4_001, 9_000] {
            assert!(is_goal_achieved(&g, steps));
            assert_eq!(goal_progress(&g, steps).unwrap(), 1.0);
        }
    }

    #[test]
    fn test_zero_target_defended_against() {
        // Bypass the constructor to simulate a malformed persisted goal.
        let mut g = goal(1);
        g.target_steps = 0;
        assert!(matches!(goal_progress(&g, 100), Err(Error::InvalidGoal(_))));
    }
}
