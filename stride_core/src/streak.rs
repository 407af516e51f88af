//! Streak transition rules.
//!
//! A streak counts consecutive calendar days on which at least one tracked
//! goal was met. Updates are driven once per evaluated day and are safe to
//! re-run for the same day (idempotent).

use crate::Streak;
use chrono::NaiveDate;

impl Streak {
    /// Apply one day's outcome to the streak.
    ///
    /// Transition rules for a "met" day `D`:
    /// - `D` is exactly one day after the last achievement date: extend the run
    /// - `D` equals the last achievement date: no-op (re-evaluation)
    /// - anything else (no history, or a gap of any length): fresh run of 1
    ///
    /// A "not met" day resets the run to 0 only when `D` is neither the last
    /// achievement date nor the day right after it; a miss reported for the
    /// day currently being extended leaves the run intact.
    pub fn record(&mut self, met_goal: bool, day: NaiveDate) {
        if met_goal {
            match self.last_achievement_date {
                Some(last) if last == day => {
                    tracing::debug!("Streak already recorded for {}", day);
                    return;
                }
                Some(last) if last.succ_opt() == Some(day) => {
                    self.current_streak += 1;
                }
                _ => {
                    self.current_streak = 1;
                }
            }

            if self.current_streak > self.longest_streak {
                self.longest_streak = self.current_streak;
            }
            self.last_achievement_date = Some(day);

            tracing::debug!(
                "Streak extended: current {} (longest {})",
                self.current_streak,
                self.longest_streak
            );
        } else if let Some(last) = self.last_achievement_date {
            if day != last && last.succ_opt() != Some(day) {
                tracing::debug!("Streak broken on {} (last achievement {})", day, last);
                self.current_streak = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_first_met_day_starts_run() {
        let mut streak = Streak::default();
        streak.record(true, day(1));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 1);
        assert_eq!(streak.last_achievement_date, Some(day(1)));
    }

    #[test]
    fn test_consecutive_day_extends_run() {
        let mut streak = Streak::default();
        streak.record(true, day(1));
        streak.record(true, day(2));
        assert_eq!(streak.current_streak, 2);
        assert_eq!(streak.longest_streak, 2);
        assert_eq!(streak.last_achievement_date, Some(day(2)));
    }

    #[test]
    fn test_same_day_reevaluation_is_idempotent() {
        let mut streak = Streak::default();
        streak.record(true, day(1));
        streak.record(true, day(2));
        streak.record(true, day(2));
        assert_eq!(streak.current_streak, 2);
        assert_eq!(streak.longest_streak, 2);
        assert_eq!(streak.last_achievement_date, Some(day(2)));
    }

    #[test]
    fn test_gap_miss_resets_current_keeps_longest() {
        let mut streak = Streak::default();
        streak.record(true, day(1));
        streak.record(true, day(2));
        streak.record(false, day(4));
        assert_eq!(streak.current_streak, 0);
        assert_eq!(streak.longest_streak, 2);
    }

    #[test]
    fn test_met_after_gap_starts_fresh_run() {
        let mut streak = Streak::default();
        streak.record(true, day(1));
        streak.record(true, day(2));
        streak.record(true, day(2));
        streak.record(true, day(10));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 2);
        assert_eq!(streak.last_achievement_date, Some(day(10)));
    }

    #[test]
    fn test_miss_on_following_day_does_not_reset() {
        // A "not met" report for the day right after the last achievement is
        // still in grace: the day may not be over yet.
        let mut streak = Streak::default();
        streak.record(true, day(5));
        streak.record(false, day(6));
        assert_eq!(streak.current_streak, 1);
    }

    #[test]
    fn test_miss_with_no_history_is_noop() {
        let mut streak = Streak::default();
        streak.record(false, day(3));
        assert_eq!(streak, Streak::default());
    }

    #[test]
    fn test_longest_never_below_current() {
        let mut streak = Streak::default();
        for d in 1..=9 {
            streak.record(true, day(d));
            assert!(streak.longest_streak >= streak.current_streak);
        }
        streak.record(false, day(15));
        assert!(streak.longest_streak >= streak.current_streak);
        assert_eq!(streak.longest_streak, 9);
    }
}
