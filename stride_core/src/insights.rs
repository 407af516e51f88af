//! Weekly insight computation.
//!
//! Aggregates a per-day step mapping into one summary per ISO week
//! (Monday start): totals, averages, best day, consistency, and the
//! change versus the previous week's recorded insight.

use crate::{progress::is_goal_achieved, StepGoal, StepsByDay, WeeklyInsights};
use chrono::{Datelike, Days, NaiveDate};

/// Monday of the ISO week containing `day`
pub fn week_start_of(day: NaiveDate) -> NaiveDate {
    day - chrono::Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// Compute the insight for the week containing `today`.
///
/// Only days of that week present in `steps_by_day` participate. Returns
/// `None` when the week has no data at all; an all-zero week still produces
/// an insight (with zero consistency).
///
/// `goals` are the goals tracked "today"; a day counts toward
/// `goals_achieved` when any one of them would be satisfied by that day's
/// count. `previous` supplies the prior week's insight for the improvement
/// figure; a missing or zero-total prior week yields 0.
pub fn compute_weekly_insights(
    steps_by_day: &StepsByDay,
    goals: &[StepGoal],
    previous: &[WeeklyInsights],
    today: NaiveDate,
) -> Option<WeeklyInsights> {
    let week_start = week_start_of(today);
    let week_end = week_start + Days::new(6);

    let week_data: Vec<(NaiveDate, u64)> = steps_by_day
        .range(week_start..=week_end)
        .map(|(day, steps)| (*day, *steps))
        .collect();

    if week_data.is_empty() {
        tracing::debug!("No step data for week starting {}", week_start);
        return None;
    }

    let total_steps: u64 = week_data.iter().map(|(_, steps)| steps).sum();
    let average_steps = total_steps as f64 / week_data.len() as f64;

    // Earliest day wins a tie (week_data is in ascending day order, and only
    // a strictly greater count displaces the running best).
    let best = week_data
        .iter()
        .fold(None, |acc: Option<(NaiveDate, u64)>, &(day, steps)| match acc {
            Some((_, best_steps)) if steps <= best_steps => acc,
            _ => Some((day, steps)),
        });

    let goals_achieved = week_data
        .iter()
        .filter(|(_, steps)| goals.iter().any(|g| is_goal_achieved(g, *steps)))
        .count() as u32;

    let days_active = week_data.iter().filter(|(_, steps)| *steps > 0).count();
    let consistency = days_active as f64 / 7.0 * 100.0;

    let improvement_from_last_week =
        improvement_vs_last_week(total_steps, previous, week_start);

    Some(WeeklyInsights {
        week_start,
        total_steps,
        average_steps,
        best_day: best.map(|(day, _)| day),
        best_day_steps: best.map(|(_, steps)| steps).unwrap_or(0),
        goals_achieved,
        improvement_from_last_week,
        consistency,
    })
}

/// Signed percent change vs the previous week's recorded total, or 0 when no
/// prior insight with a nonzero total exists.
fn improvement_vs_last_week(
    this_week_total: u64,
    previous: &[WeeklyInsights],
    week_start: NaiveDate,
) -> f64 {
    let last_week_start = week_start - chrono::Duration::days(7);

    match previous.iter().find(|w| w.week_start == last_week_start) {
        Some(last) if last.total_steps > 0 => {
            let last_total = last.total_steps as f64;
            (this_week_total as f64 - last_total) / last_total * 100.0
        }
        _ => 0.0,
    }
}
