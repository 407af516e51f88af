//! CSV export of step history and weekly insights.

use crate::{Result, StepsByDay, WeeklyInsights};
use std::path::Path;

/// A daily step row in the CSV output
#[derive(Debug, serde::Serialize)]
struct StepRow {
    day: String,
    steps: u64,
}

/// A weekly insight row in the CSV output
#[derive(Debug, serde::Serialize)]
struct InsightRow {
    week_start: String,
    total_steps: u64,
    average_steps: f64,
    best_day: Option<String>,
    best_day_steps: u64,
    goals_achieved: u32,
    improvement_pct: f64,
    consistency_pct: f64,
}

impl From<&WeeklyInsights> for InsightRow {
    fn from(w: &WeeklyInsights) -> Self {
        InsightRow {
            week_start: w.week_start.to_string(),
            total_steps: w.total_steps,
            average_steps: w.average_steps,
            best_day: w.best_day.map(|d| d.to_string()),
            best_day_steps: w.best_day_steps,
            goals_achieved: w.goals_achieved,
            improvement_pct: w.improvement_from_last_week,
            consistency_pct: w.consistency,
        }
    }
}

/// Write per-day step counts to a CSV file (with headers), returning the
/// number of rows written
pub fn export_daily_steps(path: &Path, steps_by_day: &StepsByDay) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut count = 0;
    for (day, steps) in steps_by_day {
        writer.serialize(StepRow {
            day: day.to_string(),
            steps: *steps,
        })?;
        count += 1;
    }

    writer.flush()?;
    tracing::info!("Exported {} step rows to {}", count, path.display());
    Ok(count)
}

/// Write weekly insight summaries to a CSV file, returning the number of
/// rows written
pub fn export_weekly_insights(path: &Path, insights: &[WeeklyInsights]) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;

    for insight in insights {
        writer.serialize(InsightRow::from(insight))?;
    }

    writer.flush()?;
    tracing::info!(
        "Exported {} insight rows to {}",
        insights.len(),
        path.display()
    );
    Ok(insights.len())
}
