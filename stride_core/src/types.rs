//! Core domain types for the stride progress tracking engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Step goals and their periods
//! - Achievements (one-time unlockable badges)
//! - Streaks (consecutive days a goal was met)
//! - Weekly insight summaries

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Per-day step counts keyed by calendar day.
///
/// Ordered so that aggregate computations (best day, exports) are
/// deterministic.
pub type StepsByDay = BTreeMap<NaiveDate, u64>;

// ============================================================================
// Goal Types
// ============================================================================

/// Period covered by a step goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GoalType::Daily => "Daily",
            GoalType::Weekly => "Weekly",
            GoalType::Monthly => "Monthly",
            GoalType::Custom => "Custom Challenge",
        };
        write!(f, "{}", label)
    }
}

/// A user-defined step-count target over a period
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StepGoal {
    pub id: Uuid,
    pub goal_type: GoalType,
    pub target_steps: u32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_date: DateTime<Utc>,
}

impl StepGoal {
    /// Create a new active goal starting on `start_date`
    ///
    /// Rejects a nonpositive step target; the rest of the engine relies on
    /// `target_steps > 0`.
    pub fn new(goal_type: GoalType, target_steps: u32, start_date: NaiveDate) -> Result<Self> {
        if target_steps == 0 {
            return Err(Error::InvalidGoal(
                "target_steps must be positive".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            goal_type,
            target_steps,
            start_date,
            end_date: None,
            is_active: true,
            created_date: Utc::now(),
        })
    }

    /// Whether the goal's period has ended
    ///
    /// Derived from `end_date`, never stored.
    pub fn is_completed(&self, today: NaiveDate) -> bool {
        matches!(self.end_date, Some(end) if end < today)
    }
}

// ============================================================================
// Achievement Types
// ============================================================================

/// Category of an achievement's unlock condition
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Steps,
    Streaks,
    Goals,
    Special,
}

impl AchievementCategory {
    /// Human-readable section label
    pub fn label(&self) -> &'static str {
        match self {
            AchievementCategory::Steps => "Step Milestones",
            AchievementCategory::Streaks => "Consistency",
            AchievementCategory::Goals => "Goal Achievement",
            AchievementCategory::Special => "Special",
        }
    }
}

/// A one-time unlockable badge tied to a measurable milestone
///
/// Once `is_unlocked` flips to true it never flips back, and
/// `unlocked_date` is stamped exactly once at the moment of transition.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub category: AchievementCategory,
    pub requirement: u32,
    pub is_unlocked: bool,
    pub unlocked_date: Option<DateTime<Utc>>,
}

impl Achievement {
    /// Create a locked achievement for the built-in catalog
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
        category: AchievementCategory,
        requirement: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            icon: icon.into(),
            color: color.into(),
            category,
            requirement,
            is_unlocked: false,
            unlocked_date: None,
        }
    }
}

// ============================================================================
// Streak and Insight Types
// ============================================================================

/// Count of consecutive days a tracked goal was met
///
/// Invariant: `longest_streak >= current_streak` after every update.
/// The transition rules live in the `streak` module.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Streak {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_achievement_date: Option<NaiveDate>,
}

/// Computed summary of one calendar week's step activity
///
/// One instance per week, keyed by `week_start`; recomputation replaces
/// the existing instance rather than appending.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeeklyInsights {
    pub week_start: NaiveDate,
    pub total_steps: u64,
    pub average_steps: f64,
    pub best_day: Option<NaiveDate>,
    pub best_day_steps: u64,
    pub goals_achieved: u32,
    /// Signed percent change vs the previous week's total
    pub improvement_from_last_week: f64,
    /// Percent of the week's seven days with nonzero activity
    pub consistency: f64,
}
