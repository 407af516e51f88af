//! Built-in achievement catalog.
//!
//! The default badge set seeded into an empty store. Seeding semantics
//! (only into an empty catalog, never over existing unlock history) live in
//! the store; this module just defines the list.

use crate::{Achievement, AchievementCategory};
use once_cell::sync::Lazy;

/// Cached default catalog - built once and cloned on demand
static DEFAULT_ACHIEVEMENTS: Lazy<Vec<Achievement>> = Lazy::new(build_default_achievements);

/// The built-in achievement list, all locked
pub fn default_achievements() -> Vec<Achievement> {
    DEFAULT_ACHIEVEMENTS.clone()
}

fn build_default_achievements() -> Vec<Achievement> {
    vec![
        // ====================================================================
        // Step milestones (single-day totals)
        // ====================================================================
        Achievement::new(
            "first_steps",
            "First Steps",
            "Take your first 1,000 steps",
            "figure.walk",
            "green",
            AchievementCategory::Steps,
            1_000,
        ),
        Achievement::new(
            "getting_moving",
            "Getting Moving",
            "Walk 5,000 steps in a day",
            "figure.walk.motion",
            "blue",
            AchievementCategory::Steps,
            5_000,
        ),
        Achievement::new(
            "step_master",
            "Step Master",
            "Achieve 10,000 steps in a day",
            "figure.walk.diamond",
            "purple",
            AchievementCategory::Steps,
            10_000,
        ),
        Achievement::new(
            "walking_marathon",
            "Walking Marathon",
            "Walk 15,000 steps in a day",
            "figure.walk.diamond.fill",
            "orange",
            AchievementCategory::Steps,
            15_000,
        ),
        Achievement::new(
            "step_champion",
            "Step Champion",
            "Walk 20,000 steps in a day",
            "crown",
            "yellow",
            AchievementCategory::Steps,
            20_000,
        ),
        // ====================================================================
        // Streaks (consecutive goal days)
        // ====================================================================
        Achievement::new(
            "getting_started",
            "Getting Started",
            "Achieve your goal 3 days in a row",
            "flame",
            "red",
            AchievementCategory::Streaks,
            3,
        ),
        Achievement::new(
            "week_warrior",
            "Week Warrior",
            "Achieve your goal 7 days in a row",
            "flame.fill",
            "orange",
            AchievementCategory::Streaks,
            7,
        ),
        Achievement::new(
            "consistency_king",
            "Consistency King",
            "Achieve your goal 30 days in a row",
            "star.fill",
            "yellow",
            AchievementCategory::Streaks,
            30,
        ),
        // ====================================================================
        // Goals (lifetime completed goals)
        // ====================================================================
        Achievement::new(
            "goal_setter",
            "Goal Setter",
            "Set your first goal",
            "target",
            "blue",
            AchievementCategory::Goals,
            1,
        ),
        Achievement::new(
            "achiever",
            "Achiever",
            "Complete 10 goals",
            "checkmark.seal",
            "green",
            AchievementCategory::Goals,
            10,
        ),
        // ====================================================================
        // Special (custom predicates registered at runtime)
        // ====================================================================
        Achievement::new(
            "weekend_warrior",
            "Weekend Warrior",
            "Achieve 10,000 steps on both weekend days",
            "party.popper",
            "purple",
            AchievementCategory::Special,
            2,
        ),
    ]
}

/// Validate a catalog for consistency
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate(achievements: &[Achievement]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for achievement in achievements {
        if achievement.id.is_empty() {
            errors.push("Achievement has empty ID".to_string());
        }
        if !seen.insert(achievement.id.as_str()) {
            errors.push(format!("Duplicate achievement ID '{}'", achievement.id));
        }
        if achievement.title.is_empty() {
            errors.push(format!("Achievement '{}' has empty title", achievement.id));
        }
        if achievement.requirement == 0 {
            errors.push(format!(
                "Achievement '{}' has zero requirement",
                achievement.id
            ));
        }
    }

    for category in [
        AchievementCategory::Steps,
        AchievementCategory::Streaks,
        AchievementCategory::Goals,
        AchievementCategory::Special,
    ] {
        if !achievements.iter().any(|a| a.category == category) {
            errors.push(format!("Catalog has no {} achievements", category.label()));
        }
    }

    errors
}
