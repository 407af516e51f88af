//! Share-text generation.
//!
//! Builds the social messages for achievements, goal completions, streaks,
//! and weekly summaries. Text only; image rendering belongs to whatever
//! presentation layer consumes these.

use crate::{progress::goal_progress, Achievement, AchievementCategory, StepGoal, Streak,
    WeeklyInsights};

/// Format a count with thousands separators (12345 -> "12,345")
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Message for a freshly unlocked achievement
pub fn achievement_message(achievement: &Achievement) -> String {
    format!(
        "🎉 Achievement Unlocked! {}\n\n{}\n{}\n\nKeep stepping with Stride! 👣\n#Stride #FitnessGoals #StepTracking",
        category_emoji(achievement.category),
        achievement.title,
        achievement.description,
    )
}

/// Message for hitting a goal's target
pub fn goal_completion_message(goal: &StepGoal, current_steps: u64) -> String {
    let percent = goal_progress(goal, current_steps)
        .map(|p| (p * 100.0) as u32)
        .unwrap_or(0);

    format!(
        "🎯 Goal Completed!\n\nJust hit my {} goal of {} steps!\nToday's total: {} steps ({}%)\n\nEvery step counts! 👣\n#Stride #GoalAchieved #Fitness",
        goal.goal_type.to_string().to_lowercase(),
        format_number(u64::from(goal.target_steps)),
        format_number(current_steps),
        percent,
    )
}

/// Message for the current streak run
pub fn streak_message(streak: &Streak) -> String {
    format!(
        "🔥 Streak Alert! {}\n\n{} days in a row of hitting my step goals!\nPersonal best: {} days\n\nConsistency is key! 💪\n#Stride #StreakGoals #DailyMotivation",
        streak_emoji(streak.current_streak),
        streak.current_streak,
        streak.longest_streak,
    )
}

/// Message summarizing one week's insight
pub fn weekly_summary_message(insights: &WeeklyInsights) -> String {
    let trend = if insights.improvement_from_last_week > 0.0 {
        "📈 Up"
    } else if insights.improvement_from_last_week < 0.0 {
        "📉 Down"
    } else {
        "➡️ Steady"
    };

    format!(
        "📊 Weekly Step Summary\n\nTotal Steps: {}\nDaily Average: {}\nBest Day: {} steps\nConsistency: {}% of days active\n\n{} {}% vs last week\n\n#Stride #WeeklyStats #ProgressTracking",
        format_number(insights.total_steps),
        format_number(insights.average_steps as u64),
        format_number(insights.best_day_steps),
        insights.consistency as u32,
        trend,
        insights.improvement_from_last_week.abs() as u32,
    )
}

fn category_emoji(category: AchievementCategory) -> &'static str {
    match category {
        AchievementCategory::Steps => "👣",
        AchievementCategory::Streaks => "🔥",
        AchievementCategory::Goals => "🎯",
        AchievementCategory::Special => "⭐",
    }
}

fn streak_emoji(days: u32) -> &'static str {
    match days {
        0..=3 => "🔥",
        4..=7 => "🔥🔥",
        8..=14 => "🔥🔥🔥",
        15..=30 => "🔥🔥🔥🔥",
        _ => "🔥🔥🔥🔥🔥",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GoalType;
    use chrono::NaiveDate;

    #[test]
    fn test_format_number_groups_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(12_345), "12,345");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_achievement_message_contents() {
        let achievement = Achievement::new(
            "step_master",
            "Step Master",
            "Achieve 10,000 steps in a day",
            "figure.walk.diamond",
            "purple",
            AchievementCategory::Steps,
            10_000,
        );

        let message = achievement_message(&achievement);
        assert!(message.contains("Step Master"));
        assert!(message.contains("Achieve 10,000 steps in a day"));
        assert!(message.contains("👣"));
    }

    #[test]
    fn test_goal_completion_percent_reflects_overshoot_cap() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let goal = StepGoal::new(GoalType::Daily, 10_000, start).unwrap();

        let message = goal_completion_message(&goal, 15_000);
        assert!(message.contains("daily goal of 10,000 steps"));
        assert!(message.contains("15,000 steps (100%)"));
    }

    #[test]
    fn test_streak_message_scales_flames() {
        let short = Streak {
            current_streak: 2,
            longest_streak: 5,
            last_achievement_date: None,
        };
        assert!(streak_message(&short).contains("2 days in a row"));
        assert!(streak_message(&short).contains("Personal best: 5 days"));

        let long = Streak {
            current_streak: 40,
            longest_streak: 40,
            last_achievement_date: None,
        };
        assert!(streak_message(&long).contains("🔥🔥🔥🔥🔥"));
    }

    #[test]
    fn test_weekly_summary_trend_lines() {
        let mut insights = WeeklyInsights {
            week_start: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            total_steps: 42_000,
            average_steps: 6_000.0,
            best_day: None,
            best_day_steps: 9_000,
            goals_achieved: 3,
            improvement_from_last_week: 12.5,
            consistency: 71.4,
        };

        assert!(weekly_summary_message(&insights).contains("📈 Up 12% vs last week"));

        insights.improvement_from_last_week = -8.0;
        assert!(weekly_summary_message(&insights).contains("📉 Down 8% vs last week"));

        insights.improvement_from_last_week = 0.0;
        assert!(weekly_summary_message(&insights).contains("➡️ Steady 0% vs last week"));
    }
}
