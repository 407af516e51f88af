//! GoalStore: authoritative holder of goals, achievements, streak, and
//! weekly insights.
//!
//! All mutation goes through the store's explicit operation set so the
//! invariants (monotonic unlocks, streak bounds, one insight per week)
//! stay centralized. The store assumes a single logical owner; callers
//! needing shared access wrap it in their own synchronization.

use crate::{
    catalog,
    insights::{compute_weekly_insights, week_start_of},
    persist::KeyValueStore,
    progress::is_goal_achieved,
    Achievement, AchievementCategory, Result, StepGoal, StepsByDay, Streak, WeeklyInsights,
};
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use uuid::Uuid;

const GOALS_KEY: &str = "goals";
const ACHIEVEMENTS_KEY: &str = "achievements";
const STREAK_KEY: &str = "streak";
const INSIGHTS_KEY: &str = "weekly_insights";

/// Custom unlock predicate for a Special-category achievement.
///
/// Receives the achievement and today's total step count. Unregistered
/// Special achievements never unlock.
pub type SpecialPredicate = Box<dyn Fn(&Achievement, u64) -> bool + Send + Sync>;

/// Owner of the four persisted entity collections
pub struct GoalStore<S: KeyValueStore> {
    goals: Vec<StepGoal>,
    achievements: Vec<Achievement>,
    streak: Streak,
    insights: Vec<WeeklyInsights>,
    special_checks: HashMap<String, SpecialPredicate>,
    backing: S,
}

impl<S: KeyValueStore> GoalStore<S> {
    /// Open a store over the given persistence backend.
    ///
    /// Each collection loads from its own key; a missing key or an
    /// unreadable blob degrades to the empty default with a warning,
    /// matching the rule that persistence problems never block startup.
    pub fn open(backing: S) -> Self {
        let goals = load_collection(&backing, GOALS_KEY);
        let achievements = load_collection(&backing, ACHIEVEMENTS_KEY);
        let streak = load_collection(&backing, STREAK_KEY);
        let insights = load_collection(&backing, INSIGHTS_KEY);

        Self {
            goals,
            achievements,
            streak,
            insights,
            special_checks: HashMap::new(),
            backing,
        }
    }

    // ========================================================================
    // Read surface
    // ========================================================================

    pub fn goals(&self) -> &[StepGoal] {
        &self.goals
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn streak(&self) -> &Streak {
        &self.streak
    }

    pub fn insights(&self) -> &[WeeklyInsights] {
        &self.insights
    }

    /// All goals currently marked active, in insertion order
    pub fn active_goals(&self) -> Vec<&StepGoal> {
        self.goals.iter().filter(|g| g.is_active).collect()
    }

    /// Active goals tracked for `today`.
    ///
    /// Daily goals always qualify; Weekly and Monthly goals qualify only on
    /// the calendar day they started. This mirrors the original product
    /// behavior and deliberately under-includes multi-day goals mid-period.
    pub fn today_goals(&self, today: NaiveDate) -> Vec<&StepGoal> {
        self.goals
            .iter()
            .filter(|g| {
                g.is_active
                    && match g.goal_type {
                        crate::GoalType::Daily => true,
                        crate::GoalType::Weekly | crate::GoalType::Monthly => {
                            g.start_date == today
                        }
                        crate::GoalType::Custom => false,
                    }
            })
            .collect()
    }

    // ========================================================================
    // Goal management
    // ========================================================================

    /// Append a goal and persist.
    ///
    /// Validation happens at `StepGoal` construction; the store trusts its
    /// input here.
    pub fn add_goal(&mut self, goal: StepGoal) -> Result<()> {
        tracing::info!("Adding {} goal ({} steps)", goal.goal_type, goal.target_steps);
        self.goals.push(goal);
        self.persist()
    }

    /// Remove the goal with the given id; no-op if absent
    pub fn remove_goal(&mut self, id: Uuid) -> Result<()> {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        if self.goals.len() < before {
            tracing::info!("Removed goal {}", id);
        }
        self.persist()
    }

    /// Replace the goal with a matching id; no-op if absent
    pub fn update_goal(&mut self, goal: StepGoal) -> Result<()> {
        if let Some(existing) = self.goals.iter_mut().find(|g| g.id == goal.id) {
            *existing = goal;
            self.persist()?;
        }
        Ok(())
    }

    // ========================================================================
    // Achievement system
    // ========================================================================

    /// Seed the built-in achievement catalog into an empty store.
    ///
    /// Idempotent: a non-empty catalog is left untouched so unlock history
    /// is never wiped.
    pub fn seed_achievements_if_empty(&mut self) -> Result<()> {
        if !self.achievements.is_empty() {
            return Ok(());
        }

        self.achievements = catalog::default_achievements();
        tracing::info!("Seeded {} default achievements", self.achievements.len());
        self.persist()
    }

    /// Register a custom unlock predicate for a Special achievement id
    pub fn register_special_check(&mut self, id: impl Into<String>, check: SpecialPredicate) {
        self.special_checks.insert(id.into(), check);
    }

    /// Evaluate unlock conditions for every locked achievement.
    ///
    /// Unlocks are monotonic: an unlocked achievement is never re-examined
    /// and its `unlocked_date` never changes. Persists only when at least
    /// one achievement changed. Returns the ids unlocked by this call.
    pub fn check_achievements(&mut self, total_steps_today: u64) -> Result<Vec<String>> {
        let completed_goals = self.goals.iter().filter(|g| !g.is_active).count() as u32;
        let current_streak = self.streak.current_streak;

        let mut newly_unlocked = Vec::new();

        for achievement in &mut self.achievements {
            if achievement.is_unlocked {
                continue;
            }

            let should_unlock = match achievement.category {
                AchievementCategory::Steps => {
                    total_steps_today >= u64::from(achievement.requirement)
                }
                AchievementCategory::Streaks => current_streak >= achievement.requirement,
                AchievementCategory::Goals => completed_goals >= achievement.requirement,
                AchievementCategory::Special => self
                    .special_checks
                    .get(&achievement.id)
                    .map(|check| check(achievement, total_steps_today))
                    .unwrap_or(false),
            };

            if should_unlock {
                achievement.is_unlocked = true;
                achievement.unlocked_date = Some(Utc::now());
                tracing::info!("Achievement unlocked: {}", achievement.title);
                newly_unlocked.push(achievement.id.clone());
            }
        }

        if !newly_unlocked.is_empty() {
            self.persist()?;
        }
        Ok(newly_unlocked)
    }

    // ========================================================================
    // Streak tracking
    // ========================================================================

    /// Apply one day's outcome to the streak and persist.
    ///
    /// Also re-checks achievements so a freshly extended streak can unlock
    /// its milestone immediately; returns the ids that re-check unlocked.
    pub fn update_streak(
        &mut self,
        achieved_goal_today: bool,
        day: NaiveDate,
    ) -> Result<Vec<String>> {
        self.streak.record(achieved_goal_today, day);
        self.persist()?;
        self.check_achievements(0)
    }

    /// Determine whether any of today's tracked goals is met by
    /// `total_steps` and update the streak accordingly; returns the
    /// achievement ids the update unlocked
    pub fn update_streak_for_today(
        &mut self,
        total_steps: u64,
        today: NaiveDate,
    ) -> Result<Vec<String>> {
        let achieved_any = self
            .today_goals(today)
            .iter()
            .any(|g| is_goal_achieved(g, total_steps));
        self.update_streak(achieved_any, today)
    }

    // ========================================================================
    // Insights
    // ========================================================================

    /// Compute the current week's insight from `steps_by_day` and upsert it.
    ///
    /// Replaces any existing insight for the same week-start; persists only
    /// when an insight was produced (a week with no data changes nothing).
    pub fn generate_weekly_insights(
        &mut self,
        steps_by_day: &StepsByDay,
        today: NaiveDate,
    ) -> Result<()> {
        let tracked: Vec<StepGoal> = self.today_goals(today).into_iter().cloned().collect();

        let Some(insight) =
            compute_weekly_insights(steps_by_day, &tracked, &self.insights, today)
        else {
            return Ok(());
        };

        let week_start = week_start_of(today);
        match self.insights.iter_mut().find(|w| w.week_start == week_start) {
            Some(existing) => *existing = insight,
            None => self.insights.push(insight),
        }

        self.persist()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Serialize all four collections to their keys
    fn persist(&mut self) -> Result<()> {
        save_collection(&mut self.backing, GOALS_KEY, &self.goals)?;
        save_collection(&mut self.backing, ACHIEVEMENTS_KEY, &self.achievements)?;
        save_collection(&mut self.backing, STREAK_KEY, &self.streak)?;
        save_collection(&mut self.backing, INSIGHTS_KEY, &self.insights)?;
        Ok(())
    }
}

fn load_collection<S: KeyValueStore, T: DeserializeOwned + Default>(backing: &S, key: &str) -> T {
    match backing.load(key) {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to parse '{}': {}. Using default.", key, e);
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!("Failed to load '{}': {}. Using default.", key, e);
            T::default()
        }
    }
}

fn save_collection<S: KeyValueStore, T: serde::Serialize>(
    backing: &mut S,
    key: &str,
    value: &T,
) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    backing.save(key, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;
    use crate::GoalType;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn empty_store() -> GoalStore<MemoryStore> {
        GoalStore::open(MemoryStore::new())
    }

    fn daily_goal(target: u32, start: NaiveDate) -> StepGoal {
        StepGoal::new(GoalType::Daily, target, start).unwrap()
    }

    #[test]
    fn test_add_and_remove_goal() {
        let mut store = empty_store();
        let goal = daily_goal(10_000, date(1));
        let id = goal.id;

        store.add_goal(goal).unwrap();
        assert_eq!(store.goals().len(), 1);

        store.remove_goal(id).unwrap();
        assert!(store.goals().is_empty());

        // Removing an unknown id is a no-op, not an error
        store.remove_goal(Uuid::new_v4()).unwrap();
    }

    #[test]
    fn test_update_goal_replaces_by_id() {
        let mut store = empty_store();
        let mut goal = daily_goal(10_000, date(1));
        store.add_goal(goal.clone()).unwrap();

        goal.target_steps = 12_000;
        store.update_goal(goal).unwrap();
        assert_eq!(store.goals()[0].target_steps, 12_000);

        // Unknown id: no-op
        let stranger = daily_goal(1, date(1));
        store.update_goal(stranger).unwrap();
        assert_eq!(store.goals().len(), 1);
    }

    #[test]
    fn test_today_goals_filters_by_type_and_start() {
        let mut store = empty_store();
        let today = date(10);

        store.add_goal(daily_goal(10_000, date(1))).unwrap();

        let weekly_today = StepGoal::new(GoalType::Weekly, 70_000, today).unwrap();
        store.add_goal(weekly_today).unwrap();

        let weekly_earlier = StepGoal::new(GoalType::Weekly, 70_000, date(8)).unwrap();
        store.add_goal(weekly_earlier).unwrap();

        let mut inactive = daily_goal(5_000, date(1));
        inactive.is_active = false;
        store.add_goal(inactive).unwrap();

        let tracked = store.today_goals(today);
        assert_eq!(tracked.len(), 2);
        assert!(tracked.iter().all(|g| g.is_active));
    }

    #[test]
    fn test_seeding_is_idempotent() {
        let mut store = empty_store();
        store.seed_achievements_if_empty().unwrap();
        let first = store.achievements().to_vec();

        store.seed_achievements_if_empty().unwrap();
        assert_eq!(store.achievements(), first.as_slice());
    }

    #[test]
    fn test_seeding_never_erases_unlocks() {
        let mut store = empty_store();
        store.seed_achievements_if_empty().unwrap();
        let unlocked = store.check_achievements(1_500).unwrap();
        assert_eq!(unlocked, vec!["first_steps".to_string()]);

        store.seed_achievements_if_empty().unwrap();
        let first_steps = store
            .achievements()
            .iter()
            .find(|a| a.id == "first_steps")
            .unwrap();
        assert!(first_steps.is_unlocked);
    }

    #[test]
    fn test_step_achievements_unlock_at_threshold() {
        let mut store = empty_store();
        store.seed_achievements_if_empty().unwrap();

        let unlocked = store.check_achievements(10_000).unwrap();
        assert!(unlocked.contains(&"first_steps".to_string()));
        assert!(unlocked.contains(&"getting_moving".to_string()));
        assert!(unlocked.contains(&"step_master".to_string()));
        assert!(!unlocked.contains(&"walking_marathon".to_string()));
    }

    #[test]
    fn test_unlock_is_monotonic_and_date_stamped_once() {
        let mut store = empty_store();
        store.seed_achievements_if_empty().unwrap();

        store.check_achievements(2_000).unwrap();
        let stamped = store
            .achievements()
            .iter()
            .find(|a| a.id == "first_steps")
            .unwrap()
            .unlocked_date;
        assert!(stamped.is_some());

        // Lower input must not re-lock or re-stamp
        let again = store.check_achievements(0).unwrap();
        assert!(again.is_empty());
        let first_steps = store
            .achievements()
            .iter()
            .find(|a| a.id == "first_steps")
            .unwrap();
        assert!(first_steps.is_unlocked);
        assert_eq!(first_steps.unlocked_date, stamped);
    }

    #[test]
    fn test_streak_achievements_track_current_streak() {
        let mut store = empty_store();
        store.seed_achievements_if_empty().unwrap();
        store.add_goal(daily_goal(1_000, date(1))).unwrap();

        for d in 1..=3 {
            store.update_streak_for_today(2_000, date(d)).unwrap();
        }

        let getting_started = store
            .achievements()
            .iter()
            .find(|a| a.id == "getting_started")
            .unwrap();
        assert!(getting_started.is_unlocked);

        let week_warrior = store
            .achievements()
            .iter()
            .find(|a| a.id == "week_warrior")
            .unwrap();
        assert!(!week_warrior.is_unlocked);
    }

    #[test]
    fn test_update_streak_reports_milestone_ids() {
        let mut store = empty_store();
        store.seed_achievements_if_empty().unwrap();

        assert!(store.update_streak(true, date(1)).unwrap().is_empty());
        assert!(store.update_streak(true, date(2)).unwrap().is_empty());

        let unlocked = store.update_streak(true, date(3)).unwrap();
        assert_eq!(unlocked, vec!["getting_started".to_string()]);
    }

    #[test]
    fn test_goal_achievements_count_inactive_goals() {
        let mut store = empty_store();
        store.seed_achievements_if_empty().unwrap();

        let mut goal = daily_goal(10_000, date(1));
        goal.is_active = false;
        store.add_goal(goal).unwrap();

        let unlocked = store.check_achievements(0).unwrap();
        assert!(unlocked.contains(&"goal_setter".to_string()));
        assert!(!unlocked.contains(&"achiever".to_string()));
    }

    #[test]
    fn test_special_achievements_default_to_locked() {
        let mut store = empty_store();
        store.seed_achievements_if_empty().unwrap();

        store.check_achievements(1_000_000).unwrap();
        let warrior = store
            .achievements()
            .iter()
            .find(|a| a.id == "weekend_warrior")
            .unwrap();
        assert!(!warrior.is_unlocked);
    }

    #[test]
    fn test_special_achievement_uses_registered_predicate() {
        let mut store = empty_store();
        store.seed_achievements_if_empty().unwrap();
        store.register_special_check(
            "weekend_warrior",
            Box::new(|a, steps| steps >= u64::from(a.requirement) * 10_000),
        );

        store.check_achievements(19_999).unwrap();
        assert!(!store
            .achievements()
            .iter()
            .find(|a| a.id == "weekend_warrior")
            .unwrap()
            .is_unlocked);

        store.check_achievements(20_000).unwrap();
        assert!(store
            .achievements()
            .iter()
            .find(|a| a.id == "weekend_warrior")
            .unwrap()
            .is_unlocked);
    }

    #[test]
    fn test_update_streak_for_today_checks_tracked_goals() {
        let mut store = empty_store();
        store.add_goal(daily_goal(10_000, date(1))).unwrap();

        store.update_streak_for_today(10_000, date(5)).unwrap();
        assert_eq!(store.streak().current_streak, 1);

        store.update_streak_for_today(500, date(7)).unwrap();
        assert_eq!(store.streak().current_streak, 0);
        assert_eq!(store.streak().longest_streak, 1);
    }

    #[test]
    fn test_weekly_insights_upsert_by_week() {
        let mut store = empty_store();
        let monday = date(8);

        let mut steps = StepsByDay::new();
        steps.insert(monday, 4_000);
        store.generate_weekly_insights(&steps, monday).unwrap();
        assert_eq!(store.insights().len(), 1);
        assert_eq!(store.insights()[0].total_steps, 4_000);

        // Recompute for the same week replaces rather than appends
        steps.insert(date(9), 6_000);
        store.generate_weekly_insights(&steps, date(9)).unwrap();
        assert_eq!(store.insights().len(), 1);
        assert_eq!(store.insights()[0].total_steps, 10_000);
    }

    #[test]
    fn test_weekly_insights_empty_week_is_noop() {
        let mut store = empty_store();
        let steps = StepsByDay::new();
        store.generate_weekly_insights(&steps, date(10)).unwrap();
        assert!(store.insights().is_empty());
    }

    #[test]
    fn test_collections_roundtrip_through_backing() {
        let mut store = empty_store();
        store.seed_achievements_if_empty().unwrap();
        store.add_goal(daily_goal(10_000, date(1))).unwrap();
        store.update_streak(true, date(5)).unwrap();

        let mut steps = StepsByDay::new();
        steps.insert(date(8), 4_000);
        store.generate_weekly_insights(&steps, date(8)).unwrap();

        let goals = store.goals().to_vec();
        let achievements = store.achievements().to_vec();
        let streak = store.streak().clone();
        let insights = store.insights().to_vec();

        let reloaded = GoalStore::open(store.backing);
        assert_eq!(reloaded.goals(), goals.as_slice());
        assert_eq!(reloaded.achievements(), achievements.as_slice());
        assert_eq!(reloaded.streak(), &streak);
        assert_eq!(reloaded.insights(), insights.as_slice());
    }

    #[test]
    fn test_corrupt_blob_degrades_to_default() {
        let mut backing = MemoryStore::new();
        backing.save(GOALS_KEY, b"{ not json }").unwrap();

        let store = GoalStore::open(backing);
        assert!(store.goals().is_empty());
    }
}
