//! Periodic step-data refresh.
//!
//! Fetches are tagged with a generation so a superseded request (user
//! changed the date range, or a slow poll finishing after a newer one)
//! can be recognized and discarded instead of overwriting fresher state.
//! Applying a fetch runs the streak/achievement/insight sequence against
//! a single exclusive borrow of the store, so readers never observe a
//! partial update.

use crate::{
    persist::KeyValueStore, source::StepDataSource, GoalStore, Result, StepsByDay,
};
use chrono::{Days, Local, NaiveDate};
use std::time::Duration;

/// One completed step-data fetch
#[derive(Clone, Debug)]
pub struct FetchedSteps {
    pub today_steps: u64,
    pub steps_by_day: StepsByDay,
}

/// A fetch result paired with the generation it was issued under
pub struct FetchOutcome {
    pub generation: u64,
    pub result: Result<FetchedSteps>,
}

/// Hands out fetch generations and recognizes stale completions.
///
/// Begin a generation when issuing a request; a completion whose
/// generation is no longer the latest must be discarded.
#[derive(Debug, Default)]
pub struct FetchTracker {
    latest: u64,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next generation, superseding all outstanding fetches
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }
}

/// Query both the per-day range and today's total from the source
pub async fn fetch_range<D: StepDataSource>(
    source: &D,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<FetchedSteps> {
    let steps_by_day = source.query_daily_steps(start, end).await?;
    let today_steps = source.query_today().await?;
    Ok(FetchedSteps {
        today_steps,
        steps_by_day,
    })
}

/// Feed a fetched snapshot through the store's update sequence:
/// streak first (so streak milestones see the new run length), then
/// achievement checks, then the weekly insight. Returns the achievement
/// ids unlocked by this refresh.
pub fn apply_refresh<S: KeyValueStore>(
    store: &mut GoalStore<S>,
    fetched: &FetchedSteps,
    today: NaiveDate,
) -> Result<Vec<String>> {
    let mut unlocked = store.update_streak_for_today(fetched.today_steps, today)?;
    unlocked.extend(store.check_achievements(fetched.today_steps)?);
    store.generate_weekly_insights(&fetched.steps_by_day, today)?;
    Ok(unlocked)
}

/// Apply a tagged fetch outcome, discarding it when stale.
///
/// Returns the unlocked achievement ids when applied, `None` when the
/// outcome was superseded. A failed fetch propagates its error and leaves
/// the store untouched either way.
pub fn apply_outcome<S: KeyValueStore>(
    store: &mut GoalStore<S>,
    tracker: &FetchTracker,
    outcome: FetchOutcome,
    today: NaiveDate,
) -> Result<Option<Vec<String>>> {
    if !tracker.is_current(outcome.generation) {
        tracing::debug!(
            "Discarding stale fetch (generation {})",
            outcome.generation
        );
        return Ok(None);
    }

    let fetched = outcome.result?;
    apply_refresh(store, &fetched, today).map(Some)
}

/// Run one refresh: fetch the trailing week ending today and apply it
pub async fn refresh_once<D, S>(
    source: &D,
    store: &mut GoalStore<S>,
) -> Result<Vec<String>>
where
    D: StepDataSource,
    S: KeyValueStore,
{
    let today = Local::now().date_naive();
    let start = today - Days::new(6);
    let fetched = fetch_range(source, start, today).await?;
    apply_refresh(store, &fetched, today)
}

/// Poll the source at a fixed interval, feeding each result into the store.
///
/// Fetch failures are logged and the poll skipped; a failure never mutates
/// the store. Runs until the task is cancelled.
pub async fn run<D, S>(source: &D, store: &mut GoalStore<S>, period: Duration) -> Result<()>
where
    D: StepDataSource,
    S: KeyValueStore,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        match refresh_once(source, store).await {
            Ok(unlocked) => {
                if !unlocked.is_empty() {
                    tracing::info!("Refresh unlocked {} achievement(s)", unlocked.len());
                }
            }
            Err(e) => {
                tracing::warn!("Step data refresh failed: {}", e);
            }
        }
    }
}
