#![forbid(unsafe_code)]

//! Core domain model and business logic for the Stride step tracker.
//!
//! This crate provides:
//! - Domain types (goals, achievements, streaks, weekly insights)
//! - Achievement catalog
//! - Progress, streak, and insight computation
//! - Persistence (keyed JSON collections over an atomic file store)
//! - Step data sourcing and periodic refresh

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod persist;
pub mod store;
pub mod streak;
pub mod progress;
pub mod insights;
pub mod source;
pub mod refresh;
pub mod selector;
pub mod share;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::default_achievements;
pub use config::Config;
pub use persist::{DirStore, KeyValueStore, MemoryStore};
pub use store::GoalStore;
pub use progress::{goal_progress, is_goal_achieved};
pub use insights::{compute_weekly_insights, week_start_of};
pub use source::{JsonStepSource, StepDataSource};
pub use selector::{DateRangeSelector, SelectionPhase};
