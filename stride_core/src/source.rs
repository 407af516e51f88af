//! Step data source seam.
//!
//! The engine never talks to a platform health store directly; it consumes
//! this trait. `JsonStepSource` is a file-backed implementation (a JSON map
//! of day to step count, written by whatever bridges the platform store)
//! that the CLI and tests use.

use crate::{Error, Result, StepsByDay};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

/// External provider of per-day step counts
#[async_trait]
pub trait StepDataSource: Send + Sync {
    /// Step counts per calendar day over `[start, end]` inclusive.
    ///
    /// Days with no recorded data may be absent from the result.
    async fn query_daily_steps(&self, start: NaiveDate, end: NaiveDate) -> Result<StepsByDay>;

    /// Today's running step total
    async fn query_today(&self) -> Result<u64>;
}

/// File-backed step source reading a JSON day-to-count map
pub struct JsonStepSource {
    path: PathBuf,
}

impl JsonStepSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<StepsByDay> {
        read_steps_file(&self.path)
    }
}

#[async_trait]
impl StepDataSource for JsonStepSource {
    async fn query_daily_steps(&self, start: NaiveDate, end: NaiveDate) -> Result<StepsByDay> {
        let all = self.read_all()?;
        let filtered: StepsByDay = all.range(start..=end).map(|(d, s)| (*d, *s)).collect();
        tracing::debug!(
            "Loaded {} of {} recorded days in {}..={}",
            filtered.len(),
            all.len(),
            start,
            end
        );
        Ok(filtered)
    }

    async fn query_today(&self) -> Result<u64> {
        let all = self.read_all()?;
        let today = Local::now().date_naive();
        Ok(all.get(&today).copied().unwrap_or(0))
    }
}

/// Read and parse a steps file.
///
/// A missing file means the bridging system has never written data here,
/// which surfaces as `DataSourceUnavailable`; a present but unreadable file
/// is a `QueryFailed`.
fn read_steps_file(path: &Path) -> Result<StepsByDay> {
    if !path.exists() {
        return Err(Error::DataSourceUnavailable(format!(
            "no steps file at {}",
            path.display()
        )));
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::QueryFailed(format!("reading {}: {}", path.display(), e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| Error::QueryFailed(format!("parsing {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn write_steps(path: &Path, json: &str) {
        std::fs::write(path, json).unwrap();
    }

    #[tokio::test]
    async fn test_query_filters_to_range() {
        let temp_dir = tempfile::tempdir().unwrap();
        let steps_path = temp_dir.path().join("steps.json");
        write_steps(
            &steps_path,
            r#"{"2024-01-01": 3000, "2024-01-05": 8000, "2024-01-20": 12000}"#,
        );

        let source = JsonStepSource::new(&steps_path);
        let steps = source
            .query_daily_steps(date(1), date(10))
            .await
            .unwrap();

        assert_eq!(steps.len(), 2);
        assert_eq!(steps.get(&date(1)), Some(&3_000));
        assert_eq!(steps.get(&date(5)), Some(&8_000));
        assert!(!steps.contains_key(&date(20)));
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = JsonStepSource::new(temp_dir.path().join("nonexistent.json"));

        let result = source.query_daily_steps(date(1), date(10)).await;
        assert!(matches!(result, Err(Error::DataSourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_malformed_file_is_query_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let steps_path = temp_dir.path().join("steps.json");
        write_steps(&steps_path, "{ not json }");

        let source = JsonStepSource::new(&steps_path);
        let result = source.query_today().await;
        assert!(matches!(result, Err(Error::QueryFailed(_))));
    }

    #[tokio::test]
    async fn test_query_today_defaults_to_zero() {
        let temp_dir = tempfile::tempdir().unwrap();
        let steps_path = temp_dir.path().join("steps.json");
        // Only historic data; nothing recorded for today
        write_steps(&steps_path, r#"{"2020-06-01": 9000}"#);

        let source = JsonStepSource::new(&steps_path);
        assert_eq!(source.query_today().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_query_today_reads_current_day() {
        let temp_dir = tempfile::tempdir().unwrap();
        let steps_path = temp_dir.path().join("steps.json");
        let today = Local::now().date_naive();
        write_steps(&steps_path, &format!(r#"{{"{}": 6543}}"#, today));

        let source = JsonStepSource::new(&steps_path);
        assert_eq!(source.query_today().await.unwrap(), 6_543);
    }
}
