//! Error types for the stride_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for stride_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Goal construction error (nonpositive target)
    #[error("Invalid goal: {0}")]
    InvalidGoal(String),

    /// Step data source is not available on this system
    #[error("Step data source unavailable: {0}")]
    DataSourceUnavailable(String),

    /// User denied access to the step data store
    #[error("Step data authorization denied: {0}")]
    AuthorizationDenied(String),

    /// A step data query was attempted but failed
    #[error("Step data query failed: {0}")]
    QueryFailed(String),
}
