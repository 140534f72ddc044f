//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for mrscreen.
///
/// Fatal classes (config, database, window, io) terminate the run.
/// `InsufficientData` and `NumericDomain` are per-ticker: the screening loop
/// catches them, records the ticker as errored, and continues.
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid date window: start {start} is not before end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("insufficient data: have {have} observations, need {need}")]
    InsufficientData { have: usize, need: usize },

    #[error("numeric domain error: {reason}")]
    NumericDomain { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScreenError {
    /// Whether the screening loop may recover by skipping the ticker.
    pub fn is_per_ticker(&self) -> bool {
        matches!(
            self,
            ScreenError::InsufficientData { .. } | ScreenError::NumericDomain { .. }
        )
    }
}

impl From<&ScreenError> for std::process::ExitCode {
    fn from(err: &ScreenError) -> Self {
        let code: u8 = match err {
            ScreenError::Io(_) => 1,
            ScreenError::ConfigParse { .. }
            | ScreenError::ConfigMissing { .. }
            | ScreenError::ConfigInvalid { .. }
            | ScreenError::InvalidWindow { .. } => 2,
            ScreenError::Database { .. } | ScreenError::DatabaseQuery { .. } => 3,
            ScreenError::InsufficientData { .. } | ScreenError::NumericDomain { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
