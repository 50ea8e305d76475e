use std::path::PathBuf;

/// Every failure a planner operation can report.
///
/// Validation variants are raised before any state changes. Store and
/// generator variants carry enough context to log, but the generation
/// facade never shows their detail to the operator.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("Budget cannot be negative.")]
    NegativeBudget { amount: f64 },

    #[error("Budget must be a finite number.")]
    NonFiniteBudget,

    #[error("Number of days before the event cannot be negative.")]
    NegativeDayOffset { days: i64 },

    #[error("Number of days before the event is too large: {days}")]
    DayOffsetOutOfRange { days: i64 },

    #[error("{field} cannot be empty.")]
    EmptyField { field: &'static str },

    #[error("Invalid service type '{value}'. Please choose from venue, caterer, or entertainment.")]
    InvalidServiceType { value: String },

    #[error("Invalid format for updating preferences. Use 'key, value'.")]
    InvalidPreference { input: String },

    #[error("Guest '{name}' is already in the guest list.")]
    GuestAlreadyPresent { name: String },

    #[error("Guest '{name}' not found in the list.")]
    GuestNotFound { name: String },

    #[error("Photo '{}' not found.", .path.display())]
    PhotoNotFound { path: PathBuf },

    #[error("Failed to read plan file {path}: {detail}")]
    StoreReadFailed { path: PathBuf, detail: String },

    #[error("Failed to write plan file {path}: {detail}")]
    StoreWriteFailed { path: PathBuf, detail: String },

    #[error("Text generator command '{cmd}' not found on PATH")]
    GeneratorNotFound { cmd: String },

    #[error("Text generator failed to start: {detail}")]
    GenerateSpawnFailed { detail: String },

    #[error("Text generator timed out after {timeout_sec}s")]
    GenerateTimedOut { timeout_sec: u64 },

    #[error("Text generator exited with code {exit_code:?}")]
    GenerateNonZeroExit {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to parse environment variable '{var}': {detail}")]
    ConfigEnvParseError { var: String, detail: String },
}

impl PlannerError {
    /// `true` for rejections of bad input; these never touch the plan file.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PlannerError::NegativeBudget { .. }
                | PlannerError::NonFiniteBudget
                | PlannerError::NegativeDayOffset { .. }
                | PlannerError::DayOffsetOutOfRange { .. }
                | PlannerError::EmptyField { .. }
                | PlannerError::InvalidServiceType { .. }
                | PlannerError::InvalidPreference { .. }
        )
    }
}
