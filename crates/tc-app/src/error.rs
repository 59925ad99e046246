//! Error types for the tc-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and gives front ends a single error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Cycle error: {0}")]
    Cycle(#[from] tc_cycles::CycleError),

    #[error("Cache error: {0}")]
    Cache(#[from] tc_cache::CacheError),

    #[error("Failed to read input file: {path}")]
    InputFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid engine options: {what}")]
    Options { what: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<tc_fluids::FluidError> for AppError {
    fn from(err: tc_fluids::FluidError) -> Self {
        AppError::Cycle(err.into())
    }
}

impl AppError {
    /// The cycle-level error, if this is one.
    pub fn as_cycle_error(&self) -> Option<&tc_cycles::CycleError> {
        match self {
            AppError::Cycle(err) => Some(err),
            _ => None,
        }
    }
}
