//! Time series error types
//!
//! Defines the error type shared by every forecasting engine.

use thiserror::Error;

/// Result type alias for algorithm operations
pub type Result<T> = std::result::Result<T, TsError>;

/// Errors that can occur while fitting or predicting with a forecasting model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TsError {
    /// Insufficient data points for the operation
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Model has not been fitted yet
    #[error("Model must be fitted before prediction")]
    NotFitted,

    /// Convergence failure during optimization
    #[error("Optimization failed to converge after {iterations} iterations")]
    ConvergenceFailure { iterations: usize },

    /// Numerical computation error (singular system, overflow, ...)
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Invalid time series data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// An order search finished without a single successful fit
    #[error("No candidate model could be fitted to the series")]
    NoCandidateModel,

    /// Date axis and observations disagree in length
    #[error("Date axis has {dates} entries but the series has {values}")]
    AxisMismatch { dates: usize, values: usize },
}

impl TsError {
    /// Shorthand for [`TsError::InvalidParameter`]
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        TsError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
