//! Algorithm Service Provider Interface
//!
//! Defines the traits and error type every forecasting engine adheres to:
//!
//! - [`Predictor`]: index-based models (ARIMA family)
//! - [`CalendarPredictor`]: models fit against a calendar date axis
//! - [`TsError`]: standardized error type for all algorithm operations
//! - [`Result`]: convenient result type alias

pub mod contract;
pub mod error;

// Re-export all public items at crate root for convenience
pub use contract::{CalendarPredictor, Predictor};
pub use error::{Result, TsError};

/// Re-exported so implementors and callers agree on one date type
pub use chrono::NaiveDate;
