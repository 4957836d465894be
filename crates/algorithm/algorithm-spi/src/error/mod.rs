//! Error types for forecasting engines
//!
//! This module provides the [`TsError`] enum and [`Result`] type alias
//! shared by every model implementation.

mod ts_error;

pub use ts_error::{Result, TsError};
