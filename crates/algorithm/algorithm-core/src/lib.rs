//! Algorithm Core Implementations
//!
//! Forecasting engines behind the [`Predictor`] and [`CalendarPredictor`]
//! contracts, organized by category:
//!
//! - [`regression`]: ARIMA and automatic ARIMA order selection
//! - [`decomposition`]: trend + seasonality model on a calendar axis
//! - [`utils`]: linear algebra, stationarity tests, differencing
//!
//! ## Example
//!
//! ```rust
//! use algorithm_core::prelude::*;
//!
//! let data: Vec<f64> = (1..=20).map(|x| x as f64).collect();
//! let mut model = AutoArima::default();
//! model.fit(&data).unwrap();
//! let forecast = model.predict(3).unwrap();
//! assert_eq!(forecast.len(), 3);
//! ```

pub mod decomposition;
pub mod regression;
pub mod utils;

// Re-export from SPI
pub use algorithm_spi::{CalendarPredictor, NaiveDate, Predictor, Result, TsError};

// Re-export implementations for convenience
pub use decomposition::*;
pub use regression::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use algorithm_spi::{CalendarPredictor, Predictor};
    // Regression
    pub use crate::regression::{Arima, AutoArima, AutoArimaConfig};
    // Decomposition
    pub use crate::decomposition::{
        Cadence, Components, Seasonality, TimeAxis, TrendSeasonalConfig, TrendSeasonalModel,
    };
    // Error types
    pub use algorithm_spi::{NaiveDate, Result, TsError};
}
