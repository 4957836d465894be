//! ARIMA family models for time series forecasting
//!
//! ## Algorithms
//!
//! - **ARIMA**: AutoRegressive Integrated Moving Average with fixed orders
//! - **AutoARIMA**: stepwise order selection over non-seasonal ARIMA

pub mod arima;
pub mod auto_arima;

pub use arima::Arima;
pub use auto_arima::{AutoArima, AutoArimaConfig};
