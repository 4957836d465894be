//! Contract traits for forecasting engines
//!
//! - [`Predictor`]: fit on an ordered series, forecast the next `steps` points
//! - [`CalendarPredictor`]: fit on dated observations, predict for any dates

mod predictor;

pub use predictor::{CalendarPredictor, Predictor};
