//! Predictor traits for forecasting engines
//!
//! Two shapes of model exist: those that only see an ordered sequence of
//! observations ([`Predictor`]) and those that reason in calendar time and
//! need a date for every observation ([`CalendarPredictor`]).

use crate::error::Result;
use chrono::NaiveDate;

/// Common trait for index-based time series predictors
///
/// Follows the fit-predict pattern: fit on history, then forecast
/// `steps` points past the end of it.
///
/// # Example
///
/// ```rust,ignore
/// use algorithm_spi::Predictor;
///
/// fn forecast<P: Predictor>(predictor: &mut P, data: &[f64], horizon: usize) -> algorithm_spi::Result<Vec<f64>> {
///     predictor.fit(data)?;
///     predictor.predict(horizon)
/// }
/// ```
pub trait Predictor: Send + Sync {
    /// Fit the model to historical data
    fn fit(&mut self, data: &[f64]) -> Result<()>;

    /// Predict `steps` values past the end of the fitted history
    fn predict(&self, steps: usize) -> Result<Vec<f64>>;

    /// Check if the model has been fitted
    fn is_fitted(&self) -> bool;
}

/// Trait for predictors whose features are derived from calendar dates
///
/// `dates` and `values` passed to [`CalendarPredictor::fit_dated`] must have
/// the same length; prediction may be requested for any dates, in-sample or not.
pub trait CalendarPredictor: Send + Sync {
    /// Fit the model to dated observations
    fn fit_dated(&mut self, dates: &[NaiveDate], values: &[f64]) -> Result<()>;

    /// Predict one value per requested date
    fn predict_dated(&self, dates: &[NaiveDate]) -> Result<Vec<f64>>;

    /// Check if the model has been fitted
    fn is_fitted(&self) -> bool;
}
