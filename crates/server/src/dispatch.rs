//! Forecast dispatch
//!
//! Maps a validated request to one of the forecasting engines and hands back
//! exactly `horizon` values. The engines disagree on inputs (ARIMA only needs
//! the values, the decomposition model needs a date per value) and this is
//! the one place that difference is handled.
//!
//! Dispatch is synchronous and CPU-bound; callers on an async runtime should
//! move it to a blocking thread.

use crate::strategy::Strategy;
use crate::validation::ForecastRequest;
use algorithm_core::prelude::{
    AutoArima, AutoArimaConfig, CalendarPredictor, Predictor, TimeAxis, TrendSeasonalConfig,
    TrendSeasonalModel, TsError,
};
use thiserror::Error;
use tracing::debug;

/// Engine settings applied to every request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchSettings {
    /// Order search bounds for AUTOARIMA
    pub arima: AutoArimaConfig,
    /// Synthetic calendar for PROPHET
    pub axis: TimeAxis,
    /// Trend/seasonality priors for PROPHET
    pub decomposition: TrendSeasonalConfig,
}

/// Forecast values for one request
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub values: Vec<f64>,
}

/// Why a validated request produced no forecast
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("Unsupported model_type '{0}', expected one of AUTOARIMA, SARIMA, PROPHET")]
    UnsupportedStrategy(String),

    #[error("model_type '{0}' is not implemented")]
    NotImplemented(String),

    #[error("Forecast computation failed: {0}")]
    ComputationFailed(String),
}

impl From<TsError> for DispatchError {
    fn from(err: TsError) -> Self {
        DispatchError::ComputationFailed(err.to_string())
    }
}

/// Run the requested strategy
pub fn dispatch(
    request: &ForecastRequest,
    settings: &DispatchSettings,
) -> Result<ForecastResult, DispatchError> {
    let values = match &request.strategy {
        Strategy::AutoArima => auto_arima(&request.series, request.horizon, settings)?,
        Strategy::Prophet => trend_seasonal(&request.series, request.horizon, settings)?,
        Strategy::Sarima => {
            return Err(DispatchError::NotImplemented(
                request.strategy.tag().to_string(),
            ))
        }
        Strategy::Unsupported(tag) => {
            return Err(DispatchError::UnsupportedStrategy(tag.clone()));
        }
    };

    if values.len() != request.horizon {
        return Err(DispatchError::ComputationFailed(format!(
            "model returned {} values for a horizon of {}",
            values.len(),
            request.horizon
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(DispatchError::ComputationFailed(
            "model produced non-finite forecast values".to_string(),
        ));
    }

    Ok(ForecastResult { values })
}

fn auto_arima(
    series: &[f64],
    horizon: usize,
    settings: &DispatchSettings,
) -> Result<Vec<f64>, TsError> {
    let mut model = AutoArima::new(settings.arima)?;
    model.fit(series)?;
    debug!(
        order = ?model.order(),
        fits = model.fits_attempted(),
        "selected ARIMA order"
    );
    model.predict(horizon)
}

fn trend_seasonal(
    series: &[f64],
    horizon: usize,
    settings: &DispatchSettings,
) -> Result<Vec<f64>, TsError> {
    let config = TrendSeasonalConfig {
        yearly_seasonality: true,
        weekly_seasonality: false,
        daily_seasonality: false,
        ..settings.decomposition.clone()
    };
    let mut model = TrendSeasonalModel::new(config)?;

    let dates = settings.axis.extend(series.len(), horizon)?;
    model.fit_dated(&dates[..series.len()], series)?;

    // Predict over history and future, keep only the future part
    let predicted = model.predict_dated(&dates)?;
    let skip = predicted.len().saturating_sub(horizon);
    Ok(predicted[skip..].to_vec())
}
