//! Additive trend + seasonality model fit against a calendar axis
//!
//! ```text
//! y(t) = g(t) + s(t)
//! g(t) = k·t + m + Σ δ_j · max(0, t − c_j)      piecewise-linear trend
//! s(t) = Σ_k a_k sin(2πk·d/P) + b_k cos(2πk·d/P)  per enabled seasonality
//! ```
//!
//! `t` is time rescaled to `[0, 1]` over the history, `d` is absolute days
//! since the epoch and `y` is divided by its largest magnitude before fitting.
//! Changepoints `c_j` are spread evenly over the first part of the history.
//!
//! Weights are the maximum a posteriori estimate under independent Gaussian
//! priors (tight on changepoint deltas, loose on Fourier weights), which is a
//! weighted ridge regression. The noise variance that sets the ridge strength
//! is re-estimated from the residuals for a few rounds.
//!
//! Beyond the history the trend keeps its final slope and the seasonal terms
//! keep cycling.

use super::seasonality::{epoch_days, Seasonality};
use crate::utils::{linalg, scaling};
use algorithm_spi::{CalendarPredictor, NaiveDate, Result, TsError};
use serde::{Deserialize, Serialize};

/// Smallest noise variance (in scaled units) used to set the ridge strength
const MIN_NOISE_VARIANCE: f64 = 1e-3;
/// Standard deviation of the prior on the base growth rate
const SLOPE_PRIOR_SCALE: f64 = 5.0;

/// Tuning knobs for [`TrendSeasonalModel`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeasonalConfig {
    /// Upper bound on trend changepoints
    pub n_changepoints: usize,
    /// Fraction of the history in which changepoints may fall
    pub changepoint_range: f64,
    /// Prior scale of changepoint rate adjustments; smaller is stiffer
    pub changepoint_prior_scale: f64,
    /// Prior scale of Fourier weights; smaller is smoother
    pub seasonality_prior_scale: f64,
    pub yearly_seasonality: bool,
    pub weekly_seasonality: bool,
    pub daily_seasonality: bool,
    /// Rounds of noise re-estimation
    pub map_iterations: usize,
}

impl Default for TrendSeasonalConfig {
    fn default() -> Self {
        Self {
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            yearly_seasonality: true,
            weekly_seasonality: false,
            daily_seasonality: false,
            map_iterations: 4,
        }
    }
}

/// Trend and seasonal parts of a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Components {
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
}

impl Components {
    /// Element-wise `trend + seasonal`
    pub fn total(&self) -> Vec<f64> {
        self.trend
            .iter()
            .zip(&self.seasonal)
            .map(|(t, s)| t + s)
            .collect()
    }
}

/// Piecewise-linear trend plus Fourier seasonality
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendSeasonalModel {
    config: TrendSeasonalConfig,
    seasonalities: Vec<Seasonality>,
    /// Absolute day of the first observation
    start_days: f64,
    /// Days spanned by the history
    span_days: f64,
    /// Divisor applied to the observations
    y_scale: f64,
    /// Changepoint locations in scaled time
    changepoints: Vec<f64>,
    /// Intercept, slope, changepoint deltas, then Fourier weights
    weights: Vec<f64>,
    /// Noise variance in scaled units
    sigma2: f64,
    fitted: bool,
}

impl Default for TrendSeasonalModel {
    fn default() -> Self {
        Self::from_config(TrendSeasonalConfig::default())
    }
}

impl TrendSeasonalModel {
    /// Create a model, validating the configuration
    pub fn new(config: TrendSeasonalConfig) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.changepoint_range) {
            return Err(TsError::invalid_parameter(
                "changepoint_range",
                "must be within [0, 1]",
            ));
        }
        if !(config.changepoint_prior_scale > 0.0) {
            return Err(TsError::invalid_parameter(
                "changepoint_prior_scale",
                "must be positive",
            ));
        }
        if !(config.seasonality_prior_scale > 0.0) {
            return Err(TsError::invalid_parameter(
                "seasonality_prior_scale",
                "must be positive",
            ));
        }
        Ok(Self::from_config(config))
    }

    fn from_config(config: TrendSeasonalConfig) -> Self {
        let scale = config.seasonality_prior_scale;
        let mut seasonalities = Vec::new();
        if config.yearly_seasonality {
            seasonalities.push(Seasonality::yearly(scale));
        }
        if config.weekly_seasonality {
            seasonalities.push(Seasonality::weekly(scale));
        }
        if config.daily_seasonality {
            seasonalities.push(Seasonality::daily(scale));
        }
        Self {
            config,
            seasonalities,
            start_days: 0.0,
            span_days: 1.0,
            y_scale: 1.0,
            changepoints: Vec::new(),
            weights: Vec::new(),
            sigma2: 0.0,
            fitted: false,
        }
    }

    /// Add a custom seasonality before fitting
    pub fn add_seasonality(mut self, seasonality: Seasonality) -> Self {
        self.seasonalities.push(seasonality);
        self
    }

    pub fn config(&self) -> &TrendSeasonalConfig {
        &self.config
    }

    /// Enabled seasonal components, in design order
    pub fn seasonalities(&self) -> &[Seasonality] {
        &self.seasonalities
    }

    /// Changepoint dates' positions in scaled time
    pub fn changepoints(&self) -> &[f64] {
        &self.changepoints
    }

    /// Residual noise standard deviation on the original scale
    pub fn noise_std(&self) -> Option<f64> {
        self.fitted.then(|| self.sigma2.sqrt() * self.y_scale)
    }

    fn scaled_time(&self, date: NaiveDate) -> f64 {
        (epoch_days(date) - self.start_days) / self.span_days
    }

    fn trend_width(&self) -> usize {
        2 + self.changepoints.len()
    }

    fn design_row(&self, date: NaiveDate) -> Vec<f64> {
        let t = self.scaled_time(date);
        let days = epoch_days(date);
        let mut row = Vec::with_capacity(self.trend_width() + self.seasonal_width());
        row.push(1.0);
        row.push(t);
        row.extend(self.changepoints.iter().map(|c| (t - c).max(0.0)));
        for seasonality in &self.seasonalities {
            seasonality.push_features(days, &mut row);
        }
        row
    }

    fn seasonal_width(&self) -> usize {
        self.seasonalities.iter().map(Seasonality::width).sum()
    }

    fn prior_precision(&self) -> Vec<f64> {
        let mut precision = vec![0.0, 1.0 / SLOPE_PRIOR_SCALE.powi(2)];
        precision.extend(
            self.changepoints
                .iter()
                .map(|_| 1.0 / self.config.changepoint_prior_scale.powi(2)),
        );
        for seasonality in &self.seasonalities {
            let p = 1.0 / seasonality.prior_scale.powi(2);
            precision.extend(std::iter::repeat(p).take(seasonality.width()));
        }
        precision
    }

    /// Changepoints at evenly spaced history indices, excluding the first
    fn place_changepoints(&self, t: &[f64]) -> Vec<f64> {
        let n = t.len();
        let hist_size = (n as f64 * self.config.changepoint_range).floor() as usize;
        let count = self.config.n_changepoints.min(hist_size.saturating_sub(1));
        if count == 0 {
            return Vec::new();
        }
        let last = (hist_size - 1) as f64;
        (1..=count)
            .map(|i| {
                let idx = (last * i as f64 / count as f64).round() as usize;
                t[idx.min(n - 1)]
            })
            .collect()
    }

    /// Trend and seasonal contributions at each date, on the original scale
    pub fn decompose(&self, dates: &[NaiveDate]) -> Result<Components> {
        if !self.fitted {
            return Err(TsError::NotFitted);
        }
        let split = self.trend_width();
        let mut trend = Vec::with_capacity(dates.len());
        let mut seasonal = Vec::with_capacity(dates.len());
        for &date in dates {
            let row = self.design_row(date);
            trend.push(linalg::dot(&row[..split], &self.weights[..split]) * self.y_scale);
            seasonal.push(linalg::dot(&row[split..], &self.weights[split..]) * self.y_scale);
        }
        Ok(Components { trend, seasonal })
    }
}

impl CalendarPredictor for TrendSeasonalModel {
    fn fit_dated(&mut self, dates: &[NaiveDate], values: &[f64]) -> Result<()> {
        if dates.len() != values.len() {
            return Err(TsError::AxisMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }
        if values.len() < 2 {
            return Err(TsError::InsufficientData {
                required: 2,
                actual: values.len(),
            });
        }
        if values.iter().any(|x| !x.is_finite()) {
            return Err(TsError::InvalidData(
                "Data contains NaN or infinite values".to_string(),
            ));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TsError::InvalidData(
                "dates must be strictly increasing".to_string(),
            ));
        }

        self.fitted = false;
        self.y_scale = scaling::magnitude(values);
        self.start_days = epoch_days(dates[0]);
        self.span_days = epoch_days(dates[dates.len() - 1]) - self.start_days;

        let t: Vec<f64> = dates.iter().map(|&d| self.scaled_time(d)).collect();
        self.changepoints = self.place_changepoints(&t);

        let design: Vec<Vec<f64>> = dates.iter().map(|&d| self.design_row(d)).collect();
        let target = scaling::rescale(values, self.y_scale);
        let precision = self.prior_precision();

        let n = target.len() as f64;
        let mut sigma2 = target.iter().map(|y| y * y).sum::<f64>() / n;
        sigma2 = sigma2.max(MIN_NOISE_VARIANCE);
        let mut weights = Vec::new();
        for _ in 0..self.config.map_iterations.max(1) {
            let penalty: Vec<f64> = precision.iter().map(|p| p * sigma2).collect();
            weights = linalg::penalized_least_squares(&design, &target, &penalty)?;
            let ssr: f64 = design
                .iter()
                .zip(&target)
                .map(|(row, y)| (y - linalg::dot(row, &weights)).powi(2))
                .sum();
            sigma2 = (ssr / n).max(MIN_NOISE_VARIANCE);
        }

        self.weights = weights;
        self.sigma2 = sigma2;
        self.fitted = true;
        Ok(())
    }

    fn predict_dated(&self, dates: &[NaiveDate]) -> Result<Vec<f64>> {
        Ok(self.decompose(dates)?.total())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
