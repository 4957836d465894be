//! ARIMA (AutoRegressive Integrated Moving Average) implementation
//!
//! The model combines three components:
//!
//! - **AR (AutoRegressive)**: Uses past values to predict future values
//! - **I (Integrated)**: Differencing to achieve stationarity
//! - **MA (Moving Average)**: Uses past forecast errors
//!
//! On the differenced series `w` with mean `μ` the model is
//!
//! ```text
//! (w_t − μ) = Σ φ_j (w_{t−j} − μ) + e_t + Σ θ_j e_{t−j}
//! ```
//!
//! Pure AR orders are estimated with Yule-Walker (Levinson-Durbin). Orders
//! with MA terms use the two-stage Hannan-Rissanen regression: a long AR fit
//! supplies proxy innovations, then `w` is regressed on its own lags and the
//! lagged innovations. Residuals are conditional sums of squares, which is
//! also what [`Arima::aic`] is computed from.
//!
//! ## Example
//!
//! ```rust
//! use algorithm_core::prelude::*;
//!
//! let data: Vec<f64> = (1..=20).map(|x| x as f64).collect();
//! let mut model = Arima::new(1, 1, 0).unwrap();
//! model.fit(&data).unwrap();
//! let forecast = model.predict(3).unwrap();
//! assert_eq!(forecast.len(), 3);
//! ```

use crate::utils::{linalg, scaling};
use crate::utils::stationarity::difference;
use algorithm_spi::{Predictor, Result, TsError};
use serde::{Deserialize, Serialize};

/// Largest accepted AR or MA order
pub const MAX_ARMA_ORDER: usize = 10;
/// Largest accepted differencing order
pub const MAX_DIFFERENCING: usize = 2;

/// Floor on the innovation variance so a perfect fit still has a finite AIC
const MIN_SIGMA2: f64 = 1e-10;

/// ARIMA model for time series forecasting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arima {
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// MA order (q)
    q: usize,
    /// Whether the differenced series has a non-zero mean (drift when d = 1)
    with_constant: bool,
    /// AR coefficients
    ar_coeffs: Vec<f64>,
    /// MA coefficients
    ma_coeffs: Vec<f64>,
    /// Mean of the differenced series
    mean: f64,
    /// Last value at each differencing level, used to integrate forecasts
    tails: Vec<f64>,
    /// Differenced series, centered
    centered: Vec<f64>,
    /// In-sample innovations
    residuals: Vec<f64>,
    /// Innovation variance, in units of `scale`
    sigma2: f64,
    /// Magnitude the series was divided by before fitting
    scale: f64,
    /// Whether the model has been fitted
    fitted: bool,
}

impl Arima {
    /// Create a new ARIMA model with specified orders
    ///
    /// # Arguments
    ///
    /// * `p` - Order of autoregressive component (0-10)
    /// * `d` - Degree of differencing (0-2)
    /// * `q` - Order of moving average component (0-10)
    ///
    /// The model includes a constant unless disabled with
    /// [`Arima::with_constant`].
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        if p > MAX_ARMA_ORDER {
            return Err(TsError::invalid_parameter("p", "AR order must be <= 10"));
        }
        if d > MAX_DIFFERENCING {
            return Err(TsError::invalid_parameter(
                "d",
                "Differencing order must be <= 2",
            ));
        }
        if q > MAX_ARMA_ORDER {
            return Err(TsError::invalid_parameter("q", "MA order must be <= 10"));
        }

        Ok(Self {
            p,
            d,
            q,
            with_constant: true,
            ar_coeffs: vec![0.0; p],
            ma_coeffs: vec![0.0; q],
            mean: 0.0,
            tails: Vec::new(),
            centered: Vec::new(),
            residuals: Vec::new(),
            sigma2: 0.0,
            scale: 1.0,
            fitted: false,
        })
    }

    /// Include or drop the constant term
    pub fn with_constant(mut self, with_constant: bool) -> Self {
        self.with_constant = with_constant;
        self
    }

    /// Minimum number of observations needed to fit this order
    pub fn min_observations(&self) -> usize {
        self.d + self.p + self.q + 8
    }

    /// Get model orders as `(p, d, q)`
    pub fn params(&self) -> (usize, usize, usize) {
        (self.p, self.d, self.q)
    }

    /// Whether the model carries a constant term
    pub fn has_constant(&self) -> bool {
        self.with_constant
    }

    /// Get AR coefficients
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coeffs
    }

    /// Get MA coefficients
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coeffs
    }

    /// Innovation variance of the fitted model, in the units of the data
    pub fn sigma2(&self) -> f64 {
        self.sigma2 * self.scale * self.scale
    }

    /// Number of residuals the likelihood is conditioned on
    fn effective_observations(&self) -> usize {
        self.centered.len() - self.p
    }

    /// Akaike information criterion of the conditional-sum-of-squares fit
    pub fn aic(&self) -> Result<f64> {
        if !self.fitted {
            return Err(TsError::NotFitted);
        }
        let n = self.effective_observations() as f64;
        let k = (self.p + self.q + usize::from(self.with_constant) + 1) as f64;
        // ln σ² in data units, without forming scale² (it overflows for large series)
        let log_sigma2 = self.sigma2.ln() + 2.0 * self.scale.ln();
        let log_likelihood = -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + log_sigma2 + 1.0);
        Ok(2.0 * k - 2.0 * log_likelihood)
    }

    /// Conditional-sum-of-squares innovations for the given coefficients
    fn innovations(centered: &[f64], phi: &[f64], theta: &[f64]) -> Vec<f64> {
        let p = phi.len();
        let mut residuals = vec![0.0; centered.len()];
        for t in p..centered.len() {
            let mut fitted = 0.0;
            for (j, coeff) in phi.iter().enumerate() {
                fitted += coeff * centered[t - j - 1];
            }
            for (j, coeff) in theta.iter().enumerate() {
                if t > j {
                    fitted += coeff * residuals[t - j - 1];
                }
            }
            residuals[t] = centered[t] - fitted;
        }
        residuals
    }

    /// Hannan-Rissanen estimates of `(φ, θ)` for a centered series
    fn hannan_rissanen(centered: &[f64], p: usize, q: usize) -> Result<(Vec<f64>, Vec<f64>)> {
        let n = centered.len();
        let long_order = (p + q + 2).min(n / 3).max(1);
        let long_ar = yule_walker(centered, long_order);
        let proxy = Self::innovations(centered, &long_ar, &[]);

        let start = p.max(long_order + q);
        let rows = n.saturating_sub(start);
        if rows <= p + q {
            return Err(TsError::InsufficientData {
                required: start + p + q + 1,
                actual: n,
            });
        }

        let design: Vec<Vec<f64>> = (start..n)
            .map(|t| {
                (1..=p)
                    .map(|j| centered[t - j])
                    .chain((1..=q).map(|j| proxy[t - j]))
                    .collect()
            })
            .collect();
        let target = &centered[start..];
        let beta = linalg::penalized_least_squares(&design, target, &vec![0.0; p + q])?;
        let (phi, theta) = beta.split_at(p);
        Ok((phi.to_vec(), theta.to_vec()))
    }

    /// Integrate forecasts on the differenced scale back to the original scale
    fn undifference(&self, forecasts: &[f64]) -> Vec<f64> {
        let mut result = forecasts.to_vec();
        for level in (0..self.d).rev() {
            let mut running = self.tails[level];
            for value in result.iter_mut() {
                running += *value;
                *value = running;
            }
        }
        result
    }
}

/// Yule-Walker AR coefficients via the Levinson-Durbin recursion
///
/// Returns zeros for a series with no variance.
pub(crate) fn yule_walker(centered: &[f64], order: usize) -> Vec<f64> {
    let n = centered.len();
    let mut phi = vec![0.0; order];
    if order == 0 || n <= order {
        return phi;
    }

    let autocov: Vec<f64> = (0..=order)
        .map(|k| {
            centered[k..]
                .iter()
                .zip(centered)
                .map(|(a, b)| a * b)
                .sum::<f64>()
                / n as f64
        })
        .collect();
    if autocov[0].abs() < 1e-12 {
        return phi;
    }

    let mut error = autocov[0];
    for m in 1..=order {
        let acc = autocov[m] - (1..m).map(|j| phi[j - 1] * autocov[m - j]).sum::<f64>();
        let reflection = acc / error;
        let previous = phi.clone();
        phi[m - 1] = reflection;
        for j in 1..m {
            phi[j - 1] = previous[j - 1] - reflection * previous[m - j - 1];
        }
        error *= 1.0 - reflection * reflection;
        if error <= 1e-12 {
            break;
        }
    }
    phi
}

/// Whether `1 − Σ c_j z^j` has all roots outside the unit circle
///
/// Runs the step-down (Schur-Cohn) recursion on the reflection coefficients.
pub(crate) fn is_stable(coeffs: &[f64]) -> bool {
    let mut current = coeffs.to_vec();
    while let Some(&k) = current.last() {
        if k.abs() >= 1.0 {
            return false;
        }
        let m = current.len();
        let denom = 1.0 - k * k;
        current = (0..m - 1)
            .map(|j| (current[j] + k * current[m - 2 - j]) / denom)
            .collect();
    }
    true
}

/// Shrink polynomial coefficients geometrically until `is_stable` holds
fn stabilize(coeffs: &mut [f64], negate: bool) {
    let sign = if negate { -1.0 } else { 1.0 };
    for _ in 0..200 {
        let probe: Vec<f64> = coeffs.iter().map(|c| sign * c).collect();
        if is_stable(&probe) {
            return;
        }
        let mut factor = 1.0;
        for c in coeffs.iter_mut() {
            factor *= 0.95;
            *c *= factor;
        }
    }
    coeffs.iter_mut().for_each(|c| *c = 0.0);
}

impl Predictor for Arima {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        let min_required = self.min_observations();
        if data.len() < min_required {
            return Err(TsError::InsufficientData {
                required: min_required,
                actual: data.len(),
            });
        }

        // Check for invalid values
        if data.iter().any(|x| !x.is_finite()) {
            return Err(TsError::InvalidData(
                "Data contains NaN or infinite values".to_string(),
            ));
        }

        self.fitted = false;
        self.scale = scaling::magnitude(data);
        let data = scaling::rescale(data, self.scale);
        self.tails = (0..self.d)
            .map(|level| {
                let series = difference(&data, level);
                series[series.len() - 1]
            })
            .collect();

        let differenced = difference(&data, self.d);
        self.mean = if self.with_constant {
            differenced.iter().sum::<f64>() / differenced.len() as f64
        } else {
            0.0
        };
        self.centered = differenced.iter().map(|x| x - self.mean).collect();

        let (mut phi, mut theta) = if self.q == 0 {
            (yule_walker(&self.centered, self.p), Vec::new())
        } else {
            Self::hannan_rissanen(&self.centered, self.p, self.q)?
        };
        stabilize(&mut phi, false);
        // MA polynomial is 1 + Σ θ_j z^j
        stabilize(&mut theta, true);

        self.residuals = Self::innovations(&self.centered, &phi, &theta);
        self.ar_coeffs = phi;
        self.ma_coeffs = theta;

        let n_eff = self.effective_observations();
        let ssr: f64 = self.residuals[self.p..].iter().map(|e| e * e).sum();
        let sigma2 = ssr / n_eff as f64;
        if !sigma2.is_finite() {
            return Err(TsError::NumericalError(
                "residual variance is not finite".to_string(),
            ));
        }
        self.sigma2 = sigma2.max(MIN_SIGMA2);

        self.fitted = true;
        Ok(())
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(TsError::NotFitted);
        }

        if steps == 0 {
            return Ok(Vec::new());
        }

        let n = self.centered.len();
        let mut extended = self.centered.clone();
        let mut extended_residuals = self.residuals.clone();

        // Generate forecasts on the centered, differenced scale
        for _ in 0..steps {
            let t = extended.len();
            let mut forecast = 0.0;

            // AR component
            for (j, coeff) in self.ar_coeffs.iter().enumerate() {
                forecast += coeff * extended[t - j - 1];
            }

            // MA component
            for (j, coeff) in self.ma_coeffs.iter().enumerate() {
                if t > j {
                    forecast += coeff * extended_residuals[t - j - 1];
                }
            }

            extended.push(forecast);
            extended_residuals.push(0.0); // Future innovations are 0
        }

        let forecasts: Vec<f64> = extended[n..].iter().map(|x| x + self.mean).collect();
        Ok(self
            .undifference(&forecasts)
            .into_iter()
            .map(|x| x * self.scale)
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}
