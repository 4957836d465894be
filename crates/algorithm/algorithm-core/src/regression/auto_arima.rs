//! Automatic ARIMA order selection
//!
//! Stepwise search in the style of Hyndman & Khandakar (2008):
//!
//! 1. Pick the differencing order `d` with repeated KPSS tests.
//! 2. Fit a small set of starting orders and keep the lowest AIC.
//! 3. Visit the neighbours of the current best order (p±1, q±1, both
//!    together) and move whenever one improves the AIC.
//! 4. Stop when no neighbour improves or the fit budget is spent.
//!
//! Candidates that fail to fit are skipped silently; only a search in which
//! nothing fits is an error.

use super::arima::Arima;
use crate::utils::stationarity::ndiffs;
use algorithm_spi::{Predictor, Result, TsError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Bounds for the stepwise order search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoArimaConfig {
    /// Largest AR order considered
    pub max_p: usize,
    /// Largest MA order considered
    pub max_q: usize,
    /// Largest differencing order considered
    pub max_d: usize,
    /// Largest `p + q` considered
    pub max_order: usize,
    /// Starting AR order of the first candidate
    pub start_p: usize,
    /// Starting MA order of the first candidate
    pub start_q: usize,
    /// Upper bound on model fits per search
    pub max_fits: usize,
}

impl Default for AutoArimaConfig {
    fn default() -> Self {
        Self {
            max_p: 3,
            max_q: 3,
            max_d: 2,
            max_order: 5,
            start_p: 2,
            start_q: 2,
            max_fits: 50,
        }
    }
}

impl AutoArimaConfig {
    fn validate(&self) -> Result<()> {
        if self.max_p > super::arima::MAX_ARMA_ORDER {
            return Err(TsError::invalid_parameter("max_p", "must be <= 10"));
        }
        if self.max_q > super::arima::MAX_ARMA_ORDER {
            return Err(TsError::invalid_parameter("max_q", "must be <= 10"));
        }
        if self.max_d > super::arima::MAX_DIFFERENCING {
            return Err(TsError::invalid_parameter("max_d", "must be <= 2"));
        }
        if self.max_fits == 0 {
            return Err(TsError::invalid_parameter("max_fits", "must be positive"));
        }
        Ok(())
    }
}

/// Non-seasonal ARIMA with automatically selected `(p, d, q)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoArima {
    config: AutoArimaConfig,
    /// Best model found by the last search
    selected: Option<Arima>,
    /// Fits attempted by the last search
    fits: usize,
}

impl Default for AutoArima {
    fn default() -> Self {
        Self {
            config: AutoArimaConfig::default(),
            selected: None,
            fits: 0,
        }
    }
}

impl AutoArima {
    /// Create a searcher with the given bounds
    pub fn new(config: AutoArimaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            selected: None,
            fits: 0,
        })
    }

    /// Search bounds in use
    pub fn config(&self) -> &AutoArimaConfig {
        &self.config
    }

    /// Orders `(p, d, q)` of the selected model
    pub fn order(&self) -> Option<(usize, usize, usize)> {
        self.selected.as_ref().map(Arima::params)
    }

    /// The model chosen by the last successful search
    pub fn selected(&self) -> Option<&Arima> {
        self.selected.as_ref()
    }

    /// Number of candidate fits attempted by the last search
    pub fn fits_attempted(&self) -> usize {
        self.fits
    }

    fn admissible(&self, p: usize, q: usize) -> bool {
        p <= self.config.max_p && q <= self.config.max_q && p + q <= self.config.max_order
    }

    /// Fit one candidate, returning it with its AIC if it succeeds
    fn try_candidate(&mut self, data: &[f64], p: usize, d: usize, q: usize) -> Option<(Arima, f64)> {
        self.fits += 1;
        let mut model = Arima::new(p, d, q).ok()?.with_constant(d < 2);
        model.fit(data).ok()?;
        let aic = model.aic().ok()?;
        aic.is_finite().then_some((model, aic))
    }

    fn neighbours(&self, p: usize, q: usize) -> Vec<(usize, usize)> {
        let steps: [(isize, isize); 8] = [
            (-1, 0),
            (1, 0),
            (0, -1),
            (0, 1),
            (-1, -1),
            (1, 1),
            (-1, 1),
            (1, -1),
        ];
        steps
            .iter()
            .filter_map(|&(dp, dq)| {
                let np = p.checked_add_signed(dp)?;
                let nq = q.checked_add_signed(dq)?;
                self.admissible(np, nq).then_some((np, nq))
            })
            .collect()
    }
}

impl Predictor for AutoArima {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        if data.iter().any(|x| !x.is_finite()) {
            return Err(TsError::InvalidData(
                "Data contains NaN or infinite values".to_string(),
            ));
        }

        self.selected = None;
        self.fits = 0;

        let d = ndiffs(data, self.config.max_d);
        let start = (
            self.config.start_p.min(self.config.max_p),
            self.config.start_q.min(self.config.max_q),
        );
        let mut visited = BTreeSet::new();
        let mut best: Option<(Arima, f64)> = None;

        for (p, q) in [start, (0, 0), (1, 0), (0, 1)] {
            if !self.admissible(p, q) || !visited.insert((p, q)) {
                continue;
            }
            if let Some((model, aic)) = self.try_candidate(data, p, d, q) {
                if best.as_ref().map_or(true, |(_, best_aic)| aic < *best_aic) {
                    best = Some((model, aic));
                }
            }
        }

        let (mut model, mut aic) = best.ok_or(TsError::NoCandidateModel)?;

        'search: while self.fits < self.config.max_fits {
            let (p, _, q) = model.params();
            for (np, nq) in self.neighbours(p, q) {
                if self.fits >= self.config.max_fits {
                    break 'search;
                }
                if !visited.insert((np, nq)) {
                    continue;
                }
                if let Some((candidate, candidate_aic)) = self.try_candidate(data, np, d, nq) {
                    if candidate_aic < aic {
                        model = candidate;
                        aic = candidate_aic;
                        continue 'search;
                    }
                }
            }
            break;
        }

        self.selected = Some(model);
        Ok(())
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        self.selected
            .as_ref()
            .ok_or(TsError::NotFitted)?
            .predict(steps)
    }

    fn is_fitted(&self) -> bool {
        self.selected.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_ar1(phi: f64, n: usize) -> Vec<f64> {
        let mut state: u64 = 7;
        let mut x = 0.0;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                let noise = (state >> 33) as f64 / (1u64 << 31) as f64 - 0.5;
                x = phi * x + noise;
                10.0 + x
            })
            .collect()
    }

    #[test]
    fn test_invalid_config() {
        let config = AutoArimaConfig {
            max_d: 3,
            ..AutoArimaConfig::default()
        };
        assert!(AutoArima::new(config).is_err());
    }

    #[test]
    fn test_linear_series_selects_drift_model() {
        let data: Vec<f64> = (1..=12).map(|x| x as f64).collect();
        let mut model = AutoArima::default();
        model.fit(&data).unwrap();

        let (_, d, _) = model.order().unwrap();
        assert_eq!(d, 1);

        let forecast = model.predict(3).unwrap();
        assert_eq!(forecast.len(), 3);
        for (got, want) in forecast.iter().zip([13.0, 14.0, 15.0]) {
            assert!((got - want).abs() < 1e-6, "{got} vs {want}");
        }
    }

    #[test]
    fn test_constant_series_forecasts_constant() {
        let data = vec![5.0; 15];
        let mut model = AutoArima::default();
        model.fit(&data).unwrap();
        for value in model.predict(4).unwrap() {
            assert!((value - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_orders_stay_within_bounds() {
        let data = noisy_ar1(0.7, 150);
        let mut model = AutoArima::default();
        model.fit(&data).unwrap();
        let (p, d, q) = model.order().unwrap();
        assert!(p <= 3 && q <= 3 && d <= 2);
        assert!(p + q <= 5);
        assert!(model.fits_attempted() <= model.config().max_fits);
    }

    #[test]
    fn test_search_is_deterministic() {
        let data = noisy_ar1(0.5, 60);
        let mut first = AutoArima::default();
        let mut second = AutoArima::default();
        first.fit(&data).unwrap();
        second.fit(&data).unwrap();
        assert_eq!(first.order(), second.order());
        assert_eq!(first.predict(5).unwrap(), second.predict(5).unwrap());
    }

    #[test]
    fn test_fit_budget_is_respected() {
        let config = AutoArimaConfig {
            max_fits: 2,
            ..AutoArimaConfig::default()
        };
        let mut model = AutoArima::new(config).unwrap();
        model.fit(&noisy_ar1(0.5, 80)).unwrap();
        assert!(model.fits_attempted() <= 4);
    }

    #[test]
    fn test_too_short_series_has_no_candidate() {
        let mut model = AutoArima::default();
        assert_eq!(model.fit(&[1.0, 2.0, 3.0]), Err(TsError::NoCandidateModel));
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_predict_before_fit() {
        let model = AutoArima::default();
        assert_eq!(model.predict(2), Err(TsError::NotFitted));
    }

    #[test]
    fn test_huge_magnitudes_are_fitted() {
        let data: Vec<f64> = (1..=12).map(|x| x as f64 * 1e300).collect();
        let mut model = AutoArima::default();
        model.fit(&data).unwrap();

        let forecast = model.predict(3).unwrap();
        for (got, want) in forecast.iter().zip([13e300, 14e300, 15e300]) {
            assert!(((got - want) / want).abs() < 1e-6);
        }
    }
}
