//! Fourier seasonality terms

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A periodic component expressed as a truncated Fourier series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seasonality {
    pub name: String,
    /// Period length in days
    pub period_days: f64,
    /// Number of sine/cosine pairs
    pub fourier_order: usize,
    /// Standard deviation of the Gaussian prior on the Fourier weights
    pub prior_scale: f64,
}

impl Seasonality {
    pub fn new(name: impl Into<String>, period_days: f64, fourier_order: usize, prior_scale: f64) -> Self {
        Self {
            name: name.into(),
            period_days,
            fourier_order,
            prior_scale,
        }
    }

    pub fn yearly(prior_scale: f64) -> Self {
        Self::new("yearly", 365.25, 10, prior_scale)
    }

    pub fn weekly(prior_scale: f64) -> Self {
        Self::new("weekly", 7.0, 3, prior_scale)
    }

    pub fn daily(prior_scale: f64) -> Self {
        Self::new("daily", 1.0, 4, prior_scale)
    }

    /// Number of design columns this component contributes
    pub fn width(&self) -> usize {
        2 * self.fourier_order
    }

    /// Append `sin, cos` pairs for each harmonic at absolute time `days`
    pub fn push_features(&self, days: f64, row: &mut Vec<f64>) {
        for k in 1..=self.fourier_order {
            let angle = 2.0 * PI * k as f64 * days / self.period_days;
            row.push(angle.sin());
            row.push(angle.cos());
        }
    }
}

/// Days since 1970-01-01, the absolute clock the Fourier terms are phased on
pub fn epoch_days(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::default();
    (date - epoch).num_days() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width() {
        assert_eq!(Seasonality::yearly(10.0).width(), 20);
        assert_eq!(Seasonality::weekly(10.0).width(), 6);
        assert_eq!(Seasonality::daily(10.0).width(), 8);
    }

    #[test]
    fn test_features_repeat_each_period() {
        let weekly = Seasonality::weekly(10.0);
        let mut a = Vec::new();
        let mut b = Vec::new();
        weekly.push_features(3.0, &mut a);
        weekly.push_features(10.0, &mut b);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_epoch_days() {
        assert_eq!(epoch_days(NaiveDate::from_ymd_opt(1970, 1, 11).unwrap()), 10.0);
    }
}
