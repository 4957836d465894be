//! Stationarity testing and differencing
//!
//! The KPSS test takes stationarity as its null hypothesis: a large statistic
//! means the series wanders and should be differenced.

use super::scaling;

/// KPSS critical value for level stationarity at the 5% level
pub const KPSS_CRITICAL_5PCT: f64 = 0.463;

/// KPSS statistic for level stationarity
///
/// Uses a Bartlett-weighted Newey-West long-run variance with
/// `trunc(3·√n / 13)` lags. A constant series is reported as `0.0`.
pub fn kpss_level(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    let resid: Vec<f64> = data.iter().map(|x| x - mean).collect();

    let mut partial = 0.0;
    let mut eta = 0.0;
    for e in &resid {
        partial += e;
        eta += partial * partial;
    }
    eta /= nf * nf;

    let lags = (3.0 * nf.sqrt() / 13.0).trunc() as usize;
    let mut long_run = resid.iter().map(|e| e * e).sum::<f64>() / nf;
    for lag in 1..=lags.min(n - 1) {
        let weight = 1.0 - lag as f64 / (lags as f64 + 1.0);
        let cov: f64 = resid[lag..]
            .iter()
            .zip(&resid[..n - lag])
            .map(|(a, b)| a * b)
            .sum::<f64>()
            / nf;
        long_run += 2.0 * weight * cov;
    }

    if long_run <= 1e-12 {
        return 0.0;
    }
    eta / long_run
}

/// Apply `order` rounds of first differencing
pub fn difference(data: &[f64], order: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Estimate how many differences make the series level-stationary
///
/// Differences until KPSS no longer rejects at 5%, the series becomes
/// constant, it gets too short to test, or `max_d` is reached.
pub fn ndiffs(data: &[f64], max_d: usize) -> usize {
    let mut d = 0;
    let mut current = scaling::rescale(data, scaling::magnitude(data));
    while d < max_d && current.len() > 3 && kpss_level(&current) > KPSS_CRITICAL_5PCT {
        current = difference(&current, 1);
        d += 1;
        if is_constant(&current) {
            break;
        }
    }
    d
}

fn is_constant(data: &[f64]) -> bool {
    match data.first() {
        Some(first) => data.iter().all(|x| (x - first).abs() < 1e-12),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difference_first_order() {
        assert_eq!(difference(&[1.0, 4.0, 9.0, 16.0], 1), vec![3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_difference_second_order() {
        assert_eq!(difference(&[1.0, 4.0, 9.0, 16.0], 2), vec![2.0, 2.0]);
    }

    #[test]
    fn test_kpss_constant_is_zero() {
        assert_eq!(kpss_level(&[5.0; 20]), 0.0);
    }

    #[test]
    fn test_kpss_linear_trend_rejects() {
        let trend: Vec<f64> = (1..=12).map(|x| x as f64).collect();
        // Hand computed: eta = 2073.5 / 144, long-run variance = 143 / 12
        let stat = kpss_level(&trend);
        assert!((stat - (2073.5 / 144.0) / (143.0 / 12.0)).abs() < 1e-9);
        assert!(stat > KPSS_CRITICAL_5PCT);
    }

    #[test]
    fn test_kpss_periodic_series_accepts() {
        let data: Vec<f64> = (0..40).map(|i| [1.0, 2.0, 1.0, 0.0][i % 4]).collect();
        assert!(kpss_level(&data) < KPSS_CRITICAL_5PCT);
    }

    #[test]
    fn test_ndiffs_linear_trend() {
        let trend: Vec<f64> = (1..=12).map(|x| x as f64).collect();
        assert_eq!(ndiffs(&trend, 2), 1);
    }

    #[test]
    fn test_ndiffs_quadratic_trend() {
        let data: Vec<f64> = (0..30).map(|x| (x * x) as f64).collect();
        assert_eq!(ndiffs(&data, 2), 2);
    }

    #[test]
    fn test_ndiffs_respects_max() {
        let data: Vec<f64> = (0..30).map(|x| (x * x) as f64).collect();
        assert_eq!(ndiffs(&data, 1), 1);
        assert_eq!(ndiffs(&data, 0), 0);
    }

    #[test]
    fn test_ndiffs_stationary_series() {
        let data: Vec<f64> = (0..40).map(|i| [3.0, 4.0, 3.0, 2.0][i % 4]).collect();
        assert_eq!(ndiffs(&data, 2), 0);
    }

    #[test]
    fn test_ndiffs_ignores_magnitude() {
        let trend: Vec<f64> = (1..=12).map(|x| x as f64 * 1e300).collect();
        assert_eq!(ndiffs(&trend, 2), 1);
        let tiny: Vec<f64> = (0..30).map(|x| (x * x) as f64 * 1e-300).collect();
        assert_eq!(ndiffs(&tiny, 2), 2);
    }
}
