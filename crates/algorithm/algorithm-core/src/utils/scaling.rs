//! Magnitude normalisation
//!
//! Models fit on `data / magnitude(data)` so that sums of squares stay finite
//! for any finite input, then multiply forecasts back.

/// Largest absolute value of the series, or `1.0` when it is zero or subnormal
pub fn magnitude(data: &[f64]) -> f64 {
    let max_abs = data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if max_abs.is_normal() {
        max_abs
    } else {
        1.0
    }
}

/// Divide every value by `scale`
pub fn rescale(data: &[f64], scale: f64) -> Vec<f64> {
    data.iter().map(|v| v / scale).collect()
}
