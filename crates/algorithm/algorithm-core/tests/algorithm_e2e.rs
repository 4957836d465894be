//! End-to-end tests for algorithm-core
//!
//! Tests complete forecasting workflows using only this crate's API.

use algorithm_core::prelude::*;

fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

fn trend_data() -> Vec<f64> {
    (0..100).map(|i| 50.0 + 0.5 * i as f64).collect()
}

fn seasonal_data() -> Vec<f64> {
    (0..60)
        .map(|i| {
            let t = i as f64;
            100.0 + t * 0.3 + 15.0 * (t * std::f64::consts::PI / 6.0).sin()
        })
        .collect()
}

#[test]
fn e2e_arima_forecast_workflow() {
    let data = trend_data();
    let train = &data[..80];
    let test = &data[80..];

    let mut model = Arima::new(1, 1, 0).unwrap();
    assert!(!model.is_fitted());

    model.fit(train).unwrap();
    assert!(model.is_fitted());

    let predictions = model.predict(test.len()).unwrap();
    assert_eq!(predictions.len(), test.len());

    let error = mae(test, &predictions);
    assert!(error < 5.0, "ARIMA MAE {} too high for linear trend", error);
}

#[test]
fn e2e_auto_arima_tracks_linear_trend() {
    let data = trend_data();
    let train = &data[..80];
    let test = &data[80..];

    let mut model = AutoArima::default();
    model.fit(train).unwrap();
    let predictions = model.predict(test.len()).unwrap();

    assert_eq!(predictions.len(), test.len());
    assert!(mae(test, &predictions) < 1.0);
}

#[test]
fn e2e_auto_arima_minimum_history() {
    let data: Vec<f64> = (1..=12).map(|x| x as f64).collect();
    let mut model = AutoArima::default();
    model.fit(&data).unwrap();

    let forecast = model.predict(3).unwrap();
    assert_eq!(forecast.len(), 3);
    assert!(forecast.iter().all(|v| v.is_finite()));
}

#[test]
fn e2e_auto_arima_is_repeatable() {
    let data = seasonal_data();
    let run = || {
        let mut model = AutoArima::default();
        model.fit(&data).unwrap();
        model.predict(6).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn e2e_trend_seasonal_on_synthetic_monthly_axis() {
    let data = seasonal_data();
    let train = &data[..48];
    let test = &data[48..];

    let axis = TimeAxis::default();
    let dates = axis.extend(train.len(), test.len()).unwrap();

    let mut model = TrendSeasonalModel::default();
    model.fit_dated(&dates[..train.len()], train).unwrap();
    let predictions = model.predict_dated(&dates[train.len()..]).unwrap();

    assert_eq!(predictions.len(), test.len());
    let error = mae(test, &predictions);
    assert!(error < 5.0, "trend/seasonal MAE {} too high", error);
}

#[test]
fn e2e_trend_seasonal_trailing_window() {
    let values = [10.0, 12.0, 13.0, 12.0, 15.0, 14.0, 16.0, 18.0, 17.0, 19.0, 20.0, 21.0];
    let axis = TimeAxis::default();

    let mut model = TrendSeasonalModel::default();
    model
        .fit_dated(&axis.dates(values.len()).unwrap(), &values)
        .unwrap();

    let extended = axis.extend(values.len(), 2).unwrap();
    let all = model.predict_dated(&extended).unwrap();
    let tail = &all[all.len() - 2..];

    assert_eq!(tail.len(), 2);
    assert!(tail.iter().all(|v| v.is_finite()));
}
