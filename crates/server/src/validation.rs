//! Request validation
//!
//! Turns an untyped JSON payload into a [`ForecastRequest`]. Checks run in a
//! fixed order and the first failure is returned; nothing is computed for a
//! request that does not validate.
//!
//! `values` is normally a JSON array. For compatibility with older clients a
//! JSON string holding an encoded array is also accepted and decoded here.

use crate::strategy::Strategy;
use serde_json::{Map, Value};
use thiserror::Error;

pub const VALUES_FIELD: &str = "values";
pub const HORIZON_FIELD: &str = "future_periods";
pub const STRATEGY_FIELD: &str = "model_type";
pub const LABEL_FIELD: &str = "indicator";

/// Shortest history the bundled strategies can fit meaningfully
pub const MIN_HISTORY: usize = 12;
/// Default ceiling on `future_periods`
pub const DEFAULT_MAX_HORIZON: usize = 10_000;

/// Input bounds enforced by [`validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    pub min_history: usize,
    pub max_horizon: usize,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            min_history: MIN_HISTORY,
            max_horizon: DEFAULT_MAX_HORIZON,
        }
    }
}

/// A well-formed forecast request
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    /// Observations, oldest first
    pub series: Vec<f64>,
    /// Number of future points to produce
    pub horizon: usize,
    pub strategy: Strategy,
    /// Free-form caller label, diagnostics only
    pub label: Option<String>,
}

/// Reasons a payload is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Request body must be a JSON object")]
    MissingPayload,

    #[error("Invalid 'values': {0}")]
    MalformedSeries(String),

    #[error("Invalid 'future_periods': {0}")]
    InvalidHorizon(String),

    #[error("Invalid 'values': {0}")]
    NonNumericSeries(String),

    #[error("Insufficient history: at least {required} values are required, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },
}

/// Validate a parsed request body
///
/// `payload` is `None` when the body was empty or not JSON.
pub fn validate(
    payload: Option<&Value>,
    limits: &RequestLimits,
) -> Result<ForecastRequest, ValidationError> {
    let body = payload
        .and_then(Value::as_object)
        .ok_or(ValidationError::MissingPayload)?;

    let raw_series = decode_series(body)?;
    let horizon = parse_horizon(body, limits)?;
    let series = numeric_series(&raw_series)?;

    if series.len() < limits.min_history {
        return Err(ValidationError::InsufficientHistory {
            required: limits.min_history,
            actual: series.len(),
        });
    }

    Ok(ForecastRequest {
        series,
        horizon,
        strategy: parse_strategy(body.get(STRATEGY_FIELD)),
        label: body.get(LABEL_FIELD).and_then(render_label),
    })
}

/// The series as a JSON array, decoding the legacy string form
fn decode_series(body: &Map<String, Value>) -> Result<Vec<Value>, ValidationError> {
    match body.get(VALUES_FIELD) {
        None | Some(Value::Null) => Err(ValidationError::MalformedSeries(format!(
            "missing required field '{VALUES_FIELD}'"
        ))),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(Value::String(encoded)) => {
            match serde_json::from_str::<Value>(encoded) {
                Ok(Value::Array(items)) => Ok(items),
                Ok(_) => Err(ValidationError::MalformedSeries(
                    "encoded value is not a JSON array".to_string(),
                )),
                Err(e) => Err(ValidationError::MalformedSeries(format!(
                    "could not decode JSON string: {e}"
                ))),
            }
        }
        Some(_) => Err(ValidationError::MalformedSeries(
            "expected an array of numbers or a JSON-encoded array".to_string(),
        )),
    }
}

fn parse_horizon(body: &Map<String, Value>, limits: &RequestLimits) -> Result<usize, ValidationError> {
    let value = match body.get(HORIZON_FIELD) {
        None | Some(Value::Null) => {
            return Err(ValidationError::InvalidHorizon(format!(
                "missing required field '{HORIZON_FIELD}'"
            )))
        }
        Some(value) => value,
    };

    if let Some(negative) = value.as_i64().filter(|v| *v <= 0) {
        return Err(ValidationError::InvalidHorizon(format!(
            "must be a positive integer, got {negative}"
        )));
    }
    let horizon = value
        .as_u64()
        .ok_or_else(|| ValidationError::InvalidHorizon(format!("must be an integer, got {value}")))?;

    match usize::try_from(horizon) {
        Ok(h) if h <= limits.max_horizon => Ok(h),
        _ => Err(ValidationError::InvalidHorizon(format!(
            "must not exceed {}, got {horizon}",
            limits.max_horizon
        ))),
    }
}

fn numeric_series(items: &[Value]) -> Result<Vec<f64>, ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::NonNumericSeries(
            "series must not be empty".to_string(),
        ));
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_f64().filter(|v| v.is_finite()).ok_or_else(|| {
                ValidationError::NonNumericSeries(format!(
                    "element {index} is not a number: {item}"
                ))
            })
        })
        .collect()
}

fn parse_strategy(value: Option<&Value>) -> Strategy {
    match value {
        None | Some(Value::Null) => Strategy::default(),
        Some(Value::String(tag)) => Strategy::from_tag(tag),
        Some(other) => Strategy::Unsupported(other.to_string()),
    }
}

fn render_label(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(label) => Some(label.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(payload: Value) -> Result<ForecastRequest, ValidationError> {
        validate(Some(&payload), &RequestLimits::default())
    }

    fn twelve() -> Value {
        json!([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12])
    }

    #[test]
    fn test_missing_payload() {
        assert_eq!(
            validate(None, &RequestLimits::default()),
            Err(ValidationError::MissingPayload)
        );
        assert_eq!(check(json!([1, 2, 3])), Err(ValidationError::MissingPayload));
        assert_eq!(check(json!("text")), Err(ValidationError::MissingPayload));
    }

    #[test]
    fn test_accepts_plain_array() {
        let request = check(json!({"values": twelve(), "future_periods": 3})).unwrap();
        assert_eq!(request.series.len(), 12);
        assert_eq!(request.horizon, 3);
        assert_eq!(request.strategy, Strategy::AutoArima);
        assert_eq!(request.label, None);
    }

    #[test]
    fn test_accepts_double_encoded_string() {
        let request = check(json!({
            "values": "[1,2,3,4,5,6,7,8,9,10,11,12.5]",
            "future_periods": 2,
            "model_type": "prophet",
            "indicator": "sales",
        }))
        .unwrap();
        assert_eq!(request.series[11], 12.5);
        assert_eq!(request.strategy, Strategy::Prophet);
        assert_eq!(request.label.as_deref(), Some("sales"));
    }

    #[test]
    fn test_missing_values() {
        let err = check(json!({"future_periods": 3})).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedSeries(_)));
        assert!(err.to_string().contains("values"));
    }

    #[test]
    fn test_undecodable_string() {
        let err = check(json!({"values": "[1,2,", "future_periods": 3})).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedSeries(_)));
    }

    #[test]
    fn test_encoded_non_array() {
        let err = check(json!({"values": "{\"a\": 1}", "future_periods": 3})).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedSeries(_)));
    }

    #[test]
    fn test_values_wrong_type() {
        let err = check(json!({"values": 12, "future_periods": 3})).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedSeries(_)));
    }

    #[test]
    fn test_missing_horizon_names_field() {
        let err = check(json!({"values": twelve()})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidHorizon(_)));
        assert!(err.to_string().contains("future_periods"));
    }

    #[test]
    fn test_rejected_horizons() {
        for horizon in [json!(0), json!(-2), json!(2.5), json!("3"), json!(true), json!(null)] {
            let err = check(json!({"values": twelve(), "future_periods": horizon})).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidHorizon(_)),
                "horizon {horizon} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_horizon_ceiling() {
        let limits = RequestLimits {
            max_horizon: 5,
            ..RequestLimits::default()
        };
        let payload = json!({"values": twelve(), "future_periods": 6});
        assert!(matches!(
            validate(Some(&payload), &limits),
            Err(ValidationError::InvalidHorizon(_))
        ));
    }

    #[test]
    fn test_empty_series() {
        let err = check(json!({"values": [], "future_periods": 3})).unwrap_err();
        assert!(matches!(err, ValidationError::NonNumericSeries(_)));
    }

    #[test]
    fn test_non_numeric_element_reports_index() {
        let err = check(json!({
            "values": [1, 2, 3, "x", 5, 6, 7, 8, 9, 10, 11, 12],
            "future_periods": 3,
        }))
        .unwrap_err();
        assert!(matches!(err, ValidationError::NonNumericSeries(_)));
        assert!(err.to_string().contains("element 3"));
    }

    #[test]
    fn test_null_element_is_non_numeric() {
        let err = check(json!({"values": "[1, null, 3]", "future_periods": 3})).unwrap_err();
        assert!(matches!(err, ValidationError::NonNumericSeries(_)));
    }

    #[test]
    fn test_short_series() {
        let err = check(json!({"values": [1, 2, 3], "future_periods": 3})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InsufficientHistory {
                required: 12,
                actual: 3
            }
        );
    }

    #[test]
    fn test_short_series_wins_over_strategy() {
        let err = check(json!({"values": [1, 2, 3], "future_periods": 3, "model_type": "SARIMA"}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InsufficientHistory { .. }));
    }

    #[test]
    fn test_check_order_series_before_horizon() {
        let err = check(json!({"values": "nope", "future_periods": 0})).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedSeries(_)));
    }

    #[test]
    fn test_check_order_horizon_before_numeric() {
        let err = check(json!({"values": ["a"], "future_periods": 0})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidHorizon(_)));
    }

    #[test]
    fn test_strategy_defaults_and_normalizes() {
        let base = json!({"values": twelve(), "future_periods": 1});
        assert_eq!(check(base.clone()).unwrap().strategy, Strategy::AutoArima);

        let mut with_null = base.clone();
        with_null["model_type"] = Value::Null;
        assert_eq!(check(with_null).unwrap().strategy, Strategy::AutoArima);

        let mut lower = base.clone();
        lower["model_type"] = json!("sarima");
        assert_eq!(check(lower).unwrap().strategy, Strategy::Sarima);

        let mut numeric = base;
        numeric["model_type"] = json!(7);
        assert_eq!(
            check(numeric).unwrap().strategy,
            Strategy::Unsupported("7".to_string())
        );
    }

    #[test]
    fn test_non_string_indicator_is_rendered() {
        let request = check(json!({"values": twelve(), "future_periods": 1, "indicator": 42})).unwrap();
        assert_eq!(request.label.as_deref(), Some("42"));
    }
}
