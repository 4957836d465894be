//! API route handlers

use crate::dispatch::{self, DispatchError, ForecastResult};
use crate::error::ApiError;
use crate::validation;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinError;
use tracing::{debug, info};

#[derive(Debug, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub forecast: Vec<f64>,
}

/// `POST /forecast`
///
/// The body is read raw so that a missing or non-JSON payload is reported in
/// the service's own error shape instead of the extractor's.
pub async fn forecast(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let body = body.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "unreadable forecast body");
        ApiError::from(rejection)
    })?;
    let payload = parse_payload(&body);
    let request = validation::validate(payload.as_ref(), &state.config.limits).map_err(|err| {
        debug!(error = %err, "rejected forecast request");
        err
    })?;

    info!(
        strategy = %request.strategy,
        horizon = request.horizon,
        observations = request.series.len(),
        indicator = request.label.as_deref().unwrap_or(""),
        "forecast requested"
    );

    let config = state.config.clone();
    let joined =
        tokio::task::spawn_blocking(move || dispatch::dispatch(&request, &config.dispatch)).await;

    match settle(joined) {
        Ok(result) => Ok(Json(ForecastResponse {
            forecast: result.values,
        })),
        Err(err) => {
            debug!(error = %err, "forecast not produced");
            Err(err.into())
        }
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Fallback for known routes hit with the wrong method
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// A panicking model surfaces as a failed computation
fn settle(
    joined: Result<Result<ForecastResult, DispatchError>, JoinError>,
) -> Result<ForecastResult, DispatchError> {
    joined.unwrap_or_else(|join_err| {
        Err(DispatchError::ComputationFailed(format!(
            "forecast task aborted: {join_err}"
        )))
    })
}

fn parse_payload(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    serde_json::from_slice(body).ok()
}
