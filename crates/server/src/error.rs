//! HTTP error mapping
//!
//! Every failure leaves the service as `{"error": "<message>"}` with a status
//! chosen by who is at fault: the caller (4xx) or the model (5xx).

use crate::dispatch::DispatchError;
use crate::validation::ValidationError;
use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Request body could not be read: {}", .0.body_text())]
    Body(#[from] BytesRejection),

    #[error("Resource not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Dispatch(DispatchError::UnsupportedStrategy(_)) => StatusCode::BAD_REQUEST,
            ApiError::Dispatch(DispatchError::NotImplemented(_)) => StatusCode::NOT_IMPLEMENTED,
            ApiError::Dispatch(DispatchError::ComputationFailed(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Body(rejection) => rejection.status(),
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let err = ApiError::from(ValidationError::MissingPayload);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Request body must be a JSON object");
    }

    #[test]
    fn test_dispatch_status_mapping() {
        let cases = [
            (
                DispatchError::UnsupportedStrategy("FOO".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DispatchError::NotImplemented("SARIMA".into()),
                StatusCode::NOT_IMPLEMENTED,
            ),
            (
                DispatchError::ComputationFailed("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_response_status() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
