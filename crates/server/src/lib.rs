//! # forecast-server
//!
//! HTTP service that forecasts a numeric series with a selectable strategy.
//!
//! - [`validation`]: untyped JSON payload to [`validation::ForecastRequest`]
//! - [`dispatch`]: strategy selection and engine invocation
//! - [`error`]: uniform `{"error": ...}` responses
//! - [`config`]: environment-driven settings

use axum::{routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnFailure, TraceLayer};
use tracing::Level;

pub mod config;
pub mod dispatch;
pub mod error;
pub mod routes;
pub mod strategy;
pub mod validation;

pub use config::AppConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

/// Build the router with middleware
pub fn app(config: AppConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/forecast",
            post(routes::forecast).fallback(routes::method_not_allowed),
        )
        .fallback(routes::not_found)
        // Failed forecasts are reported in the response only
        .layer(
            TraceLayer::new_for_http()
                .on_failure(DefaultOnFailure::new().level(Level::DEBUG)),
        )
        .layer(cors)
        .with_state(state)
}
