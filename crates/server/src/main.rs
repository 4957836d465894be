//! # forecast-server
//!
//! Binary entry point: configuration, tracing, listener.

use forecast_server::{app, AppConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forecast_server=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");
    let addr = config.socket_addr().expect("Invalid HOST:PORT configuration");
    tracing::info!(
        anchor = %config.dispatch.axis.anchor(),
        cadence = %config.dispatch.axis.cadence(),
        max_horizon = config.limits.max_horizon,
        "forecast-server v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app(config))
        .await
        .expect("Server error");
}
