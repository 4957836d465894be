//! Process configuration
//!
//! Read once at start-up from the environment (optionally seeded from a
//! `.env` file). Every key has a default, so an empty environment is valid.

use crate::dispatch::DispatchSettings;
use crate::validation::RequestLimits;
use algorithm_core::{Cadence, NaiveDate, TimeAxis};
use std::net::SocketAddr;
use thiserror::Error;

pub const HOST_VAR: &str = "HOST";
pub const PORT_VAR: &str = "PORT";
pub const MAX_HORIZON_VAR: &str = "FORECAST_MAX_HORIZON";
pub const AXIS_ANCHOR_VAR: &str = "FORECAST_AXIS_ANCHOR";
pub const AXIS_CADENCE_VAR: &str = "FORECAST_AXIS_CADENCE";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5001;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Everything the service needs to run
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub limits: RequestLimits,
    pub dispatch: DispatchSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            limits: RequestLimits::default(),
            dispatch: DispatchSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(host) = lookup(HOST_VAR) {
            config.host = host;
        }
        if let Some(raw) = lookup(PORT_VAR) {
            config.port = raw
                .parse()
                .map_err(|e| ConfigError::invalid(PORT_VAR, &raw, e))?;
        }
        if let Some(raw) = lookup(MAX_HORIZON_VAR) {
            let max: usize = raw
                .parse()
                .map_err(|e| ConfigError::invalid(MAX_HORIZON_VAR, &raw, e))?;
            if max == 0 {
                return Err(ConfigError::invalid(MAX_HORIZON_VAR, &raw, "must be positive"));
            }
            config.limits.max_horizon = max;
        }

        let default_axis = config.dispatch.axis;
        let anchor = match lookup(AXIS_ANCHOR_VAR) {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|e| ConfigError::invalid(AXIS_ANCHOR_VAR, &raw, e))?,
            None => default_axis.anchor(),
        };
        let cadence = match lookup(AXIS_CADENCE_VAR) {
            Some(raw) => raw
                .parse::<Cadence>()
                .map_err(|e| ConfigError::invalid(AXIS_CADENCE_VAR, &raw, e))?,
            None => default_axis.cadence(),
        };
        config.dispatch.axis = TimeAxis::new(anchor, cadence);

        Ok(config)
    }

    /// Address to bind the listener to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|e| ConfigError::invalid(HOST_VAR, &self.host, e))
    }
}
