//! Trend/seasonality decomposition models fit against a calendar
//!
//! - [`TimeAxis`]: evenly spaced synthetic dates for series without timestamps
//! - [`Seasonality`]: Fourier terms for one periodic component
//! - [`TrendSeasonalModel`]: piecewise-linear trend plus seasonalities

mod axis;
mod seasonality;
mod trend_seasonal;

pub use axis::{Cadence, TimeAxis};
pub use seasonality::{epoch_days, Seasonality};
pub use trend_seasonal::{Components, TrendSeasonalConfig, TrendSeasonalModel};
