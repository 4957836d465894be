//! Numerical helpers shared by the models

pub mod linalg;
pub mod scaling;
pub mod stationarity;
