//! Core domain types and the statistical diagnostics.

pub mod series;
pub mod regression;
pub mod stationarity;
pub mod hurst;
pub mod half_life;
pub mod screen;
pub mod summary;
pub mod universe;
pub mod error;
