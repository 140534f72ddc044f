//! mrscreen — mean-reversion screening for equity price series.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].
//!
//! Three diagnostics are supported, each run as its own screen over a ticker
//! universe: the Augmented Dickey-Fuller unit-root test, the Hurst exponent,
//! and the half-life of mean reversion.

pub mod cli;
pub mod domain;
pub mod ports;
pub mod adapters;
