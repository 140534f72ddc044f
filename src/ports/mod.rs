//! Port traits implemented by the adapters.

pub mod config_port;
pub mod series_port;
pub mod sink_port;
