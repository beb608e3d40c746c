//! Runtime layer for the request-rate monitor.
//!
//! Hosts the follow engine that tails a growing access log and reports
//! throughput until it is told to stop.

pub mod follow;

pub use rps_core as core;
pub use rps_data as data;
