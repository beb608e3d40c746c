//! Data ingestion layer for the request-rate monitor.
//!
//! Parses access-log lines, filters timestamps by date, aggregates them into
//! per-second counts and runs the batch analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod parser;
pub mod reader;

pub use rps_core as core;
