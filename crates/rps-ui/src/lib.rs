//! Reporting layer for the request-rate monitor.
//!
//! Prints textual or JSON reports and renders the requests-per-second chart
//! with [`ratatui`], either into a text file or full-screen in the terminal.

pub mod app;
pub mod chart;
pub mod report;
pub mod themes;

pub use rps_core as core;
