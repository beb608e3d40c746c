//! Shared building blocks for the request-rate monitor.
//!
//! Holds the data model (log records, per-second count series, statistics),
//! the error type, time helpers, text formatting and CLI settings used by the
//! data, runtime and UI crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{Result, RpsError};
