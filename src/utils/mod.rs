//! Utility functions shared by the CLI and the library.
//!
//! - [`app_data`] - configuration file and store discovery
//! - [`progress`] - per-phase progress bars (no-op without the `progress` feature)

pub mod app_data;
pub mod progress;

pub use app_data::*;
