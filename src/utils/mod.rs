//! Utility functions and helpers
//!
//! Application paths and the logging setup shared by the binary and the TUI.

pub mod app_paths;
pub mod logging;
