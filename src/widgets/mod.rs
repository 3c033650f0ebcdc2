//! UI widgets for the TUI application
//!
//! This module contains the reusable components the root view is
//! composed from.

pub mod log_widget;
pub mod spinner;
pub mod submit_button;
pub mod summary_view;
