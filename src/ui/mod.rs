//! Terminal front end
//!
//! The root view and the terminal setup around it.

pub mod ask_tui;

pub use ask_tui::{run_ask_tui, AskTui, TuiMode};
