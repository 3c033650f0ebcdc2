//! Configuration module
//!
//! Settings loaded from `config.toml`: the answer service endpoint and
//! display preferences.

pub mod config;

pub use config::Config;
