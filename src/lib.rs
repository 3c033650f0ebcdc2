pub mod api_client;
pub mod app_state;
pub mod config;
pub mod services;
pub mod ui;
pub mod utils;
pub mod widgets;
