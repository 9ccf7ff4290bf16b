pub mod app;
pub mod config;
pub mod handlers;
pub mod phone;
pub mod services;
pub mod ui;
pub mod utils;
pub mod widgets;
