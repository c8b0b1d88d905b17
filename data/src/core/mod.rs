//! Core infrastructure: configuration, constants, logging

pub mod config;
pub mod constants;
pub mod logging;

pub use config::AppConfig;
