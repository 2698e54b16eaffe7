// src/core/mod.rs
//! Process-wide configuration shared by the web server and the CLI

pub mod config_manager;

pub use config_manager::{ConfigManager, ExplainerConfig, ServiceConfig};
