//! Station Climate Core Library
//!
//! Shared utilities for the climate API service:
//! - Configuration file discovery (XDG-compliant)
//! - TOML config loading
//! - Common constants

mod config;

pub use config::{find_config_file, load_config, ConfigSource};

/// Application name used for XDG and /etc paths
pub const APP_NAME: &str = "station-climate";

/// Default API port
pub const DEFAULT_API_PORT: u16 = 5000;
