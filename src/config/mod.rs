//! Configuration management module for skland-notify
//!
//! This module provides layered configuration loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `local.toml` - Local overrides (not committed to version control)
//! 3. `SKLAND_*` environment variables

pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

// Re-export public types
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ConsoleSettings, FileSettings, LoggerSettings, NotificationSettings, Settings,
};
