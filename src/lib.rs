//! Skland Notify Library
//!
//! Notification layer for the Skland daily check-in runner: collects run
//! statistics, renders them through channel templates and pushes them to
//! Bark, broadcast URLs and JSON webhooks.

pub mod config;
pub mod error;
pub mod external;
pub mod legacy;
pub mod logger;
pub mod models;
pub mod services;
pub mod template;

pub use error::{AppError, AppResult};
pub use legacy::MessageCollector;
pub use services::notifications::NotificationManager;

pub fn pkg_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
