//! Pre-refactor message collector API, kept for existing callers.
//!
//! Everything here delegates to
//! [`NotificationManager`](crate::services::notifications::NotificationManager).

mod message_collector;

pub use message_collector::{CollectOptions, CreateMessageCollectorOptions, MessageCollector};
