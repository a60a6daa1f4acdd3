//! Notification dispatch with pluggable channel adapters.
//!
//! `NotificationManager` owns the run snapshot; each channel kind has an
//! adapter implementing `ChannelAdapter` that renders the snapshot with the
//! channel's templates and hands the result to the transport.

mod bark_provider;
mod broadcast;
mod notification_manager;
mod provider;
mod statocysts_provider;
mod webhook_provider;

#[cfg(test)]
pub(crate) mod tests;

pub use bark_provider::BarkProvider;
pub use broadcast::BroadcastSender;
pub use crate::models::BroadcastTarget;
pub use notification_manager::NotificationManager;
pub use provider::ChannelAdapter;
pub use statocysts_provider::StatocystsProvider;
pub use webhook_provider::{PAYLOAD_FIELD, WebhookProvider};
