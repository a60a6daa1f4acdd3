//! Data models for the notification pipeline.

pub mod channel;
pub mod notification;
pub mod target;

pub use channel::{
    BarkChannelConfig, BarkLevel, BarkTemplates, ChannelConfig, ChannelKind,
    StatocystsChannelConfig, StatocystsTemplates, WebhookChannelConfig, WebhookTemplates,
};
pub use notification::{
    AccountStats, AccountStatsUpdate, ExecutionResult, GameStats, GameStatsUpdate, LogEntry,
    LogLevel, Meta, NewLogEntry, NotificationData, RenderedNotification,
};
pub use target::BroadcastTarget;
