//! Notification manager.
//!
//! Owns the run snapshot and the configured channels. Business logic mutates
//! the snapshot through the methods below while the run is collecting; a
//! single `push` then renders and dispatches every eligible channel in
//! configuration order.

use std::sync::Arc;

use jiff::Timestamp;

use super::bark_provider::BarkProvider;
use super::provider::ChannelAdapter;
use super::statocysts_provider::StatocystsProvider;
use super::webhook_provider::WebhookProvider;
use crate::config::NotificationSettings;
use crate::error::AppResult;
use crate::external::{HttpTransport, Transport};
use crate::models::{
    AccountStatsUpdate, ChannelConfig, ChannelKind, ExecutionResult, GameStats, GameStatsUpdate,
    LogLevel, NewLogEntry, NotificationData, RenderedNotification,
};

/// Collects run statistics and fans the final report out to every channel
pub struct NotificationManager {
    data: NotificationData,
    channels: Vec<ChannelConfig>,
    transport: Arc<dyn Transport>,
}

impl NotificationManager {
    /// Creates a manager sending through the shared HTTP client
    pub fn new(channels: Vec<ChannelConfig>) -> Self {
        Self::with_transport(channels, Arc::new(HttpTransport::default()))
    }

    pub fn with_transport(channels: Vec<ChannelConfig>, transport: Arc<dyn Transport>) -> Self {
        Self {
            data: NotificationData::new(),
            channels,
            transport,
        }
    }

    pub fn from_settings(settings: &NotificationSettings) -> Self {
        Self::new(settings.channels.clone())
    }

    /// Read-only view of the snapshot
    pub fn data(&self) -> &NotificationData {
        &self.data
    }

    pub fn channels(&self) -> &[ChannelConfig] {
        &self.channels
    }

    // ========================================================================
    // Snapshot mutation
    // ========================================================================

    /// Overwrites the run outcome; the last call wins
    pub fn set_result(&mut self, result: ExecutionResult) {
        self.data.meta.execution_result = result;
    }

    /// Flags the run as errored. The flag is never cleared.
    pub fn mark_error(&mut self) {
        self.data.meta.has_error = true;
    }

    pub fn has_error(&self) -> bool {
        self.data.meta.has_error
    }

    pub fn update_account_stats(&mut self, update: AccountStatsUpdate) {
        self.data.accounts.apply(update);
    }

    pub fn get_game_stats(&self, game_id: u32) -> Option<&GameStats> {
        self.data.game(game_id)
    }

    /// Returns the entry for `game_id`, appending a zeroed one named
    /// `game_name` if the game has not been seen yet
    pub fn ensure_game_stats(&mut self, game_id: u32, game_name: &str) -> &mut GameStats {
        let index = match self.data.games.iter().position(|g| g.game_id == game_id) {
            Some(index) => index,
            None => {
                self.data.games.push(GameStats::new(game_id, game_name));
                self.data.games.len() - 1
            }
        };
        &mut self.data.games[index]
    }

    pub fn update_game_stats(&mut self, game_id: u32, game_name: &str, update: GameStatsUpdate) {
        self.ensure_game_stats(game_id, game_name).apply(update);
    }

    /// Appends a log line stamped with the current time. Error lines also
    /// flag the run as errored.
    pub fn add_log(&mut self, entry: NewLogEntry) {
        let now = Timestamp::now();
        let timestamp = match self.data.logs.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };

        if entry.level == LogLevel::Error {
            self.mark_error();
        }
        self.data.logs.push(entry.stamp(timestamp));
    }

    // ========================================================================
    // Console pass-through (not collected)
    // ========================================================================

    pub fn log(&self, message: &str) {
        tracing::info!("{}", message);
    }

    pub fn error(&mut self, message: &str) {
        tracing::error!("{}", message);
        self.mark_error();
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Sends the report to every enabled channel whose send condition
    /// matches the run outcome.
    ///
    /// Channels are handled one after another. A failing channel is logged
    /// and skipped; it never stops the remaining channels. Calling `push`
    /// again dispatches again.
    pub async fn push(&self) {
        let result = self.data.meta.execution_result;

        for (position, channel) in self.channels.iter().enumerate() {
            let kind = channel.kind();

            if !channel.enabled() {
                tracing::debug!(channel = %kind, position, "Channel disabled, skipping");
                continue;
            }

            if !channel.should_send(result) {
                tracing::debug!(
                    channel = %kind,
                    position,
                    result = %result,
                    "Run outcome not in send_on, skipping"
                );
                continue;
            }

            let adapter = self.adapter_for(channel);
            match self.send_with(adapter.as_ref()).await {
                Ok(()) => tracing::info!(
                    channel = adapter.name(),
                    position,
                    "Notification sent"
                ),
                Err(e) => tracing::error!(
                    channel = adapter.name(),
                    position,
                    error = %e.report(),
                    "Failed to send notification"
                ),
            }
        }
    }

    /// Renders the first configured channel of `kind` without sending it
    pub fn render_for_channel(&self, kind: ChannelKind) -> Option<AppResult<RenderedNotification>> {
        let channel = self.channels.iter().find(|c| c.kind() == kind)?;
        Some(self.adapter_for(channel).render(&self.data))
    }

    async fn send_with(&self, adapter: &dyn ChannelAdapter) -> AppResult<()> {
        let rendered = adapter.render(&self.data)?;
        adapter.send(&rendered).await
    }

    /// Factory for the adapter matching a channel variant
    fn adapter_for<'a>(&'a self, channel: &'a ChannelConfig) -> Box<dyn ChannelAdapter + 'a> {
        let transport = self.transport.as_ref();
        match channel {
            ChannelConfig::Bark(config) => Box::new(BarkProvider::new(config, transport)),
            ChannelConfig::Statocysts(config) => {
                Box::new(StatocystsProvider::new(config, transport))
            }
            ChannelConfig::Webhook(config) => Box::new(WebhookProvider::new(config, transport)),
        }
    }
}
