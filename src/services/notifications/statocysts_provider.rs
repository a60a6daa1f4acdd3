//! Statocysts broadcast adapter.
//!
//! Sends the rendered title and body to every URL in the channel config
//! through one [`BroadcastSender`].

use async_trait::async_trait;

use super::broadcast::BroadcastSender;
use super::provider::ChannelAdapter;
use crate::error::AppResult;
use crate::external::Transport;
use crate::models::{NotificationData, RenderedNotification, StatocystsChannelConfig};
use crate::template::Template;

pub struct StatocystsProvider<'a> {
    config: &'a StatocystsChannelConfig,
    transport: &'a dyn Transport,
}

impl<'a> StatocystsProvider<'a> {
    pub fn new(config: &'a StatocystsChannelConfig, transport: &'a dyn Transport) -> Self {
        Self { config, transport }
    }
}

#[async_trait]
impl ChannelAdapter for StatocystsProvider<'_> {
    fn name(&self) -> &'static str {
        "statocysts"
    }

    fn render(&self, data: &NotificationData) -> AppResult<RenderedNotification> {
        let templates = &self.config.templates;
        Ok(RenderedNotification {
            title: templates.title.render(data)?,
            subtitle: None,
            body: templates.body.render(data)?,
            ..Default::default()
        })
    }

    async fn send(&self, rendered: &RenderedNotification) -> AppResult<()> {
        if self.config.urls.is_empty() {
            tracing::debug!("No broadcast URLs configured, skipping");
            return Ok(());
        }

        let sender = BroadcastSender::new(&self.config.urls, self.transport)?;
        sender.send(&rendered.title, &rendered.body).await?;

        tracing::debug!(targets = sender.targets().len(), "Broadcast delivered");
        Ok(())
    }
}
