//! Bark notification adapter.
//!
//! Pushes to every configured device key in one batched request.
//!
//! Bark API Reference: https://github.com/Finb/Bark

use async_trait::async_trait;
use serde::Serialize;

use super::provider::ChannelAdapter;
use crate::error::AppResult;
use crate::external::{JsonRequest, Transport};
use crate::models::{BarkChannelConfig, BarkLevel, NotificationData, RenderedNotification};
use crate::template::Template;

pub const DEFAULT_GROUP: &str = "Skland Notification";
pub const DEFAULT_DEEP_LINK: &str = "skland://";

/// Request body of the Bark batch push API
#[derive(Debug, Serialize)]
struct BarkPushRequest<'a> {
    device_keys: &'a [String],
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtitle: Option<&'a str>,
    markdown: &'a str,
    group: &'a str,
    level: BarkLevel,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<&'a str>,
}

/// Bark channel adapter
///
/// # Example
/// ```ignore
/// let config = BarkChannelConfig::new(vec!["YourDeviceKey".to_string()])
///     .with_level(BarkLevel::Active);
/// let provider = BarkProvider::new(&config, &transport);
/// let rendered = provider.render(&data)?;
/// provider.send(&rendered).await?;
/// ```
pub struct BarkProvider<'a> {
    config: &'a BarkChannelConfig,
    transport: &'a dyn Transport,
}

impl<'a> BarkProvider<'a> {
    pub fn new(config: &'a BarkChannelConfig, transport: &'a dyn Transport) -> Self {
        Self { config, transport }
    }

    /// Builds the request body for the Bark push API
    ///
    /// Group, level and deep link fall back to the adapter defaults; icon and
    /// sound are only sent when configured.
    fn build_request_body(&self, rendered: &RenderedNotification) -> AppResult<serde_json::Value> {
        let config = self.config;
        let request = BarkPushRequest {
            device_keys: &config.tokens,
            title: &rendered.title,
            subtitle: rendered.subtitle.as_deref(),
            markdown: &rendered.body,
            group: config.group.as_deref().unwrap_or(DEFAULT_GROUP),
            level: config.level.unwrap_or_default(),
            url: config.url.as_deref().unwrap_or(DEFAULT_DEEP_LINK),
            icon: config.icon.as_deref(),
            sound: config.sound.as_deref(),
        };
        Ok(serde_json::to_value(request)?)
    }
}

#[async_trait]
impl ChannelAdapter for BarkProvider<'_> {
    fn name(&self) -> &'static str {
        "bark"
    }

    fn render(&self, data: &NotificationData) -> AppResult<RenderedNotification> {
        let templates = &self.config.templates;
        Ok(RenderedNotification {
            title: templates.title.render(data)?,
            subtitle: Some(templates.subtitle.render(data)?),
            body: templates.body.render(data)?,
            ..Default::default()
        })
    }

    async fn send(&self, rendered: &RenderedNotification) -> AppResult<()> {
        if self.config.tokens.is_empty() {
            tracing::debug!("No bark device keys configured, skipping");
            return Ok(());
        }

        let body = self.build_request_body(rendered)?;
        let request = JsonRequest::post(self.config.build_api_url(), body);
        let response = self.transport.send(request).await?;

        tracing::debug!(
            status = response.status,
            devices = self.config.tokens.len(),
            "Bark push accepted"
        );
        Ok(())
    }
}
