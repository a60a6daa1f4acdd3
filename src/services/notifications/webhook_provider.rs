//! Webhook notification adapter.
//!
//! Renders a structured JSON body and sends it to a single URL with the
//! configured method, headers, and timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};

use super::provider::ChannelAdapter;
use crate::error::AppResult;
use crate::external::{JsonRequest, Transport};
use crate::models::{NotificationData, RenderedNotification, WebhookChannelConfig};
use crate::template::Template;

/// Key under which the structured body travels in [`RenderedNotification::extra`]
pub const PAYLOAD_FIELD: &str = "payload";

pub struct WebhookProvider<'a> {
    config: &'a WebhookChannelConfig,
    transport: &'a dyn Transport,
}

impl<'a> WebhookProvider<'a> {
    pub fn new(config: &'a WebhookChannelConfig, transport: &'a dyn Transport) -> Self {
        Self { config, transport }
    }

    fn build_request(&self, rendered: &RenderedNotification) -> JsonRequest {
        let body = rendered
            .extra
            .get(PAYLOAD_FIELD)
            .cloned()
            .unwrap_or_else(|| json!({ "title": rendered.title, "body": rendered.body }));

        // Sorted so the outgoing header order does not depend on map iteration
        let mut headers: Vec<_> = self.config.headers.iter().collect();
        headers.sort();

        headers.into_iter().fold(
            JsonRequest::post(self.config.url.clone(), body)
                .with_method(self.config.method)
                .with_timeout(Duration::from_secs(self.config.timeout_seconds)),
            |request, (key, value)| request.with_header(key.clone(), value.clone()),
        )
    }
}

#[async_trait]
impl ChannelAdapter for WebhookProvider<'_> {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn render(&self, data: &NotificationData) -> AppResult<RenderedNotification> {
        let payload: JsonValue = self.config.templates.body.render(data)?;

        let mut rendered = RenderedNotification {
            title: String::new(),
            subtitle: None,
            body: payload.to_string(),
            ..Default::default()
        };
        rendered.extra.insert(PAYLOAD_FIELD.to_string(), payload);
        Ok(rendered)
    }

    async fn send(&self, rendered: &RenderedNotification) -> AppResult<()> {
        if self.config.url.is_empty() {
            tracing::debug!("No webhook URL configured, skipping");
            return Ok(());
        }

        let response = self.transport.send(self.build_request(rendered)).await?;

        tracing::debug!(
            status = response.status,
            method = self.config.method.as_str(),
            "Webhook accepted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::HttpMethod;
    use crate::models::WebhookTemplates;
    use crate::services::notifications::tests::RecordingTransport;
    use crate::template::{func, text};

    #[test]
    fn test_render_keeps_structured_payload() {
        let config = WebhookChannelConfig::new("https://example.com/hook");
        let transport = RecordingTransport::default();
        let provider = WebhookProvider::new(&config, &transport);

        let rendered = provider.render(&NotificationData::new()).unwrap();
        let payload = &rendered.extra[PAYLOAD_FIELD];
        assert_eq!(payload["result"], "success");
        assert_eq!(rendered.body, payload.to_string());
    }

    #[test]
    fn test_text_template_payload_is_string() {
        let config = WebhookChannelConfig::new("https://example.com/hook").with_templates(
            WebhookTemplates {
                body: text("total={{accounts.total}}"),
            },
        );
        let transport = RecordingTransport::default();
        let provider = WebhookProvider::new(&config, &transport);

        let rendered = provider.render(&NotificationData::new()).unwrap();
        assert_eq!(rendered.extra[PAYLOAD_FIELD], "total=0");
    }

    #[tokio::test]
    async fn test_send_uses_method_headers_and_timeout() {
        let config = WebhookChannelConfig::new("https://example.com/hook")
            .with_method(HttpMethod::Put)
            .with_header("X-B", "2")
            .with_header("X-A", "1")
            .with_templates(WebhookTemplates {
                body: func(|data: &NotificationData| {
                    Ok(json!({ "games": data.games.len() }))
                }),
            });
        let transport = RecordingTransport::default();
        let provider = WebhookProvider::new(&config, &transport);

        let rendered = provider.render(&NotificationData::new()).unwrap();
        provider.send(&rendered).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert_eq!(requests[0].body, json!({ "games": 0 }));
        assert_eq!(
            requests[0].headers,
            vec![
                ("X-A".to_string(), "1".to_string()),
                ("X-B".to_string(), "2".to_string()),
            ]
        );
        assert_eq!(requests[0].timeout, Some(Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn test_send_without_url_is_noop() {
        let config = WebhookChannelConfig::new("");
        let transport = RecordingTransport::default();
        let provider = WebhookProvider::new(&config, &transport);

        provider.send(&RenderedNotification::default()).await.unwrap();
        assert!(transport.requests().is_empty());
    }
}
