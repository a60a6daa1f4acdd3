//! Channel configuration models.
//!
//! Each channel kind is one variant of the closed [`ChannelConfig`] union.
//! Configs deserialize from TOML/JSON with a `type` tag; template bundles are
//! code-only and always start from the built-in defaults.

use std::collections::HashMap;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{AppError, AppResult};
use crate::external::HttpMethod;
use crate::models::{BroadcastTarget, ExecutionResult};
use crate::template::{TemplateDef, defaults};

// ============================================================================
// Default value functions
// ============================================================================

fn default_true() -> bool {
    true
}

fn default_bark_server() -> String {
    "https://api.day.app".to_string()
}

fn default_timeout() -> u64 {
    30
}

const DELIVERED_OUTCOMES: &[ExecutionResult] = &[ExecutionResult::Success, ExecutionResult::Failed];

// ============================================================================
// Enums
// ============================================================================

/// Channel kind, used for logging and debug rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Bark,
    Statocysts,
    Webhook,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Bark => "bark",
            ChannelKind::Statocysts => "statocysts",
            ChannelKind::Webhook => "webhook",
        }
    }

    /// Outcomes a channel fires for when `send_on` is unset. Skipped runs
    /// are only reported when asked for, as [`BarkChannelConfig::new`] does.
    pub fn default_send_on(&self) -> &'static [ExecutionResult] {
        DELIVERED_OUTCOMES
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bark interruption level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BarkLevel {
    Active,
    #[default]
    TimeSensitive,
    Passive,
}

// ============================================================================
// Template bundles
// ============================================================================

#[derive(Debug, Clone)]
pub struct BarkTemplates {
    pub title: TemplateDef,
    pub subtitle: TemplateDef,
    pub body: TemplateDef,
}

impl Default for BarkTemplates {
    fn default() -> Self {
        Self {
            title: defaults::bark_title(),
            subtitle: defaults::bark_subtitle(),
            body: defaults::bark_body(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatocystsTemplates {
    pub title: TemplateDef,
    pub body: TemplateDef,
}

impl Default for StatocystsTemplates {
    fn default() -> Self {
        Self {
            title: defaults::statocysts_title(),
            body: defaults::statocysts_body(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebhookTemplates {
    pub body: TemplateDef<JsonValue>,
}

impl Default for WebhookTemplates {
    fn default() -> Self {
        Self {
            body: defaults::webhook_body(),
        }
    }
}

// ============================================================================
// Channel configs
// ============================================================================

/// Bark push service (token based)
///
/// Bark API Reference: https://github.com/Finb/Bark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarkChannelConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_on: Option<Vec<ExecutionResult>>,
    /// Device keys, all pushed in one batched request
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default = "default_bark_server")]
    pub server_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<BarkLevel>,
    /// Deep link opened when the notification is tapped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip)]
    pub templates: BarkTemplates,
}

impl BarkChannelConfig {
    /// Enabled channel that also fires on skipped runs
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            enabled: true,
            send_on: Some(ExecutionResult::ALL.to_vec()),
            tokens,
            server_url: default_bark_server(),
            group: None,
            icon: None,
            level: None,
            url: None,
            sound: None,
            templates: BarkTemplates::default(),
        }
    }

    pub fn with_send_on(mut self, send_on: Vec<ExecutionResult>) -> Self {
        self.send_on = Some(send_on);
        self
    }

    pub fn with_templates(mut self, templates: BarkTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_level(mut self, level: BarkLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    /// Push endpoint derived from `server_url`
    pub fn build_api_url(&self) -> String {
        format!("{}/push", self.server_url.trim_end_matches('/'))
    }

    fn validate(&self) -> AppResult<()> {
        validate_http_url("server_url", &self.server_url)?;

        if self.tokens.iter().any(|t| t.trim().is_empty()) {
            return Err(AppError::validation("tokens", "Device key cannot be empty"));
        }

        Ok(())
    }
}

/// URL-based broadcaster fanning one message out to every configured target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatocystsChannelConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_on: Option<Vec<ExecutionResult>>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(skip)]
    pub templates: StatocystsTemplates,
}

impl StatocystsChannelConfig {
    /// Enabled channel that stays quiet on skipped runs
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            enabled: true,
            send_on: Some(DELIVERED_OUTCOMES.to_vec()),
            urls,
            templates: StatocystsTemplates::default(),
        }
    }

    pub fn with_send_on(mut self, send_on: Vec<ExecutionResult>) -> Self {
        self.send_on = Some(send_on);
        self
    }

    pub fn with_templates(mut self, templates: StatocystsTemplates) -> Self {
        self.templates = templates;
        self
    }

    fn validate(&self) -> AppResult<()> {
        for url in &self.urls {
            BroadcastTarget::parse(url)?;
        }
        Ok(())
    }
}

/// Generic JSON webhook with a structured body template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookChannelConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_on: Option<Vec<ExecutionResult>>,
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(skip)]
    pub templates: WebhookTemplates,
}

impl WebhookChannelConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            send_on: None,
            url: url.into(),
            method: HttpMethod::default(),
            headers: HashMap::new(),
            timeout_seconds: default_timeout(),
            templates: WebhookTemplates::default(),
        }
    }

    pub fn with_send_on(mut self, send_on: Vec<ExecutionResult>) -> Self {
        self.send_on = Some(send_on);
        self
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_templates(mut self, templates: WebhookTemplates) -> Self {
        self.templates = templates;
        self
    }

    fn validate(&self) -> AppResult<()> {
        if self.url.is_empty() {
            return Ok(());
        }
        validate_http_url("url", &self.url)?;
        if self.timeout_seconds == 0 {
            return Err(AppError::validation(
                "timeout_seconds",
                "Timeout must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Tagged union over every supported channel kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChannelConfig {
    Bark(BarkChannelConfig),
    Statocysts(StatocystsChannelConfig),
    Webhook(WebhookChannelConfig),
}

impl ChannelConfig {
    pub fn kind(&self) -> ChannelKind {
        match self {
            ChannelConfig::Bark(_) => ChannelKind::Bark,
            ChannelConfig::Statocysts(_) => ChannelKind::Statocysts,
            ChannelConfig::Webhook(_) => ChannelKind::Webhook,
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            ChannelConfig::Bark(c) => c.enabled,
            ChannelConfig::Statocysts(c) => c.enabled,
            ChannelConfig::Webhook(c) => c.enabled,
        }
    }

    /// Effective send condition: the configured set, else the kind default
    pub fn send_on(&self) -> &[ExecutionResult] {
        let configured = match self {
            ChannelConfig::Bark(c) => c.send_on.as_deref(),
            ChannelConfig::Statocysts(c) => c.send_on.as_deref(),
            ChannelConfig::Webhook(c) => c.send_on.as_deref(),
        };
        configured.unwrap_or_else(|| self.kind().default_send_on())
    }

    pub fn should_send(&self, result: ExecutionResult) -> bool {
        self.send_on().contains(&result)
    }

    /// Checks provider-specific fields; templates are not inspected
    pub fn validate(&self) -> AppResult<()> {
        match self {
            ChannelConfig::Bark(c) => c.validate(),
            ChannelConfig::Statocysts(c) => c.validate(),
            ChannelConfig::Webhook(c) => c.validate(),
        }
    }
}

impl From<BarkChannelConfig> for ChannelConfig {
    fn from(config: BarkChannelConfig) -> Self {
        ChannelConfig::Bark(config)
    }
}

impl From<StatocystsChannelConfig> for ChannelConfig {
    fn from(config: StatocystsChannelConfig) -> Self {
        ChannelConfig::Statocysts(config)
    }
}

impl From<WebhookChannelConfig> for ChannelConfig {
    fn from(config: WebhookChannelConfig) -> Self {
        ChannelConfig::Webhook(config)
    }
}

fn validate_http_url(field: &str, value: &str) -> AppResult<()> {
    let url = Url::parse(value).map_err(|_| AppError::validation(field, "Invalid URL format"))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(AppError::validation(
            field,
            "URL must use http or https protocol",
        ));
    }

    Ok(())
}
