//! Flat message collector over the notification manager.
//!
//! Legacy callers have no account context, so every collected line is filed
//! under account number 0.

use std::fmt;
use std::sync::Arc;

use crate::external::{HttpTransport, Transport};
use crate::models::{
    BarkChannelConfig, ChannelConfig, ExecutionResult, NewLogEntry, StatocystsChannelConfig,
};
use crate::services::notifications::NotificationManager;

/// Account number used for every line collected through the legacy API
const NO_ACCOUNT: u32 = 0;

/// Callback run after `push` when the run recorded an error
pub type ErrorCallback = Box<dyn Fn() + Send + Sync>;

/// Options accepted by the legacy constructor
#[derive(Default)]
pub struct CreateMessageCollectorOptions {
    /// Broadcast URLs, sent through one statocysts channel
    pub notification_urls: Vec<String>,
    /// Bark device keys
    pub bark_tokens: Vec<String>,
    pub on_error: Option<ErrorCallback>,
}

impl fmt::Debug for CreateMessageCollectorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateMessageCollectorOptions")
            .field("notification_urls", &self.notification_urls)
            .field("bark_tokens", &self.bark_tokens)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Options for the deprecated [`MessageCollector::collect`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectOptions {
    /// Also echo the message to the console
    pub output: bool,
    pub is_error: bool,
}

pub struct MessageCollector {
    manager: NotificationManager,
    on_error: Option<ErrorCallback>,
}

impl MessageCollector {
    pub fn new(options: CreateMessageCollectorOptions) -> Self {
        Self::with_transport(options, Arc::new(HttpTransport::default()))
    }

    pub fn with_transport(
        options: CreateMessageCollectorOptions,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let channels = build_channels_from_legacy_options(&options);
        Self {
            manager: NotificationManager::with_transport(channels, transport),
            on_error: options.on_error,
        }
    }

    /// Console only
    pub fn log(&self, message: &str) {
        self.manager.log(message);
    }

    /// Console only; flags the run as errored
    pub fn error(&mut self, message: &str) {
        self.manager.error(message);
    }

    /// Notification only
    pub fn notify(&mut self, message: &str) {
        self.add_message(message, false);
    }

    pub fn notify_error(&mut self, message: &str) {
        self.add_message(message, true);
    }

    /// Console and notification
    pub fn info(&mut self, message: &str) {
        tracing::info!("{}", message);
        self.add_message(message, false);
    }

    pub fn info_error(&mut self, message: &str) {
        tracing::error!("{}", message);
        self.add_message(message, true);
    }

    pub fn set_result(&mut self, result: ExecutionResult) {
        self.manager.set_result(result);
    }

    /// Dispatches the report, then runs the error callback if the run errored
    pub async fn push(&self) {
        self.manager.push().await;

        if let Some(on_error) = &self.on_error {
            if self.manager.has_error() {
                on_error();
            }
        }
    }

    pub fn has_error(&self) -> bool {
        self.manager.has_error()
    }

    pub fn manager(&self) -> &NotificationManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut NotificationManager {
        &mut self.manager
    }

    /// Appends `message`, optionally echoing it to the console.
    ///
    /// An error message flags the run; a non-error one never clears the flag.
    #[deprecated(note = "use notify, info or notify_error instead")]
    pub fn collect(&mut self, message: &str, options: CollectOptions) {
        self.add_message(message, options.is_error);

        if options.output {
            if options.is_error {
                tracing::error!("{}", message);
            } else {
                tracing::info!("{}", message);
            }
        }
    }

    fn add_message(&mut self, message: &str, is_error: bool) {
        let entry = if is_error {
            NewLogEntry::error(NO_ACCOUNT, message)
        } else {
            NewLogEntry::info(NO_ACCOUNT, message)
        };
        self.manager.add_log(entry);
    }
}

/// Statocysts first (never on skipped), then bark (on every outcome)
fn build_channels_from_legacy_options(
    options: &CreateMessageCollectorOptions,
) -> Vec<ChannelConfig> {
    let mut channels = Vec::new();

    if !options.notification_urls.is_empty() {
        channels.push(
            StatocystsChannelConfig::new(options.notification_urls.clone())
                .with_send_on(vec![ExecutionResult::Success, ExecutionResult::Failed])
                .into(),
        );
    }

    if !options.bark_tokens.is_empty() {
        channels.push(
            BarkChannelConfig::new(options.bark_tokens.clone())
                .with_send_on(ExecutionResult::ALL.to_vec())
                .into(),
        );
    }

    channels
}
