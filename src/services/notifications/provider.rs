//! Core channel adapter trait.
//!
//! An adapter pairs one channel config with the shared transport. It renders
//! the snapshot with the config's own templates and turns the rendered
//! content into a provider request.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{NotificationData, RenderedNotification};

/// Trait for notification channel adapters (bark, broadcast, webhook)
///
/// Adapters do not swallow their own failures: both `render` and `send`
/// report errors to the caller, and the manager's dispatch loop decides
/// what to do with them.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Returns the channel name for logging
    fn name(&self) -> &'static str;

    /// Renders the snapshot with this channel's templates. Must not mutate
    /// anything and must be deterministic for a given snapshot.
    fn render(&self, data: &NotificationData) -> AppResult<RenderedNotification>;

    /// Sends rendered content, issuing at most one provider call per target.
    /// A channel with no targets configured is a successful no-op.
    async fn send(&self, rendered: &RenderedNotification) -> AppResult<()>;
}
