//! URL-addressed broadcast sender.
//!
//! One sender targets every URL of a statocysts channel; each
//! [`BroadcastTarget`] decides its own wire format.

use futures::future::join_all;
use serde_json::json;

use crate::error::AppResult;
use crate::external::{JsonRequest, Transport};
use crate::models::BroadcastTarget;

impl BroadcastTarget {
    fn request(&self, title: &str, body: &str) -> JsonRequest {
        match self {
            BroadcastTarget::Json { url } => {
                JsonRequest::post(url.clone(), json!({ "title": title, "body": body }))
            }
            BroadcastTarget::Bark { server, device_key } => JsonRequest::post(
                format!("{}/push", server),
                json!({ "device_key": device_key, "title": title, "body": body }),
            ),
        }
    }
}

/// Sends one message to a fixed set of targets
pub struct BroadcastSender<'a> {
    targets: Vec<BroadcastTarget>,
    transport: &'a dyn Transport,
}

impl<'a> BroadcastSender<'a> {
    /// Parses every URL up front; a single bad URL rejects the whole set
    pub fn new(urls: &[String], transport: &'a dyn Transport) -> AppResult<Self> {
        let targets = urls
            .iter()
            .map(|url| BroadcastTarget::parse(url))
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self { targets, transport })
    }

    pub fn targets(&self) -> &[BroadcastTarget] {
        &self.targets
    }

    /// Delivers to all targets concurrently. Every target is attempted; the
    /// first failure in target order is returned once all have settled.
    pub async fn send(&self, title: &str, body: &str) -> AppResult<()> {
        let results = join_all(
            self.targets
                .iter()
                .map(|target| self.transport.send(target.request(title, body))),
        )
        .await;

        results.into_iter().try_for_each(|result| result.map(|_| ()))
    }
}
