//! Dispatch tests for the notification manager

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::NotificationManager;
use crate::error::{AppError, AppResult};
use crate::external::{JsonRequest, Transport, TransportResponse};
use crate::models::*;
use crate::template::func;

/// Transport double recording every request it receives
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<JsonRequest>>,
    fail_all: bool,
    fail_matching: Option<String>,
}

impl RecordingTransport {
    /// Rejects every request with a 500
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Default::default()
        }
    }

    /// Rejects requests whose URL contains `pattern`
    pub fn failing_for(pattern: &str) -> Self {
        Self {
            fail_matching: Some(pattern.to_string()),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<JsonRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: JsonRequest) -> AppResult<TransportResponse> {
        let rejected = self.fail_all
            || self
                .fail_matching
                .as_deref()
                .is_some_and(|pattern| request.url.contains(pattern));
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);

        if rejected {
            return Err(AppError::HttpStatus {
                target: url,
                status: 500,
                body: None,
            });
        }
        Ok(TransportResponse {
            status: 200,
            body: None,
        })
    }
}

fn manager_with(channels: Vec<ChannelConfig>) -> (NotificationManager, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let manager = NotificationManager::with_transport(channels, transport.clone());
    (manager, transport)
}

fn hook(name: &str) -> String {
    format!("https://{}.example.com/hook", name)
}

#[cfg(test)]
mod collection_tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_manager_defaults() {
        let (manager, _) = manager_with(vec![]);
        assert_eq!(manager.data().meta.execution_result, ExecutionResult::Success);
        assert!(!manager.has_error());
    }

    #[test]
    fn test_set_result_last_call_wins() {
        let (mut manager, _) = manager_with(vec![]);
        manager.set_result(ExecutionResult::Failed);
        manager.set_result(ExecutionResult::Skipped);
        assert_eq!(manager.data().meta.execution_result, ExecutionResult::Skipped);
    }

    #[test]
    fn test_error_log_marks_error() {
        let (mut manager, _) = manager_with(vec![]);
        manager.add_log(NewLogEntry::info(1, "fine"));
        assert!(!manager.has_error());
        manager.add_log(NewLogEntry::error(1, "broken").with_game(1));
        assert!(manager.has_error());
        assert_eq!(manager.data().logs[1].game_id, Some(1));
    }

    #[test]
    fn test_warning_does_not_mark_error() {
        let (mut manager, _) = manager_with(vec![]);
        manager.add_log(NewLogEntry::warning(1, "slow"));
        assert!(!manager.has_error());
    }

    #[test]
    fn test_console_error_marks_error_without_collecting() {
        let (mut manager, _) = manager_with(vec![]);
        manager.log("hello");
        manager.error("oops");
        assert!(manager.has_error());
        assert!(manager.data().logs.is_empty());
    }

    #[test]
    fn test_ensure_game_stats_is_idempotent() {
        let (mut manager, _) = manager_with(vec![]);
        manager.ensure_game_stats(1, "明日方舟").total = 2;
        let again = manager.ensure_game_stats(1, "renamed");
        assert_eq!(again.total, 2);
        assert_eq!(again.game_name, "明日方舟");
        assert_eq!(manager.data().games.len(), 1);
    }

    #[test]
    fn test_games_keep_first_seen_order() {
        let (mut manager, _) = manager_with(vec![]);
        manager.ensure_game_stats(3, "C");
        manager.ensure_game_stats(1, "A");
        manager.ensure_game_stats(3, "C");
        let ids: Vec<u32> = manager.data().games.iter().map(|g| g.game_id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert!(manager.get_game_stats(1).is_some());
        assert!(manager.get_game_stats(2).is_none());
    }

    #[test]
    fn test_update_account_stats_merges() {
        let (mut manager, _) = manager_with(vec![]);
        manager.update_account_stats(AccountStatsUpdate {
            total: Some(3),
            ..Default::default()
        });
        manager.update_account_stats(AccountStatsUpdate {
            failed: Some(1),
            failed_indexes: Some(vec![2]),
            ..Default::default()
        });
        let accounts = &manager.data().accounts;
        assert_eq!(accounts.total, 3);
        assert_eq!(accounts.failed, 1);
        assert_eq!(accounts.failed_indexes, vec![2]);
    }

    #[test]
    fn test_log_timestamps_non_decreasing() {
        let (mut manager, _) = manager_with(vec![]);
        for i in 0..50 {
            manager.add_log(NewLogEntry::info(i, "line"));
        }
        let logs = &manager.data().logs;
        assert!(logs.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    proptest! {
        #[test]
        fn property_one_entry_per_game_with_latest_values(
            updates in prop::collection::vec(
                (0u32..4, prop::option::of(0u32..100), prop::option::of(0u32..100)),
                1..30,
            )
        ) {
            let (mut manager, _) = manager_with(vec![]);
            let mut expected: std::collections::HashMap<u32, (u32, u32)> = Default::default();

            for (game_id, total, failed) in &updates {
                manager.update_game_stats(*game_id, "game", GameStatsUpdate {
                    total: *total,
                    failed: *failed,
                    ..Default::default()
                });
                let entry = expected.entry(*game_id).or_insert((0, 0));
                if let Some(total) = total { entry.0 = *total; }
                if let Some(failed) = failed { entry.1 = *failed; }
            }

            prop_assert_eq!(manager.data().games.len(), expected.len());
            for (game_id, (total, failed)) in expected {
                let stats = manager.get_game_stats(game_id).unwrap();
                prop_assert_eq!(stats.total, total);
                prop_assert_eq!(stats.failed, failed);
            }
        }

        #[test]
        fn property_has_error_is_monotonic(levels in prop::collection::vec(0u8..3, 1..40)) {
            let (mut manager, _) = manager_with(vec![]);
            let mut seen_error = false;
            for level in levels {
                let level = match level {
                    0 => LogLevel::Info,
                    1 => LogLevel::Warning,
                    _ => LogLevel::Error,
                };
                manager.add_log(NewLogEntry::new(1, level, "m"));
                seen_error |= level == LogLevel::Error;
                prop_assert_eq!(manager.has_error(), seen_error);
            }
        }
    }
}

#[cfg(test)]
mod dispatch_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_on_filters_channels() {
        let channels = vec![
            StatocystsChannelConfig::new(vec![hook("a")])
                .with_send_on(vec![ExecutionResult::Success, ExecutionResult::Failed])
                .into(),
            StatocystsChannelConfig::new(vec![hook("b")])
                .with_send_on(vec![ExecutionResult::Skipped])
                .into(),
        ];
        let (mut manager, transport) = manager_with(channels);
        manager.set_result(ExecutionResult::Skipped);

        manager.push().await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, hook("b"));
    }

    #[tokio::test]
    async fn test_disabled_channel_is_skipped() {
        let mut disabled = StatocystsChannelConfig::new(vec![hook("a")]);
        disabled.enabled = false;
        let (manager, transport) = manager_with(vec![
            disabled.into(),
            StatocystsChannelConfig::new(vec![hook("b")]).into(),
        ]);

        manager.push().await;

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec![hook("b")]);
    }

    #[tokio::test]
    async fn test_failing_channel_does_not_block_next() {
        let transport = Arc::new(RecordingTransport::failing_for("api.day.app"));
        let manager = NotificationManager::with_transport(
            vec![
                BarkChannelConfig::new(vec!["key".to_string()]).into(),
                StatocystsChannelConfig::new(vec![hook("after")]).into(),
            ],
            transport.clone(),
        );

        manager.push().await;

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec!["https://api.day.app/push".to_string(), hook("after")]
        );
    }

    #[tokio::test]
    async fn test_failing_template_does_not_block_next() {
        let broken = StatocystsChannelConfig::new(vec![hook("broken")]).with_templates(
            StatocystsTemplates {
                title: func(|_: &NotificationData| Err(AppError::template("boom"))),
                ..Default::default()
            },
        );
        let (manager, transport) = manager_with(vec![
            broken.into(),
            StatocystsChannelConfig::new(vec![hook("ok")]).into(),
        ]);

        manager.push().await;

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec![hook("ok")]);
    }

    #[tokio::test]
    async fn test_push_twice_dispatches_twice() {
        let (manager, transport) =
            manager_with(vec![StatocystsChannelConfig::new(vec![hook("a")]).into()]);

        manager.push().await;
        manager.push().await;

        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_push_does_not_touch_has_error() {
        let transport = Arc::new(RecordingTransport::failing());
        let manager = NotificationManager::with_transport(
            vec![StatocystsChannelConfig::new(vec![hook("a")]).into()],
            transport.clone(),
        );

        manager.push().await;

        assert!(!manager.has_error());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_structured_report_reaches_channel() {
        let (mut manager, transport) =
            manager_with(vec![StatocystsChannelConfig::new(vec![hook("a")]).into()]);
        manager.update_account_stats(AccountStatsUpdate {
            total: Some(3),
            successful: Some(3),
            skipped: Some(0),
            failed: Some(0),
            failed_indexes: Some(vec![]),
        });
        manager.update_game_stats(
            1,
            "X",
            GameStatsUpdate {
                total: Some(3),
                succeeded: Some(3),
                already_attended: Some(0),
                failed: Some(0),
            },
        );

        manager.push().await;

        let requests = transport.requests();
        assert_eq!(requests[0].body["title"], "【森空岛每日签到】");
        let body = requests[0].body["body"].as_str().unwrap();
        let header = body.find("## 森空岛每日签到").unwrap();
        let summary = body.find("  • 总数: 3").unwrap();
        let game = body.find("【X】角色统计:").unwrap();
        assert!(header < summary && summary < game);
        assert!(!body.contains("失败"));
    }

    #[tokio::test]
    async fn test_bark_helper_fires_on_skipped() {
        let (mut manager, transport) = manager_with(vec![
            BarkChannelConfig::new(vec!["key".to_string()]).into(),
            StatocystsChannelConfig::new(vec![hook("a")]).into(),
        ]);
        manager.set_result(ExecutionResult::Skipped);

        manager.push().await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body["subtitle"], "重复签到");
    }

    #[tokio::test]
    async fn test_configured_bark_without_send_on_ignores_skipped() {
        let bark: ChannelConfig = serde_json::from_value(serde_json::json!({
            "type": "bark",
            "tokens": ["k"],
        }))
        .unwrap();
        let (mut manager, transport) = manager_with(vec![bark]);
        manager.set_result(ExecutionResult::Skipped);

        manager.push().await;
        assert!(transport.requests().is_empty());

        manager.set_result(ExecutionResult::Success);
        manager.push().await;
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_render_for_channel() {
        let (manager, _) = manager_with(vec![
            StatocystsChannelConfig::new(vec![]).into(),
            BarkChannelConfig::new(vec![]).into(),
        ]);

        let rendered = manager
            .render_for_channel(ChannelKind::Bark)
            .unwrap()
            .unwrap();
        assert_eq!(rendered.title, "森空岛自动签到");
        assert!(manager.render_for_channel(ChannelKind::Webhook).is_none());
    }
}
