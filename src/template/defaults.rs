//! Built-in templates reproducing the check-in report format.

use serde_json::{Value as JsonValue, json};

use super::{TemplateDef, func, text};
use crate::error::AppResult;
use crate::models::{ExecutionResult, LogEntry, NotificationData};

pub const BARK_TITLE: &str = "森空岛自动签到";
pub const STATOCYSTS_TITLE: &str = "【森空岛每日签到】";
const REPORT_HEADER: &str = "## 森空岛每日签到";

pub fn bark_title() -> TemplateDef {
    text(BARK_TITLE)
}

/// Subtitle derived from the run outcome
pub fn bark_subtitle() -> TemplateDef {
    func(|data: &NotificationData| {
        Ok(match data.meta.execution_result {
            ExecutionResult::Skipped => "重复签到",
            ExecutionResult::Failed => "失败❗",
            ExecutionResult::Success => "成功",
        }
        .to_string())
    })
}

pub fn bark_body() -> TemplateDef {
    func(build_full_body)
}

pub fn statocysts_title() -> TemplateDef {
    text(STATOCYSTS_TITLE)
}

pub fn statocysts_body() -> TemplateDef {
    func(build_full_body)
}

/// Structured JSON body for webhook channels
pub fn webhook_body() -> TemplateDef<JsonValue> {
    func(|data: &NotificationData| {
        Ok(json!({
            "title": STATOCYSTS_TITLE,
            "result": data.meta.execution_result,
            "hasError": data.meta.has_error,
            "accounts": data.accounts,
            "games": data.games,
        }))
    })
}

/// Full report body.
///
/// When a collected message already carries report separators (`---` or `==`)
/// the caller formatted the report itself, so the messages are passed through
/// verbatim. Otherwise the report is built from the structured statistics.
pub fn build_full_body(data: &NotificationData) -> AppResult<String> {
    let preformatted = data
        .logs
        .iter()
        .any(|log| log.message.contains("---") || log.message.contains("=="));

    if preformatted {
        return Ok(data
            .logs
            .iter()
            .map(|log| log.message.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"));
    }

    Ok(build_structured_body(data))
}

fn build_structured_body(data: &NotificationData) -> String {
    let mut lines: Vec<String> = vec![REPORT_HEADER.to_string()];

    for (account_number, logs) in group_logs_by_account(&data.logs) {
        if account_number == 0 {
            continue;
        }
        lines.push(String::new());
        lines.push(format!(
            "--- 账号 {}/{} ---",
            account_number, data.accounts.total
        ));
        lines.extend(logs.iter().map(|log| log.message.clone()));
    }

    let accounts = &data.accounts;
    lines.push(String::new());
    lines.push("========== 执行摘要 ==========".to_string());
    lines.push("账号统计:".to_string());
    lines.push(format!("  • 总数: {}", accounts.total));
    lines.push(format!("  • 成功: {}", accounts.successful));
    lines.push(format!("  • 跳过: {}", accounts.skipped));

    if accounts.failed > 0 {
        let indexes = accounts
            .failed_indexes
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", #");
        lines.push(format!("  • 失败: {} (账号 #{})", accounts.failed, indexes));
    }

    for game in &data.games {
        lines.push(String::new());
        lines.push(format!("【{}】角色统计:", game.game_name));
        lines.push(format!("  • 总数: {}", game.total));
        lines.push(format!("  • 本次签到成功: {}", game.succeeded));
        lines.push(format!("  • 今天已签到: {}", game.already_attended));
        if game.failed > 0 {
            lines.push(format!("  • 签到失败: {}", game.failed));
        }
    }

    lines.join("\n\n")
}

/// Groups logs by account, keeping first-seen account order
fn group_logs_by_account(logs: &[LogEntry]) -> Vec<(u32, Vec<&LogEntry>)> {
    let mut groups: Vec<(u32, Vec<&LogEntry>)> = Vec::new();
    for log in logs {
        match groups.iter_mut().find(|(n, _)| *n == log.account_number) {
            Some((_, entries)) => entries.push(log),
            None => groups.push((log.account_number, vec![log])),
        }
    }
    groups
}
