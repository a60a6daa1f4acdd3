//! Run snapshot models.
//!
//! `NotificationData` is the single aggregate a check-in run fills in while it
//! executes. Only `NotificationManager` mutates it; templates and channel
//! adapters receive it by shared reference.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::AppResult;

// ============================================================================
// Enums
// ============================================================================

/// Overall outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionResult {
    #[default]
    Success,
    Failed,
    Skipped,
}

impl ExecutionResult {
    pub const ALL: [ExecutionResult; 3] = [
        ExecutionResult::Success,
        ExecutionResult::Failed,
        ExecutionResult::Skipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionResult::Success => "success",
            ExecutionResult::Failed => "failed",
            ExecutionResult::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a collected log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Error,
    Warning,
}

// ============================================================================
// Statistics
// ============================================================================

/// Per-account counters of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub total: u32,
    /// Accounts whose every character signed in
    pub successful: u32,
    /// Accounts already signed in today
    pub skipped: u32,
    /// Accounts with at least one failure
    pub failed: u32,
    pub failed_indexes: Vec<u32>,
}

/// Field-wise overwrite for [`AccountStats`]. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountStatsUpdate {
    pub total: Option<u32>,
    pub successful: Option<u32>,
    pub skipped: Option<u32>,
    pub failed: Option<u32>,
    pub failed_indexes: Option<Vec<u32>>,
}

impl AccountStats {
    pub fn apply(&mut self, update: AccountStatsUpdate) {
        if let Some(total) = update.total {
            self.total = total;
        }
        if let Some(successful) = update.successful {
            self.successful = successful;
        }
        if let Some(skipped) = update.skipped {
            self.skipped = skipped;
        }
        if let Some(failed) = update.failed {
            self.failed = failed;
        }
        if let Some(failed_indexes) = update.failed_indexes {
            self.failed_indexes = failed_indexes;
        }
    }
}

/// Per-game character counters, one entry per `game_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub game_id: u32,
    pub game_name: String,
    pub total: u32,
    /// Signed in during this run
    pub succeeded: u32,
    /// Already signed in earlier today
    pub already_attended: u32,
    pub failed: u32,
}

impl GameStats {
    pub fn new(game_id: u32, game_name: impl Into<String>) -> Self {
        Self {
            game_id,
            game_name: game_name.into(),
            total: 0,
            succeeded: 0,
            already_attended: 0,
            failed: 0,
        }
    }

    pub fn apply(&mut self, update: GameStatsUpdate) {
        if let Some(total) = update.total {
            self.total = total;
        }
        if let Some(succeeded) = update.succeeded {
            self.succeeded = succeeded;
        }
        if let Some(already_attended) = update.already_attended {
            self.already_attended = already_attended;
        }
        if let Some(failed) = update.failed {
            self.failed = failed;
        }
    }
}

/// Field-wise overwrite for [`GameStats`]; identity fields are not updatable.
#[derive(Debug, Clone, Default)]
pub struct GameStatsUpdate {
    pub total: Option<u32>,
    pub succeeded: Option<u32>,
    pub already_attended: Option<u32>,
    pub failed: Option<u32>,
}

// ============================================================================
// Logs
// ============================================================================

/// A collected log line. The timestamp is assigned by the manager on insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// 1-based account number, 0 when there is no account context
    pub account_number: u32,
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<u32>,
    pub timestamp: Timestamp,
}

/// Caller-supplied part of a [`LogEntry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogEntry {
    pub account_number: u32,
    pub level: LogLevel,
    pub message: String,
    pub game_id: Option<u32>,
}

impl NewLogEntry {
    pub fn new(account_number: u32, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            account_number,
            level,
            message: message.into(),
            game_id: None,
        }
    }

    pub fn info(account_number: u32, message: impl Into<String>) -> Self {
        Self::new(account_number, LogLevel::Info, message)
    }

    pub fn error(account_number: u32, message: impl Into<String>) -> Self {
        Self::new(account_number, LogLevel::Error, message)
    }

    pub fn warning(account_number: u32, message: impl Into<String>) -> Self {
        Self::new(account_number, LogLevel::Warning, message)
    }

    pub fn with_game(mut self, game_id: u32) -> Self {
        self.game_id = Some(game_id);
        self
    }

    pub(crate) fn stamp(self, timestamp: Timestamp) -> LogEntry {
        LogEntry {
            account_number: self.account_number,
            level: self.level,
            message: self.message,
            game_id: self.game_id,
            timestamp,
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Run start
    pub timestamp: Timestamp,
    pub execution_result: ExecutionResult,
    pub has_error: bool,
}

/// Aggregate snapshot of one run, rendered by every channel on push
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    pub meta: Meta,
    pub accounts: AccountStats,
    pub games: Vec<GameStats>,
    pub logs: Vec<LogEntry>,
}

impl NotificationData {
    /// Zeroed snapshot stamped with the current time
    pub fn new() -> Self {
        Self {
            meta: Meta {
                timestamp: Timestamp::now(),
                execution_result: ExecutionResult::default(),
                has_error: false,
            },
            accounts: AccountStats::default(),
            games: Vec::new(),
            logs: Vec::new(),
        }
    }

    pub fn game(&self, game_id: u32) -> Option<&GameStats> {
        self.games.iter().find(|g| g.game_id == game_id)
    }

    /// JSON view used for placeholder lookups
    pub fn to_json(&self) -> AppResult<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Default for NotificationData {
    fn default() -> Self {
        Self::new()
    }
}

/// Channel-ready content produced fresh for every channel on every push
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderedNotification {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub body: String,
    /// Channel-specific fields
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}
