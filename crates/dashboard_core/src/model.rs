use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type MessageId = i64;
pub type RedoId = i64;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_CACHE_EXPIRY_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    System,
    FileProcess,
    Error,
    Success,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::System => "system",
            MessageKind::FileProcess => "file_process",
            MessageKind::Error => "error",
            MessageKind::Success => "success",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One backend event as returned by `GET /api/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: MessageId,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Only meaningful for `file_process` messages.
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub timestamp: NaiveDateTime,
}

impl Message {
    pub fn is_successful_file_process(&self) -> bool {
        self.kind == MessageKind::FileProcess && self.success
    }

    pub fn is_failed_file_process(&self) -> bool {
        self.kind == MessageKind::FileProcess && !self.success
    }

    /// The server sends an empty string when a file had no destination.
    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref().filter(|dest| !dest.is_empty())
    }

    pub fn text(&self) -> Option<&str> {
        self.message.as_deref().filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub target: String,
}

impl DirectoryConfig {
    pub fn is_fully_populated(&self) -> bool {
        !self.name.is_empty() && !self.source.is_empty() && !self.target.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedoCommand {
    pub id: RedoId,
    #[serde(default)]
    pub message: Option<String>,
    pub timestamp: NaiveDateTime,
}

/// Whole configuration object, round-tripped through `/api/config`.
///
/// Keys this client does not edit are kept in `extra` and written back on
/// save, so a load-modify-save cycle never drops server-side settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb_api_key: String,
    #[serde(default)]
    pub douban_cookies: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_cache_expiry_days")]
    pub cache_expiry_days: u32,
    #[serde(default)]
    pub directories: Vec<DirectoryConfig>,
    #[serde(default)]
    pub monitor_enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: String::new(),
            douban_cookies: String::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            cache_expiry_days: DEFAULT_CACHE_EXPIRY_DAYS,
            directories: Vec::new(),
            monitor_enabled: false,
            extra: Map::new(),
        }
    }
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_cache_expiry_days() -> u32 {
    DEFAULT_CACHE_EXPIRY_DAYS
}

/// Active list filter. `Redo` selects the redo-command list rather than a
/// message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    #[default]
    All,
    FileProcess,
    Error,
    System,
    Redo,
}

impl Filter {
    pub fn message_kind(self) -> Option<MessageKind> {
        match self {
            Filter::FileProcess => Some(MessageKind::FileProcess),
            Filter::Error => Some(MessageKind::Error),
            Filter::System => Some(MessageKind::System),
            Filter::All | Filter::Redo => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::FileProcess => "file_process",
            Filter::Error => "error",
            Filter::System => "system",
            Filter::Redo => "redo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchMode {
    All,
    Compare,
}

impl BatchMode {
    pub fn label(self) -> &'static str {
        match self {
            BatchMode::All => "Batch processing",
            BatchMode::Compare => "Compare processing",
        }
    }
}

/// Body of `POST /api/run_batch_process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRequest {
    pub source_dir: String,
    pub target_dir: String,
    pub mode: BatchMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub success_count: u32,
    pub error_count: u32,
    pub total: Option<u32>,
}
