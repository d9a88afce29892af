//! Log Model (activity + error log)

use super::{impl_document, serde_helpers};
use serde::{Deserialize, Serialize};
use shared::models::LogLevel;
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// `None` for errors raised outside an authenticated request
    pub owner: Option<String>,
    #[serde(default)]
    pub level: LogLevel,
    pub action: String,
    pub message: String,
    pub resource: Option<String>,
    pub created_at: i64,
}

impl_document!(LogEntry, "log");
