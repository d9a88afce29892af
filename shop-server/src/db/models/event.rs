//! Event Model (shop calendar)

use super::{impl_document, serde_helpers};
use serde::{Deserialize, Serialize};
use shared::models::EventKind;
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub owner: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub kind: EventKind,
    pub starts_at: i64,
    pub ends_at: Option<i64>,
    #[serde(default)]
    pub all_day: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl_document!(Event, "event", owned);
