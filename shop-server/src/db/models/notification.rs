//! Notification Model

use super::{impl_document, serde_helpers};
use serde::{Deserialize, Serialize};
use shared::models::NotificationKind;
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub owner: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    /// Related document ("product:key", "payment:key", ...)
    pub reference: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: i64,
}

impl_document!(Notification, "notification", owned);
