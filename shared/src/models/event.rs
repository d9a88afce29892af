//! Event Model (shop calendar)

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Promotion,
    Restock,
    Meeting,
    #[default]
    Other,
}

/// Create event payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EventCreate {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub kind: EventKind,
    pub starts_at: i64,
    pub ends_at: Option<i64>,
    #[serde(default)]
    pub all_day: bool,
}

/// Update event payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EventUpdate {
    #[validate(length(min = 1, max = 200))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<EventKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
}

/// `GET /api/events?from=&to=` (`YYYY-MM-DD`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// `GET /api/events/upcoming?days=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpcomingQuery {
    pub days: Option<u32>,
}
