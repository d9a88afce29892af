//! Event API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{EventCreate, EventQuery, EventUpdate, UpcomingQuery};
use shared::util::{DAY_MILLIS, now_millis};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Document, Event};
use crate::db::repository::EventRepository;
use crate::utils::time::date_range;
use crate::utils::{ApiResponse, AppError, AppJson, AppQuery, AppResult, ErrorCode, ok};

const DEFAULT_UPCOMING_DAYS: u32 = 7;
const MAX_UPCOMING_DAYS: u32 = 90;

/// GET /api/events?from=&to=
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppQuery(query): AppQuery<EventQuery>,
) -> AppResult<Json<ApiResponse<Vec<Event>>>> {
    let (from, to) = date_range(query.from.as_deref(), query.to.as_deref())?;
    let events = EventRepository::new(state.get_db())
        .find_range(user.owner(), from, to)
        .await?;
    Ok(ok(events))
}

/// GET /api/events/upcoming?days= - 未来 N 天 (默认 7, 最多 90)
pub async fn upcoming(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppQuery(query): AppQuery<UpcomingQuery>,
) -> AppResult<Json<ApiResponse<Vec<Event>>>> {
    let days = query
        .days
        .unwrap_or(DEFAULT_UPCOMING_DAYS)
        .clamp(1, MAX_UPCOMING_DAYS);
    let now = now_millis();
    let events = EventRepository::new(state.get_db())
        .find_range(user.owner(), Some(now), Some(now + i64::from(days) * DAY_MILLIS))
        .await?;
    Ok(ok(events))
}

/// GET /api/events/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Event>>> {
    Ok(ok(find(&state, &user, &id).await?))
}

/// POST /api/events
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<EventCreate>,
) -> AppResult<Json<ApiResponse<Event>>> {
    payload.validate()?;
    check_range(payload.starts_at, payload.ends_at)?;

    let now = now_millis();
    let event = EventRepository::new(state.get_db())
        .create(Event {
            id: None,
            owner: user.owner().to_string(),
            title: payload.title.trim().to_string(),
            description: payload.description,
            kind: payload.kind,
            starts_at: payload.starts_at,
            ends_at: payload.ends_at,
            all_day: payload.all_day,
            created_at: now,
            updated_at: now,
        })
        .await?;
    tracing::debug!(event = %event.id_string(), "Event created");
    Ok(ok(event))
}

/// PUT /api/events/:id
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<EventUpdate>,
) -> AppResult<Json<ApiResponse<Event>>> {
    payload.validate()?;
    let mut event = find(&state, &user, &id).await?;

    if let Some(title) = payload.title {
        event.title = title.trim().to_string();
    }
    if let Some(description) = payload.description {
        event.description = Some(description);
    }
    if let Some(kind) = payload.kind {
        event.kind = kind;
    }
    if let Some(starts_at) = payload.starts_at {
        event.starts_at = starts_at;
    }
    if let Some(ends_at) = payload.ends_at {
        event.ends_at = Some(ends_at);
    }
    if let Some(all_day) = payload.all_day {
        event.all_day = all_day;
    }
    check_range(event.starts_at, event.ends_at)?;
    event.updated_at = now_millis();

    Ok(ok(EventRepository::new(state.get_db()).save(event).await?))
}

/// DELETE /api/events/:id
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let event = find(&state, &user, &id).await?;
    Ok(ok(EventRepository::new(state.get_db())
        .delete(&event.id_string())
        .await?))
}

async fn find(state: &ServerState, user: &CurrentUser, id: &str) -> AppResult<Event> {
    EventRepository::new(state.get_db())
        .find_by_id(user.owner(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound).with_detail("id", id))
}

fn check_range(starts_at: i64, ends_at: Option<i64>) -> AppResult<()> {
    match ends_at {
        Some(end) if end < starts_at => Err(AppError::with_message(
            ErrorCode::EventInvalidRange,
            "ends_at must not be before starts_at",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(check_range(100, None).is_ok());
        assert!(check_range(100, Some(100)).is_ok());
        let err = check_range(100, Some(99)).unwrap_err();
        assert_eq!(err.code, ErrorCode::EventInvalidRange);
    }
}
