//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{NotificationQuery, UnreadCount};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Document, Notification};
use crate::db::repository::NotificationRepository;
use crate::utils::{ApiResponse, AppError, AppQuery, AppResult, ErrorCode, ok, ok_with_message};

/// GET /api/notifications?unread=
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppQuery(query): AppQuery<NotificationQuery>,
) -> AppResult<Json<ApiResponse<Vec<Notification>>>> {
    let notifications = NotificationRepository::new(state.get_db())
        .find_all(user.owner(), query.unread)
        .await?;
    Ok(ok(notifications))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UnreadCount>>> {
    let unread = NotificationRepository::new(state.get_db())
        .count_unread(user.owner())
        .await?;
    Ok(ok(UnreadCount { unread }))
}

/// PUT /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let repo = NotificationRepository::new(state.get_db());
    let mut notification = find(&repo, &user, &id).await?;
    if notification.is_read {
        return Ok(ok(notification));
    }
    notification.is_read = true;
    Ok(ok(repo.save(notification).await?))
}

/// PUT /api/notifications/read-all - 返回标记数量
pub async fn mark_all_read(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<usize>>> {
    let updated = NotificationRepository::new(state.get_db())
        .mark_all_read(user.owner())
        .await?;
    Ok(ok_with_message(
        updated,
        format!("{} notifications marked as read", updated),
    ))
}

/// DELETE /api/notifications/:id
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let repo = NotificationRepository::new(state.get_db());
    let notification = find(&repo, &user, &id).await?;
    Ok(ok(repo.delete(&notification.id_string()).await?))
}

async fn find(repo: &NotificationRepository, user: &CurrentUser, id: &str) -> AppResult<Notification> {
    repo.find_by_id(user.owner(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NotificationNotFound).with_detail("id", id))
}
