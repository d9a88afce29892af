//! Notification Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::Notification;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Newest first
    pub async fn find_all(&self, owner: &str, unread_only: bool) -> RepoResult<Vec<Notification>> {
        let sql = if unread_only {
            "SELECT * FROM notification WHERE owner = $owner AND is_read = false ORDER BY created_at DESC"
        } else {
            "SELECT * FROM notification WHERE owner = $owner ORDER BY created_at DESC"
        };
        self.base.query_owned(sql, owner, vec![]).await
    }

    pub async fn find_by_id(&self, owner: &str, id: &str) -> RepoResult<Option<Notification>> {
        self.base.get_owned::<Notification>(owner, id).await
    }

    pub async fn count_unread(&self, owner: &str) -> RepoResult<u64> {
        self.base
            .count_owned(
                "SELECT count() FROM notification WHERE owner = $owner AND is_read = false GROUP ALL",
                owner,
                vec![],
            )
            .await
    }

    pub async fn create(&self, notification: Notification) -> RepoResult<Notification> {
        self.base.insert(notification).await
    }

    pub async fn save(&self, notification: Notification) -> RepoResult<Notification> {
        self.base.save(notification).await
    }

    /// Mark every unread notification of the shop as read, returns how many changed
    pub async fn mark_all_read(&self, owner: &str) -> RepoResult<usize> {
        let updated: Vec<Notification> = self
            .base
            .query_owned(
                "UPDATE notification SET is_read = true WHERE owner = $owner AND is_read = false",
                owner,
                vec![],
            )
            .await?;
        Ok(updated.len())
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.base.remove::<Notification>(id).await
    }
}
