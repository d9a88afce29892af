//! Notification Service - in-app notifications for the shop owner
//!
//! Notifications are a side effect of business operations; a failure to
//! store one is logged and never fails the operation that raised it.

use crate::db::models::Notification;
use crate::db::repository::NotificationRepository;
use shared::models::NotificationKind;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
}

impl NotificationService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            repo: NotificationRepository::new(db),
        }
    }

    /// Store a notification (best effort)
    pub async fn notify(
        &self,
        owner: &str,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        reference: Option<String>,
    ) {
        let notification = Notification {
            id: None,
            owner: owner.to_string(),
            title: title.into(),
            message: message.into(),
            kind,
            reference,
            is_read: false,
            created_at: now_millis(),
        };

        match self.repo.create(notification).await {
            Ok(n) => tracing::debug!(owner = %owner, kind = ?kind, title = %n.title, "Notification stored"),
            Err(e) => tracing::warn!(owner = %owner, kind = ?kind, error = %e, "Failed to store notification"),
        }
    }

    /// Low-stock alert when a stock level moves to or below the threshold
    pub async fn notify_low_stock(
        &self,
        owner: &str,
        product_ref: &str,
        label: &str,
        before: i64,
        after: i64,
        threshold: i64,
    ) {
        if crossed_low_stock(before, after, threshold) {
            let message = if after == 0 {
                format!("{} is out of stock", label)
            } else {
                format!("{} is running low ({} left)", label, after)
            };
            self.notify(
                owner,
                NotificationKind::LowStock,
                "Low stock",
                message,
                Some(product_ref.to_string()),
            )
            .await;
        }
    }
}

/// Stock moved from above the threshold to at/below it
pub fn crossed_low_stock(before: i64, after: i64, threshold: i64) -> bool {
    after <= threshold && before > threshold
}
