//! Log Service - activity log and system error reporting
//!
//! Entries go to the `log` table; writes are best effort.

use crate::db::models::LogEntry;
use crate::db::repository::LogRepository;
use shared::error::AppError;
use shared::models::LogLevel;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct LogService {
    repo: LogRepository,
}

impl LogService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            repo: LogRepository::new(db),
        }
    }

    /// Record a business action of a shop
    pub async fn info(
        &self,
        owner: &str,
        action: &str,
        message: impl Into<String>,
        resource: Option<String>,
    ) {
        self.write(Some(owner), LogLevel::Info, action, message.into(), resource)
            .await;
    }

    /// Record a system-category error raised while serving a request
    pub async fn system_error(&self, owner: Option<&str>, action: &str, err: &AppError) {
        let message = format!("[{}] {}", err.code.code(), err.message);
        self.write(owner, LogLevel::Error, action, message, None).await;
    }

    async fn write(
        &self,
        owner: Option<&str>,
        level: LogLevel,
        action: &str,
        message: String,
        resource: Option<String>,
    ) {
        let entry = LogEntry {
            id: None,
            owner: owner.map(str::to_string),
            level,
            action: action.to_string(),
            message,
            resource,
            created_at: now_millis(),
        };
        if let Err(e) = self.repo.create(entry).await {
            tracing::warn!(action = %action, error = %e, "Failed to write log entry");
        }
    }
}
