//! Log Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::LogEntry;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct LogRepository {
    base: BaseRepository,
}

impl LogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Latest entries of a shop
    pub async fn find_recent(&self, owner: &str, limit: u32) -> RepoResult<Vec<LogEntry>> {
        self.base
            .query_owned(
                "SELECT * FROM log WHERE owner = $owner ORDER BY created_at DESC LIMIT $limit",
                owner,
                vec![("limit", json!(limit))],
            )
            .await
    }

    pub async fn create(&self, entry: LogEntry) -> RepoResult<LogEntry> {
        self.base.insert(entry).await
    }
}
