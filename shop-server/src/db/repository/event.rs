//! Event Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::Event;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct EventRepository {
    base: BaseRepository,
}

impl EventRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Events starting inside `[from, to)`, ordered by start
    pub async fn find_range(
        &self,
        owner: &str,
        from: Option<i64>,
        to: Option<i64>,
    ) -> RepoResult<Vec<Event>> {
        let mut sql = String::from("SELECT * FROM event WHERE owner = $owner");
        let mut binds = Vec::new();
        if let Some(from) = from {
            sql.push_str(" AND starts_at >= $from");
            binds.push(("from", json!(from)));
        }
        if let Some(to) = to {
            sql.push_str(" AND starts_at < $to");
            binds.push(("to", json!(to)));
        }
        sql.push_str(" ORDER BY starts_at ASC");
        self.base.query_owned(&sql, owner, binds).await
    }

    pub async fn find_by_id(&self, owner: &str, id: &str) -> RepoResult<Option<Event>> {
        self.base.get_owned::<Event>(owner, id).await
    }

    pub async fn create(&self, event: Event) -> RepoResult<Event> {
        self.base.insert(event).await
    }

    pub async fn save(&self, event: Event) -> RepoResult<Event> {
        self.base.save(event).await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.base.remove::<Event>(id).await
    }
}
