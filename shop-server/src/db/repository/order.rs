//! Order Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::Order;
use serde_json::json;
use shared::models::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Orders newest first, optional status / customer filter
    pub async fn find_all(
        &self,
        owner: &str,
        status: Option<OrderStatus>,
        customer: Option<&str>,
    ) -> RepoResult<Vec<Order>> {
        let mut sql = String::from("SELECT * FROM order WHERE owner = $owner");
        let mut binds = Vec::new();
        if let Some(status) = status {
            sql.push_str(" AND status = $status");
            binds.push(("status", json!(status)));
        }
        if let Some(customer) = customer {
            sql.push_str(" AND customer = $customer");
            binds.push(("customer", json!(customer)));
        }
        sql.push_str(" ORDER BY created_at DESC");
        self.base.query_owned(&sql, owner, binds).await
    }

    pub async fn find_by_id(&self, owner: &str, id: &str) -> RepoResult<Option<Order>> {
        self.base.get_owned::<Order>(owner, id).await
    }

    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        self.base.insert(order).await
    }

    pub async fn save(&self, order: Order) -> RepoResult<Order> {
        self.base.save(order).await
    }
}
