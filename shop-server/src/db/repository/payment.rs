//! Payment Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::Payment;
use serde_json::json;
use shared::models::PaymentState;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(
        &self,
        owner: &str,
        order: Option<&str>,
        status: Option<PaymentState>,
    ) -> RepoResult<Vec<Payment>> {
        let mut sql = String::from("SELECT * FROM payment WHERE owner = $owner");
        let mut binds = Vec::new();
        if let Some(order) = order {
            sql.push_str(" AND order = $order");
            binds.push(("order", json!(order)));
        }
        if let Some(status) = status {
            sql.push_str(" AND status = $status");
            binds.push(("status", json!(status)));
        }
        sql.push_str(" ORDER BY created_at DESC");
        self.base.query_owned(&sql, owner, binds).await
    }

    pub async fn find_by_order(&self, owner: &str, order: &str) -> RepoResult<Vec<Payment>> {
        self.find_all(owner, Some(order), None).await
    }

    pub async fn find_by_id(&self, owner: &str, id: &str) -> RepoResult<Option<Payment>> {
        self.base.get_owned::<Payment>(owner, id).await
    }

    /// Gateway callbacks are unauthenticated, so the lookup is by reference only
    pub async fn find_by_reference(&self, reference: &str) -> RepoResult<Option<Payment>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM payment WHERE reference = $reference LIMIT 1")
            .bind(("reference", reference.to_string()))
            .await?;
        let rows: Vec<Payment> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    pub async fn create(&self, payment: Payment) -> RepoResult<Payment> {
        self.base.insert(payment).await
    }

    pub async fn save(&self, payment: Payment) -> RepoResult<Payment> {
        self.base.save(payment).await
    }
}
