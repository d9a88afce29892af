//! Sale Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::Sale;
use serde_json::json;
use shared::models::PaymentType;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct SaleRepository {
    base: BaseRepository,
}

/// Filters for sale listing / summary (`to` is exclusive)
#[derive(Debug, Default, Clone)]
pub struct SaleFilter<'a> {
    pub customer: Option<&'a str>,
    pub payment_type: Option<PaymentType>,
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl SaleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Sales newest first
    pub async fn find_all(&self, owner: &str, filter: SaleFilter<'_>) -> RepoResult<Vec<Sale>> {
        let mut sql = String::from("SELECT * FROM sale WHERE owner = $owner");
        let mut binds = Vec::new();
        if let Some(customer) = filter.customer {
            sql.push_str(" AND customer = $customer");
            binds.push(("customer", json!(customer)));
        }
        if let Some(payment_type) = filter.payment_type {
            sql.push_str(" AND payment_type = $payment_type");
            binds.push(("payment_type", json!(payment_type)));
        }
        if let Some(from) = filter.from {
            sql.push_str(" AND created_at >= $from");
            binds.push(("from", json!(from)));
        }
        if let Some(to) = filter.to {
            sql.push_str(" AND created_at < $to");
            binds.push(("to", json!(to)));
        }
        sql.push_str(" ORDER BY created_at DESC");
        self.base.query_owned(&sql, owner, binds).await
    }

    pub async fn find_by_id(&self, owner: &str, id: &str) -> RepoResult<Option<Sale>> {
        self.base.get_owned::<Sale>(owner, id).await
    }

    /// Credit sales of a customer with money still owed, oldest first
    pub async fn find_outstanding_credits(&self, owner: &str, customer: &str) -> RepoResult<Vec<Sale>> {
        self.base
            .query_owned(
                "SELECT * FROM sale WHERE owner = $owner AND customer = $customer \
                 AND payment_type = 'credit' AND credit_details.amount_owed > 0 \
                 ORDER BY created_at ASC, id ASC",
                owner,
                vec![("customer", json!(customer))],
            )
            .await
    }

    pub async fn create(&self, sale: Sale) -> RepoResult<Sale> {
        self.base.insert(sale).await
    }

    pub async fn save(&self, sale: Sale) -> RepoResult<Sale> {
        self.base.save(sale).await
    }
}
