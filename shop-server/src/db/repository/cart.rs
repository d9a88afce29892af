//! Cart Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::Cart;
use serde_json::json;
use shared::models::CartStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Carts of a shop, newest first
    pub async fn find_all(&self, owner: &str, status: Option<CartStatus>) -> RepoResult<Vec<Cart>> {
        match status {
            Some(status) => {
                self.base
                    .query_owned(
                        "SELECT * FROM cart WHERE owner = $owner AND status = $status ORDER BY created_at DESC",
                        owner,
                        vec![("status", json!(status))],
                    )
                    .await
            }
            None => {
                self.base
                    .query_owned(
                        "SELECT * FROM cart WHERE owner = $owner ORDER BY created_at DESC",
                        owner,
                        vec![],
                    )
                    .await
            }
        }
    }

    pub async fn find_by_id(&self, owner: &str, id: &str) -> RepoResult<Option<Cart>> {
        self.base.get_owned::<Cart>(owner, id).await
    }

    /// The active cart of a customer (`None` customer = walk-in cart)
    pub async fn find_active(&self, owner: &str, customer: Option<&str>) -> RepoResult<Option<Cart>> {
        let rows: Vec<Cart> = match customer {
            Some(customer) => {
                self.base
                    .query_owned(
                        "SELECT * FROM cart WHERE owner = $owner AND status = 'active' \
                         AND customer = $customer ORDER BY created_at DESC LIMIT 1",
                        owner,
                        vec![("customer", json!(customer))],
                    )
                    .await?
            }
            None => {
                self.base
                    .query_owned(
                        "SELECT * FROM cart WHERE owner = $owner AND status = 'active' \
                         AND (customer IS NONE OR customer = NULL) ORDER BY created_at DESC LIMIT 1",
                        owner,
                        vec![],
                    )
                    .await?
            }
        };
        Ok(rows.into_iter().next())
    }

    pub async fn create(&self, cart: Cart) -> RepoResult<Cart> {
        self.base.insert(cart).await
    }

    pub async fn save(&self, cart: Cart) -> RepoResult<Cart> {
        self.base.save(cart).await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.base.remove::<Cart>(id).await
    }
}
