//! Customer Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Customer;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Active customers, optional case-insensitive search on name/phone/email
    pub async fn find_all(&self, owner: &str, q: Option<&str>) -> RepoResult<Vec<Customer>> {
        match q.map(str::trim).filter(|s| !s.is_empty()) {
            Some(q) => {
                self.base
                    .query_owned(
                        "SELECT * FROM customer WHERE owner = $owner AND is_active = true \
                         AND (string::contains(string::lowercase(name), $q) \
                         OR string::contains(phone ?? '', $q) \
                         OR string::contains(string::lowercase(email ?? ''), $q)) \
                         ORDER BY name",
                        owner,
                        vec![("q", json!(q.to_lowercase()))],
                    )
                    .await
            }
            None => {
                self.base
                    .query_owned(
                        "SELECT * FROM customer WHERE owner = $owner AND is_active = true ORDER BY name",
                        owner,
                        vec![],
                    )
                    .await
            }
        }
    }

    pub async fn find_by_id(&self, owner: &str, id: &str) -> RepoResult<Option<Customer>> {
        Ok(self
            .base
            .get_owned::<Customer>(owner, id)
            .await?
            .filter(|c| c.is_active))
    }

    pub async fn find_by_phone(&self, owner: &str, phone: &str) -> RepoResult<Option<Customer>> {
        let rows: Vec<Customer> = self
            .base
            .query_owned(
                "SELECT * FROM customer WHERE owner = $owner AND phone = $phone AND is_active = true LIMIT 1",
                owner,
                vec![("phone", json!(phone))],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Create a customer; phone is unique per shop
    pub async fn create(&self, customer: Customer) -> RepoResult<Customer> {
        if let Some(phone) = customer.phone.as_deref()
            && self.find_by_phone(&customer.owner, phone).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Customer with phone '{}' already exists",
                phone
            )));
        }
        self.base.insert(customer).await
    }

    pub async fn save(&self, customer: Customer) -> RepoResult<Customer> {
        self.base.save(customer).await
    }
}
