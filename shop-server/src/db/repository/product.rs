//! Product Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Product;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

/// Filters for product listing
#[derive(Debug, Default, Clone)]
pub struct ProductFilter<'a> {
    pub q: Option<&'a str>,
    pub category: Option<&'a str>,
    /// Only products (or variants) at or below this stock level
    pub low_stock_threshold: Option<i64>,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Active products ordered by name
    pub async fn find_all(&self, owner: &str, filter: ProductFilter<'_>) -> RepoResult<Vec<Product>> {
        let mut sql = String::from("SELECT * FROM product WHERE owner = $owner AND is_active = true");
        let mut binds = Vec::new();

        if let Some(q) = filter.q.map(str::trim).filter(|s| !s.is_empty()) {
            sql.push_str(
                " AND (string::contains(string::lowercase(name), $q) \
                 OR string::contains(string::lowercase(sku ?? ''), $q))",
            );
            binds.push(("q", json!(q.to_lowercase())));
        }
        if let Some(category) = filter.category {
            sql.push_str(" AND category = $category");
            binds.push(("category", json!(category)));
        }
        if let Some(threshold) = filter.low_stock_threshold {
            sql.push_str(
                " AND (stock <= $threshold OR array::len(variants[WHERE stock <= $threshold]) > 0)",
            );
            binds.push(("threshold", json!(threshold)));
        }
        sql.push_str(" ORDER BY name");

        self.base.query_owned(&sql, owner, binds).await
    }

    /// Active product by id
    pub async fn find_by_id(&self, owner: &str, id: &str) -> RepoResult<Option<Product>> {
        Ok(self
            .base
            .get_owned::<Product>(owner, id)
            .await?
            .filter(|p| p.is_active))
    }

    pub async fn find_by_sku(&self, owner: &str, sku: &str) -> RepoResult<Option<Product>> {
        let rows: Vec<Product> = self
            .base
            .query_owned(
                "SELECT * FROM product WHERE owner = $owner AND sku = $sku AND is_active = true LIMIT 1",
                owner,
                vec![("sku", json!(sku))],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Number of active products (plan limits)
    pub async fn count_active(&self, owner: &str) -> RepoResult<u64> {
        self.base
            .count_owned(
                "SELECT count() FROM product WHERE owner = $owner AND is_active = true GROUP ALL",
                owner,
                vec![],
            )
            .await
    }

    /// Create a product; sku is unique per shop
    pub async fn create(&self, product: Product) -> RepoResult<Product> {
        if let Some(sku) = product.sku.as_deref()
            && self.find_by_sku(&product.owner, sku).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!("SKU '{}' already exists", sku)));
        }
        self.base.insert(product).await
    }

    pub async fn save(&self, product: Product) -> RepoResult<Product> {
        self.base.save(product).await
    }
}
