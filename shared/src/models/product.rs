//! Product Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product variant (embedded in the product document)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Short id, unique inside its product
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
}

/// Variant payload (create, or wholesale replace on product update)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VariantInput {
    #[validate(length(min = 1, max = 100, message = "variant name is required"))]
    pub name: String,
    #[validate(length(max = 64))]
    pub sku: Option<String>,
    #[validate(range(min = 0.0, max = 1000000.0, message = "price must be between 0 and 1000000"))]
    pub price: f64,
    #[validate(range(min = 0, max = 1000000, message = "stock must be between 0 and 1000000"))]
    #[serde(default)]
    pub stock: i64,
}

/// Variant partial update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct VariantUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 64))]
    pub sku: Option<String>,
    #[validate(range(min = 0.0, max = 1000000.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0, max = 1000000))]
    pub stock: Option<i64>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 64))]
    pub sku: Option<String>,
    #[validate(range(min = 0.0, max = 1000000.0, message = "price must be between 0 and 1000000"))]
    pub price: f64,
    #[validate(range(min = 0.0, max = 1000000.0))]
    pub cost_price: Option<f64>,
    #[validate(range(min = 0, max = 1000000, message = "stock must be between 0 and 1000000"))]
    #[serde(default)]
    pub stock: i64,
    pub image: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub variants: Vec<VariantInput>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 64))]
    pub sku: Option<String>,
    #[validate(range(min = 0.0, max = 1000000.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0, max = 1000000.0))]
    pub cost_price: Option<f64>,
    #[validate(range(min = 0, max = 1000000))]
    pub stock: Option<i64>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
    /// Replaces all variants when present
    #[validate(nested)]
    pub variants: Option<Vec<VariantInput>>,
}

/// `GET /api/products?q=&category=&low_stock=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub low_stock: bool,
}

/// Stock adjustment payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StockAdjustRequest {
    #[validate(range(min = -1000000, max = 1000000, message = "delta must be within 1000000"))]
    pub delta: i64,
    pub variant_id: Option<String>,
}
