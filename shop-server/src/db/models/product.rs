//! Product Model

use super::{impl_document, serde_helpers};
use serde::{Deserialize, Serialize};
use shared::models::Variant;
use surrealdb::RecordId;

/// Product with embedded variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub price: f64,
    pub cost_price: Option<f64>,
    #[serde(default)]
    pub stock: i64,
    /// Upload filename or URL
    pub image: Option<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl_document!(Product, "product", owned);

fn default_true() -> bool {
    true
}

impl Product {
    pub fn variant(&self, variant_id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    pub fn variant_mut(&mut self, variant_id: &str) -> Option<&mut Variant> {
        self.variants.iter_mut().find(|v| v.id == variant_id)
    }

    /// Stock of the product or of one of its variants
    pub fn stock_of(&self, variant_id: Option<&str>) -> Option<i64> {
        match variant_id {
            Some(vid) => self.variant(vid).map(|v| v.stock),
            None => Some(self.stock),
        }
    }

    /// (display name, unit price) for a line, `None` when the variant is unknown
    pub fn line_snapshot(&self, variant_id: Option<&str>) -> Option<(String, f64)> {
        match variant_id {
            Some(vid) => self
                .variant(vid)
                .map(|v| (format!("{} ({})", self.name, v.name), v.price)),
            None => Some((self.name.clone(), self.price)),
        }
    }

    pub fn has_variant_named(&self, name: &str, except: Option<&str>) -> bool {
        self.variants
            .iter()
            .any(|v| v.name.eq_ignore_ascii_case(name) && Some(v.id.as_str()) != except)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: None,
            owner: "user:o".into(),
            name: "Tee".into(),
            description: None,
            category: None,
            sku: None,
            price: 10.0,
            cost_price: None,
            stock: 3,
            image: None,
            variants: vec![Variant {
                id: "v1".into(),
                name: "Large".into(),
                sku: None,
                price: 12.5,
                stock: 7,
            }],
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_line_snapshot() {
        let p = product();
        assert_eq!(p.line_snapshot(None), Some(("Tee".into(), 10.0)));
        assert_eq!(p.line_snapshot(Some("v1")), Some(("Tee (Large)".into(), 12.5)));
        assert_eq!(p.line_snapshot(Some("nope")), None);
        assert_eq!(p.stock_of(Some("v1")), Some(7));
        assert_eq!(p.stock_of(None), Some(3));
    }

    #[test]
    fn test_variant_name_uniqueness() {
        let p = product();
        assert!(p.has_variant_named("large", None));
        assert!(!p.has_variant_named("large", Some("v1")));
        assert!(!p.has_variant_named("Small", None));
    }
}
