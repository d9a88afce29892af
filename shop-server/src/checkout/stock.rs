//! Stock movements caused by sales

use shared::models::CartItem;
use shared::util::now_millis;

use super::CheckoutService;
use crate::db::models::Document;
use crate::utils::AppResult;

impl CheckoutService {
    /// Take sold quantities out of stock (floored at 0)
    ///
    /// Products removed since the sale was priced are skipped.
    pub(super) async fn decrement_stock(&self, owner: &str, items: &[CartItem]) -> AppResult<()> {
        for item in items {
            let Some(mut product) = self.products.find_by_id(owner, &item.product).await? else {
                tracing::warn!(product = %item.product, "Sold product no longer exists, stock not adjusted");
                continue;
            };

            let label = item.name.clone();
            let (before, after) = match item.variant_id.as_deref() {
                Some(vid) => match product.variant_mut(vid) {
                    Some(variant) => {
                        let before = variant.stock;
                        variant.stock = (before - item.quantity).max(0);
                        (before, variant.stock)
                    }
                    None => {
                        tracing::warn!(product = %item.product, variant = %vid, "Sold variant no longer exists");
                        continue;
                    }
                },
                None => {
                    let before = product.stock;
                    product.stock = (before - item.quantity).max(0);
                    (before, product.stock)
                }
            };
            product.updated_at = now_millis();
            let product_ref = product.id_string();
            self.products.save(product).await?;

            tracing::debug!(product = %product_ref, before, after, "Stock decremented");
            self.notifications
                .notify_low_stock(owner, &product_ref, &label, before, after, self.low_stock_threshold)
                .await;
        }
        Ok(())
    }
}
