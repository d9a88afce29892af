//! Checkout
//!
//! Cart → order → payment → sale handoff.
//!
//! - [`cart`] - pure line operations on a cart (totals invariant)
//! - [`CheckoutService`] - the persisted flows: checkout, direct orders,
//!   payment initiation / callbacks, direct POS sales

pub mod cart;
mod order;
mod payment;
mod sale;
mod stock;

pub use sale::summarize;

use std::sync::Arc;

use shared::models::{CartItem, LineItemInput};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::Document;
use crate::db::repository::{
    CartRepository, CustomerRepository, OrderRepository, PaymentRepository, ProductRepository,
    SaleRepository,
};
use crate::gateway::PaymentGateway;
use crate::services::{LogService, NotificationService};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Persisted checkout flows of one request
#[derive(Clone)]
pub struct CheckoutService {
    carts: CartRepository,
    customers: CustomerRepository,
    orders: OrderRepository,
    payments: PaymentRepository,
    products: ProductRepository,
    sales: SaleRepository,
    notifications: NotificationService,
    logs: LogService,
    gateway: Arc<dyn PaymentGateway>,
    low_stock_threshold: i64,
}

impl CheckoutService {
    pub fn new(db: Surreal<Db>, gateway: Arc<dyn PaymentGateway>, low_stock_threshold: i64) -> Self {
        Self {
            carts: CartRepository::new(db.clone()),
            customers: CustomerRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            payments: PaymentRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            sales: SaleRepository::new(db.clone()),
            notifications: NotificationService::new(db.clone()),
            logs: LogService::new(db),
            gateway,
            low_stock_threshold,
        }
    }

    /// Price line inputs against the current products
    ///
    /// Lines for the same product/variant are merged; stock is checked
    /// against the merged quantity.
    async fn price_inputs(&self, owner: &str, inputs: &[LineItemInput]) -> AppResult<Vec<CartItem>> {
        let mut lines: Vec<CartItem> = Vec::with_capacity(inputs.len());
        for input in inputs {
            let product = self
                .products
                .find_by_id(owner, &input.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", input.product_id.clone())
                })?;
            let variant_id = input.variant_id.as_deref();

            let product_ref = product.id_string();
            match lines
                .iter_mut()
                .find(|l| l.product == product_ref && l.variant_id.as_deref() == variant_id)
            {
                Some(line) => {
                    let merged = cart::merged_quantity(line.quantity, input.quantity)?;
                    cart::ensure_available(&product, variant_id, merged)?;
                    line.quantity = merged;
                }
                None => {
                    cart::ensure_available(&product, variant_id, input.quantity)?;
                    lines.push(cart::price_line(&product, variant_id, input.quantity)?);
                }
            }
        }
        cart::refresh_subtotals(&mut lines)?;
        Ok(lines)
    }

    /// Re-price stored lines (cart checkout): current name/price, stock re-checked
    async fn reprice(&self, owner: &str, items: &[CartItem]) -> AppResult<Vec<CartItem>> {
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let product = self
                .products
                .find_by_id(owner, &item.product)
                .await?
                .ok_or_else(|| {
                    AppError::with_message(ErrorCode::ProductNotFound, format!("{} is no longer available", item.name))
                        .with_detail("product_id", item.product.clone())
                })?;
            let variant_id = item.variant_id.as_deref();
            cart::ensure_available(&product, variant_id, item.quantity)?;
            let mut line = cart::price_line(&product, variant_id, item.quantity)?;
            line.item_id = item.item_id.clone();
            lines.push(line);
        }
        cart::refresh_subtotals(&mut lines)?;
        Ok(lines)
    }

    /// Resolve an optional customer id to its "customer:key" reference
    async fn customer_ref(&self, owner: &str, customer_id: Option<&str>) -> AppResult<Option<String>> {
        match customer_id {
            None => Ok(None),
            Some(id) => {
                let customer = self
                    .customers
                    .find_by_id(owner, id)
                    .await?
                    .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
                Ok(Some(customer.id_string()))
            }
        }
    }
}
