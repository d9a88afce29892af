//! Cart → order, direct orders, order status

use shared::models::{CartItem, CartStatus, CheckoutRequest, OrderCreate, OrderPaymentStatus, OrderStatus};
use shared::util::now_millis;

use super::{CheckoutService, cart};
use crate::db::models::{Document, Order};
use crate::utils::ids::order_number;
use crate::utils::{AppError, AppResult, ErrorCode};

impl CheckoutService {
    /// Turn an active cart into a pending order
    ///
    /// Lines are re-priced against the current products; the cart is marked
    /// checked out only after the order is stored.
    pub async fn checkout_cart(&self, owner: &str, cart_id: &str, req: CheckoutRequest) -> AppResult<Order> {
        let mut cart = self
            .carts
            .find_by_id(owner, cart_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CartNotFound))?;
        cart::ensure_mutable(&cart)?;
        if cart.items.is_empty() {
            return Err(AppError::new(ErrorCode::CartEmpty));
        }

        let items = self.reprice(owner, &cart.items).await?;
        let order = self
            .store_order(owner, cart.customer.clone(), Some(cart.id_string()), items, req.notes)
            .await?;

        cart.status = CartStatus::CheckedOut;
        cart.updated_at = now_millis();
        self.carts.save(cart).await?;

        Ok(order)
    }

    /// Order without a cart, priced the same way
    pub async fn create_order(&self, owner: &str, req: OrderCreate) -> AppResult<Order> {
        if req.items.is_empty() {
            return Err(AppError::new(ErrorCode::OrderEmpty));
        }
        let customer = self.customer_ref(owner, req.customer_id.as_deref()).await?;
        let items = self.price_inputs(owner, &req.items).await?;
        self.store_order(owner, customer, None, items, req.notes).await
    }

    /// Client-requested transition (pending → cancelled, paid → fulfilled)
    pub async fn update_order_status(&self, owner: &str, order_id: &str, next: OrderStatus) -> AppResult<Order> {
        let mut order = self.order(owner, order_id).await?;
        if order.status == next {
            return Ok(order);
        }
        if !order.status.can_transition_to(next) {
            return Err(AppError::with_message(
                ErrorCode::InvalidStatusTransition,
                format!("Cannot move an order from {:?} to {:?}", order.status, next),
            )
            .with_detail("from", serde_json::to_value(order.status).unwrap_or_default())
            .with_detail("to", serde_json::to_value(next).unwrap_or_default()));
        }
        order.status = next;
        order.updated_at = now_millis();
        let order = self.orders.save(order).await?;
        tracing::info!(order = %order.order_number, status = ?next, "Order status updated");
        self.logs
            .info(owner, "order_status", format!("Order {} is now {:?}", order.order_number, next), Some(order.id_string()))
            .await;
        Ok(order)
    }

    /// Cancel a pending order
    pub async fn cancel_order(&self, owner: &str, order_id: &str) -> AppResult<Order> {
        let order = self.order(owner, order_id).await?;
        match order.status {
            OrderStatus::Pending => self.update_order_status(owner, order_id, OrderStatus::Cancelled).await,
            OrderStatus::Cancelled => Err(AppError::new(ErrorCode::OrderCancelled)),
            OrderStatus::Paid | OrderStatus::Fulfilled => Err(AppError::new(ErrorCode::OrderAlreadyPaid)),
        }
    }

    pub(super) async fn order(&self, owner: &str, order_id: &str) -> AppResult<Order> {
        self.orders
            .find_by_id(owner, order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))
    }

    async fn store_order(
        &self,
        owner: &str,
        customer: Option<String>,
        cart: Option<String>,
        mut items: Vec<CartItem>,
        notes: Option<String>,
    ) -> AppResult<Order> {
        let now = now_millis();
        let total_amount = cart::refresh_subtotals(&mut items)?;
        let order = Order {
            id: None,
            owner: owner.to_string(),
            order_number: order_number(now),
            customer,
            cart,
            items,
            total_amount,
            amount_paid: 0.0,
            status: OrderStatus::Pending,
            payment_status: OrderPaymentStatus::Unpaid,
            notes,
            sale: None,
            created_at: now,
            updated_at: now,
        };
        let order = self.orders.create(order).await?;
        tracing::info!(order = %order.order_number, total = order.total_amount, "Order created");
        self.logs
            .info(
                owner,
                "order_created",
                format!("Order {} created ({:.2})", order.order_number, order.total_amount),
                Some(order.id_string()),
            )
            .await;
        Ok(order)
    }
}
