//! Order payments and the gateway callback
//!
//! A succeeded order payment runs the order → sale handoff in
//! [`CheckoutService::apply_order_payment`].

use shared::models::{
    GatewayCallback, NotificationKind, OrderPaymentStatus, OrderStatus, PaymentCreate, PaymentPurpose,
    PaymentState, PaymentType, SimulatePaymentRequest,
};
use rust_decimal::Decimal;
use shared::util::now_millis;

use super::CheckoutService;
use crate::db::models::{Document, Order, Payment, Sale};
use crate::gateway::new_reference;
use crate::ledger::money::{exceeds, is_payment_sufficient, money_eq, round_f64, to_decimal, to_f64};
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

impl CheckoutService {
    /// Start a payment for an order
    ///
    /// Cash settles immediately; other methods get a pending payment and a
    /// gateway checkout URL.
    pub async fn initiate_payment(&self, owner: &str, req: PaymentCreate) -> AppResult<Payment> {
        let order = self.order(owner, &req.order_id).await?;
        match order.status {
            OrderStatus::Pending => {}
            OrderStatus::Cancelled => return Err(AppError::new(ErrorCode::OrderCancelled)),
            OrderStatus::Paid | OrderStatus::Fulfilled => return Err(AppError::new(ErrorCode::OrderAlreadyPaid)),
        }

        let unpaid = to_decimal(order.total_amount) - to_decimal(order.amount_paid);
        if unpaid <= Decimal::ZERO {
            return Err(AppError::new(ErrorCode::OrderAlreadyPaid));
        }
        // 进行中的网关支付占用余额
        let pending: Decimal = self
            .payments
            .find_by_order(owner, &order.id_string())
            .await?
            .iter()
            .filter(|p| p.status == PaymentState::Pending)
            .map(|p| to_decimal(p.amount))
            .sum();
        let balance = to_f64(unpaid - pending);
        if balance <= 0.0 {
            return Err(AppError::with_message(
                ErrorCode::PaymentExceedsOrderBalance,
                "Pending payments already cover the order balance",
            )
            .with_detail("pending", to_f64(pending)));
        }
        let amount = round_f64(req.amount.unwrap_or(balance));
        if amount <= 0.0 {
            return Err(AppError::with_message(ErrorCode::ValueOutOfRange, "Amount must be positive"));
        }
        if exceeds(amount, balance) {
            return Err(AppError::new(ErrorCode::PaymentExceedsOrderBalance)
                .with_detail("amount", amount)
                .with_detail("balance", balance)
                .with_detail("pending", to_f64(pending)));
        }

        let now = now_millis();
        let reference = new_reference();
        let mut payment = Payment {
            id: None,
            owner: owner.to_string(),
            order: Some(order.id_string()),
            sale: None,
            customer: order.customer.clone(),
            amount,
            method: req.method,
            status: PaymentState::Pending,
            reference: reference.clone(),
            checkout_url: None,
            purpose: PaymentPurpose::Order,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        };

        if !req.method.needs_gateway() {
            payment.status = PaymentState::Succeeded;
            let order_number = order.order_number.clone();
            self.apply_order_payment(order, &payment).await?;
            let payment = self.payments.create(payment).await?;
            tracing::info!(order = %order_number, amount, method = req.method.as_str(), "Payment settled at the counter");
            return Ok(payment);
        }

        let checkout = self.gateway.create_checkout(amount, &reference, req.method).await?;
        payment.checkout_url = Some(checkout.checkout_url);
        let payment = self.payments.create(payment).await?;
        tracing::info!(
            order = %order.order_number,
            reference = %payment.reference,
            amount,
            method = req.method.as_str(),
            "Gateway payment initiated"
        );
        Ok(payment)
    }

    /// Gateway callback (public route, authenticated by signature)
    pub async fn handle_callback(&self, callback: GatewayCallback) -> AppResult<Payment> {
        if !self.gateway.verify(&callback) {
            security_log!("WARN", "gateway_signature_invalid", reference = callback.reference.clone());
            return Err(AppError::new(ErrorCode::InvalidGatewaySignature));
        }

        let mut payment = self
            .payments
            .find_by_reference(&callback.reference)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound).with_detail("reference", callback.reference.clone()))?;

        if payment.status.is_final() {
            tracing::info!(
                reference = %payment.reference,
                status = payment.status.as_str(),
                "Duplicate callback for a final payment ignored"
            );
            return Ok(payment);
        }
        if !callback.status.is_final() {
            return Err(AppError::invalid_request("Callback status must be succeeded or failed"));
        }
        if !money_eq(callback.amount, payment.amount) {
            return Err(AppError::new(ErrorCode::PaymentAmountMismatch)
                .with_detail("expected", payment.amount)
                .with_detail("received", callback.amount));
        }

        payment.status = callback.status;
        payment.updated_at = now_millis();
        let owner = payment.owner.clone();

        if callback.status == PaymentState::Failed {
            payment.failure_reason = Some(
                callback
                    .failure_reason
                    .unwrap_or_else(|| "Declined by the payment provider".to_string()),
            );
            let payment = self.payments.save(payment).await?;
            tracing::warn!(
                reference = %payment.reference,
                reason = payment.failure_reason.as_deref().unwrap_or_default(),
                "Payment failed"
            );
            self.notifications
                .notify(
                    &owner,
                    NotificationKind::Payment,
                    "Payment failed",
                    format!(
                        "Payment {} of {:.2} failed: {}",
                        payment.reference,
                        payment.amount,
                        payment.failure_reason.as_deref().unwrap_or_default()
                    ),
                    Some(payment.id_string()),
                )
                .await;
            return Ok(payment);
        }

        // 先完成订单交接再落库: 交接失败时支付仍是 pending, 网关重试会再次执行
        if let Some(order_ref) = payment.order.clone() {
            let order = self.order(&owner, &order_ref).await?;
            if let Err(err) = ensure_applicable(&order, payment.amount) {
                return self.flag_for_refund(payment, &order, err.message).await;
            }
            self.apply_order_payment(order, &payment).await?;
        }
        Ok(self.payments.save(payment).await?)
    }

    /// Money captured that cannot be applied to its order
    async fn flag_for_refund(&self, mut payment: Payment, order: &Order, reason: String) -> AppResult<Payment> {
        tracing::warn!(
            order = %order.order_number,
            reference = %payment.reference,
            amount = payment.amount,
            reason = %reason,
            "Captured payment cannot be applied, refund required"
        );
        payment.failure_reason = Some(format!("Refund required: {}", reason));
        let payment = self.payments.save(payment).await?;
        self.notifications
            .notify(
                &payment.owner,
                NotificationKind::Payment,
                "Refund required",
                format!(
                    "Payment {} of {:.2} for order {} was captured but not applied: {}",
                    payment.reference, payment.amount, order.order_number, reason
                ),
                Some(payment.id_string()),
            )
            .await;
        Ok(payment)
    }

    /// Sign and replay a callback for a pending payment (development)
    pub async fn simulate(&self, owner: &str, payment_id: &str, req: SimulatePaymentRequest) -> AppResult<Payment> {
        let payment = self
            .payments
            .find_by_id(owner, payment_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;
        if payment.status.is_final() {
            return Err(AppError::new(ErrorCode::PaymentAlreadyFinal));
        }
        let unsigned = GatewayCallback {
            reference: payment.reference,
            status: req.status,
            amount: payment.amount,
            signature: String::new(),
            failure_reason: req.failure_reason,
        };
        let signed = self
            .gateway
            .sign_callback(unsigned)
            .ok_or_else(|| AppError::with_message(ErrorCode::GatewayUnavailable, "Gateway cannot simulate callbacks"))?;
        self.handle_callback(signed).await
    }

    /// Order → payment → sale handoff for a succeeded payment
    async fn apply_order_payment(&self, mut order: Order, payment: &Payment) -> AppResult<Order> {
        ensure_applicable(&order, payment.amount)?;

        let now = now_millis();
        order.amount_paid = to_f64(to_decimal(order.amount_paid) + to_decimal(payment.amount));
        order.updated_at = now;

        if !is_payment_sufficient(order.amount_paid, order.total_amount) {
            order.payment_status = OrderPaymentStatus::Partial;
            let order = self.orders.save(order).await?;
            self.notifications
                .notify(
                    &order.owner,
                    NotificationKind::Payment,
                    "Partial payment received",
                    format!(
                        "Order {}: {:.2} of {:.2} paid",
                        order.order_number, order.amount_paid, order.total_amount
                    ),
                    Some(order.id_string()),
                )
                .await;
            return Ok(order);
        }

        order.payment_status = OrderPaymentStatus::Paid;
        order.status = OrderStatus::Paid;
        let owner = order.owner.clone();

        self.decrement_stock(&owner, &order.items).await?;

        let sale = self
            .sales
            .create(Sale {
                id: None,
                owner: owner.clone(),
                customer: order.customer.clone(),
                order: Some(order.id_string()),
                items: order.items.clone(),
                total_amount: order.total_amount,
                amount_paid: order.total_amount,
                payment_method: payment.method,
                payment_type: PaymentType::Full,
                credit_details: None,
                created_at: now,
                updated_at: now,
            })
            .await?;
        order.sale = Some(sale.id_string());
        let order = self.orders.save(order).await?;

        if let Some(customer_ref) = order.customer.as_deref() {
            self.add_spent(&owner, customer_ref, order.total_amount).await?;
        }

        tracing::info!(order = %order.order_number, sale = %sale.id_string(), total = order.total_amount, "Order paid");
        self.logs
            .info(
                &owner,
                "order_paid",
                format!("Order {} paid ({:.2})", order.order_number, order.total_amount),
                Some(order.id_string()),
            )
            .await;
        self.notifications
            .notify(
                &owner,
                NotificationKind::Payment,
                "Payment received",
                format!("Order {} is fully paid ({:.2})", order.order_number, order.total_amount),
                Some(order.id_string()),
            )
            .await;
        Ok(order)
    }

    /// Grow a customer's lifetime spend
    pub(super) async fn add_spent(&self, owner: &str, customer_ref: &str, amount: f64) -> AppResult<()> {
        if let Some(mut customer) = self.customers.find_by_id(owner, customer_ref).await? {
            customer.total_spent = to_f64(to_decimal(customer.total_spent) + to_decimal(amount));
            customer.updated_at = now_millis();
            self.customers.save(customer).await?;
        }
        Ok(())
    }
}

/// A succeeded payment only lands on a pending order and never past its total
fn ensure_applicable(order: &Order, amount: f64) -> AppResult<()> {
    match order.status {
        OrderStatus::Pending => {}
        OrderStatus::Cancelled => return Err(AppError::new(ErrorCode::OrderCancelled)),
        OrderStatus::Paid | OrderStatus::Fulfilled => return Err(AppError::new(ErrorCode::OrderAlreadyPaid)),
    }
    let balance = to_f64(to_decimal(order.total_amount) - to_decimal(order.amount_paid));
    if exceeds(amount, balance) {
        return Err(AppError::new(ErrorCode::PaymentExceedsOrderBalance)
            .with_detail("amount", amount)
            .with_detail("balance", balance));
    }
    Ok(())
}
