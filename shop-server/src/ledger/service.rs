//! Persisting credit repayments

use shared::models::{
    CreditPaymentRequest, NotificationKind, PaymentMethod, PaymentPurpose, PaymentState,
    ReconciliationResult, SalePaymentRequest,
};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::money::{to_decimal, to_f64};
use super::reconcile::{self, RepaymentInfo};
use crate::db::models::{Customer, Document, Payment, Sale};
use crate::db::repository::{CustomerRepository, PaymentRepository, SaleRepository};
use crate::services::{LogService, NotificationService};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Credit repayments of one shop's customers
#[derive(Clone)]
pub struct CreditLedger {
    customers: CustomerRepository,
    sales: SaleRepository,
    payments: PaymentRepository,
    notifications: NotificationService,
    logs: LogService,
}

impl CreditLedger {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            customers: CustomerRepository::new(db.clone()),
            sales: SaleRepository::new(db.clone()),
            payments: PaymentRepository::new(db.clone()),
            notifications: NotificationService::new(db.clone()),
            logs: LogService::new(db),
        }
    }

    /// Outstanding credit sales of a customer, oldest first
    pub async fn outstanding(&self, owner: &str, customer_id: &str) -> AppResult<Vec<Sale>> {
        let customer = self.customer(owner, customer_id).await?;
        Ok(self
            .sales
            .find_outstanding_credits(owner, &customer.id_string())
            .await?)
    }

    /// Pay down a customer's credit, oldest sale first
    pub async fn pay_customer(
        &self,
        owner: &str,
        customer_id: &str,
        req: CreditPaymentRequest,
    ) -> AppResult<ReconciliationResult> {
        let mut customer = self.customer(owner, customer_id).await?;
        let customer_ref = customer.id_string();
        let mut sales = self
            .sales
            .find_outstanding_credits(owner, &customer_ref)
            .await?;

        // Validate before any write
        let owed: Vec<f64> = sales.iter().map(Sale::amount_owed).collect();
        reconcile::plan_allocation(req.amount, &owed)?;

        let payment = self
            .record_payment(owner, Some(customer_ref.clone()), None, req.amount, req.method)
            .await?;
        let payment_ref = payment.id_string();

        let info = RepaymentInfo {
            method: req.method,
            paid_at: now_millis(),
            payment: Some(payment_ref.clone()),
        };
        let applied = reconcile::reconcile(&mut sales, req.amount, &info)?;

        let touched: Vec<&str> = applied.iter().map(|a| a.sale_id.as_str()).collect();
        for sale in sales.into_iter().filter(|s| touched.contains(&s.id_string().as_str())) {
            self.sales.save(sale).await?;
        }

        let total_applied = to_f64(applied.iter().map(|a| to_decimal(a.applied)).sum());
        let remaining_balance = self.reduce_balance(&mut customer, total_applied).await?;

        tracing::info!(
            customer = %customer_ref,
            amount = total_applied,
            sales = applied.len(),
            remaining = remaining_balance,
            "Credit payment reconciled"
        );
        self.logs
            .info(
                owner,
                "credit_payment",
                format!("{} paid {:.2} over {} credit sale(s)", customer.name, total_applied, applied.len()),
                Some(customer_ref.clone()),
            )
            .await;
        self.notifications
            .notify(
                owner,
                NotificationKind::Credit,
                "Credit payment received",
                format!("{} paid {:.2}, remaining balance {:.2}", customer.name, total_applied, remaining_balance),
                Some(customer_ref),
            )
            .await;

        Ok(ReconciliationResult {
            applied,
            total_applied,
            remaining_balance,
            payment_id: Some(payment_ref),
        })
    }

    /// Repay one credit sale
    pub async fn pay_sale(
        &self,
        owner: &str,
        sale_id: &str,
        req: SalePaymentRequest,
    ) -> AppResult<Sale> {
        let mut sale = self
            .sales
            .find_by_id(owner, sale_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::SaleNotFound))?;

        // Dry run on a copy so a rejected amount writes nothing
        let mut preview = sale.clone();
        let dry_run = RepaymentInfo {
            method: req.method,
            paid_at: now_millis(),
            payment: None,
        };
        reconcile::apply_to_sale(&mut preview, req.amount, &dry_run)?;

        let payment = self
            .record_payment(owner, sale.customer.clone(), Some(sale.id_string()), req.amount, req.method)
            .await?;
        let info = RepaymentInfo {
            payment: Some(payment.id_string()),
            ..dry_run
        };
        let applied = reconcile::apply_to_sale(&mut sale, req.amount, &info)?;
        let sale = self.sales.save(sale).await?;

        if let Some(customer_ref) = sale.customer.as_deref()
            && let Some(mut customer) = self.customers.find_by_id(owner, customer_ref).await?
        {
            self.reduce_balance(&mut customer, applied.applied).await?;
        }

        tracing::info!(
            sale = %applied.sale_id,
            amount = applied.applied,
            remaining = applied.remaining_owed,
            "Credit sale repayment recorded"
        );
        self.logs
            .info(
                owner,
                "sale_payment",
                format!("Repayment of {:.2}, {:.2} still owed", applied.applied, applied.remaining_owed),
                Some(applied.sale_id),
            )
            .await;

        Ok(sale)
    }

    async fn customer(&self, owner: &str, customer_id: &str) -> AppResult<Customer> {
        self.customers
            .find_by_id(owner, customer_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))
    }

    /// Repayments are settled on the spot, so the payment is created as succeeded
    async fn record_payment(
        &self,
        owner: &str,
        customer: Option<String>,
        sale: Option<String>,
        amount: f64,
        method: PaymentMethod,
    ) -> AppResult<Payment> {
        let now = now_millis();
        let payment = Payment {
            id: None,
            owner: owner.to_string(),
            order: None,
            sale,
            customer,
            amount: to_f64(to_decimal(amount)),
            method,
            status: PaymentState::Succeeded,
            reference: format!("CRP-{}", uuid::Uuid::new_v4().simple()),
            checkout_url: None,
            purpose: PaymentPurpose::CreditRepayment,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        };
        Ok(self.payments.create(payment).await?)
    }

    /// Lower the customer's outstanding balance, floored at zero
    async fn reduce_balance(&self, customer: &mut Customer, amount: f64) -> AppResult<f64> {
        let balance = (to_decimal(customer.outstanding_balance) - to_decimal(amount))
            .max(rust_decimal::Decimal::ZERO);
        customer.outstanding_balance = to_f64(balance);
        customer.updated_at = now_millis();
        let saved = self.customers.save(customer.clone()).await?;
        Ok(saved.outstanding_balance)
    }
}
