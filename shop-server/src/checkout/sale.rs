//! Direct POS sales and sales reporting

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use shared::models::{CreditDetails, CreditStatus, NotificationKind, PaymentType, SaleCreate, SalesSummary};
use shared::util::now_millis;

use super::CheckoutService;
use crate::db::models::{Document, Sale};
use crate::ledger::money::{exceeds, is_payment_sufficient, round_f64, sum, to_decimal, to_f64};
use crate::utils::{AppError, AppResult, ErrorCode};

impl CheckoutService {
    /// Record a counter sale: full when paid in full, otherwise on credit
    pub async fn create_sale(&self, owner: &str, req: SaleCreate) -> AppResult<Sale> {
        if req.items.is_empty() {
            return Err(AppError::new(ErrorCode::OrderEmpty));
        }
        let items = self.price_inputs(owner, &req.items).await?;
        let total = to_f64(sum(items.iter().map(|i| i.subtotal)));
        let paid = round_f64(req.amount_paid);

        if exceeds(paid, total) {
            return Err(AppError::new(ErrorCode::SaleOverpaid)
                .with_detail("total", total)
                .with_detail("amount_paid", paid));
        }
        let is_credit = !is_payment_sufficient(paid, total);
        if is_credit && req.customer_id.is_none() {
            return Err(AppError::new(ErrorCode::CreditRequiresCustomer));
        }
        let customer = self.customer_ref(owner, req.customer_id.as_deref()).await?;

        let owed = if is_credit {
            to_f64(to_decimal(total) - to_decimal(paid))
        } else {
            0.0
        };
        let now = now_millis();
        let sale = Sale {
            id: None,
            owner: owner.to_string(),
            customer: customer.clone(),
            order: None,
            items,
            total_amount: total,
            amount_paid: if is_credit { paid } else { total },
            payment_method: req.payment_method,
            payment_type: if is_credit { PaymentType::Credit } else { PaymentType::Full },
            credit_details: is_credit.then(|| CreditDetails {
                amount_owed: owed,
                due_date: req.due_date,
                status: CreditStatus::Outstanding,
                repayments: vec![],
            }),
            created_at: now,
            updated_at: now,
        };

        self.decrement_stock(owner, &sale.items).await?;
        let sale = self.sales.create(sale).await?;

        if let Some(customer_ref) = customer.as_deref()
            && let Some(mut c) = self.customers.find_by_id(owner, customer_ref).await?
        {
            c.total_spent = to_f64(to_decimal(c.total_spent) + to_decimal(total));
            c.outstanding_balance = to_f64(to_decimal(c.outstanding_balance) + to_decimal(owed));
            c.updated_at = now;
            let c = self.customers.save(c).await?;

            if is_credit {
                self.notifications
                    .notify(
                        owner,
                        NotificationKind::Credit,
                        "Credit sale recorded",
                        format!("{} owes {:.2} (balance {:.2})", c.name, owed, c.outstanding_balance),
                        Some(sale.id_string()),
                    )
                    .await;
            }
        }

        tracing::info!(
            sale = %sale.id_string(),
            total,
            paid = sale.amount_paid,
            credit = is_credit,
            "Sale recorded"
        );
        self.logs
            .info(
                owner,
                "sale_created",
                format!("Sale of {:.2} ({:?})", total, sale.payment_type),
                Some(sale.id_string()),
            )
            .await;
        Ok(sale)
    }
}

/// Aggregate sales for the summary report
///
/// `collected` counts up-front payments under the sale's method and each
/// repayment under its own method.
pub fn summarize(sales: &[Sale]) -> SalesSummary {
    let mut revenue = Decimal::ZERO;
    let mut collected = Decimal::ZERO;
    let mut outstanding = Decimal::ZERO;
    let mut credit_count = 0;
    let mut by_method: BTreeMap<String, Decimal> = BTreeMap::new();

    for sale in sales {
        revenue += to_decimal(sale.total_amount);
        collected += to_decimal(sale.amount_paid);

        let mut upfront = to_decimal(sale.amount_paid);
        if let Some(credit) = &sale.credit_details {
            credit_count += 1;
            outstanding += to_decimal(credit.amount_owed);
            for repayment in &credit.repayments {
                let amount = to_decimal(repayment.amount);
                upfront -= amount;
                *by_method.entry(repayment.method.as_str().to_string()).or_default() += amount;
            }
        }
        *by_method
            .entry(sale.payment_method.as_str().to_string())
            .or_default() += upfront.max(Decimal::ZERO);
    }

    SalesSummary {
        count: sales.len() as u64,
        credit_count,
        revenue: to_f64(revenue),
        collected: to_f64(collected),
        outstanding_credit: to_f64(outstanding),
        by_method: by_method.into_iter().map(|(k, v)| (k, to_f64(v))).collect(),
    }
}
