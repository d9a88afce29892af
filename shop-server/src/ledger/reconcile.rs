//! Credit reconciliation
//!
//! Pure arithmetic over in-memory credit sales. Callers load the sales,
//! run [`reconcile`] / [`apply_to_sale`], then persist every touched sale.

use rust_decimal::Decimal;
use shared::models::{AppliedCredit, CreditStatus, PaymentMethod, Repayment};
use thiserror::Error;

use super::money::{MONEY_TOLERANCE, round, to_decimal, to_f64};
use crate::db::models::{Document, Sale};
use crate::utils::{AppError, ErrorCode};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("No outstanding credit")]
    NoOutstandingCredit,

    #[error("Payment of {amount:.2} exceeds the outstanding balance of {owed:.2}")]
    ExceedsBalance { amount: f64, owed: f64 },

    #[error("Credit sale {0} is already settled")]
    AlreadySettled(String),

    #[error("Sale {0} is not a credit sale")]
    NotCredit(String),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let code = match &err {
            LedgerError::InvalidAmount => ErrorCode::ValueOutOfRange,
            LedgerError::NoOutstandingCredit => ErrorCode::NoOutstandingCredit,
            LedgerError::ExceedsBalance { .. } => ErrorCode::PaymentExceedsBalance,
            LedgerError::AlreadySettled(_) | LedgerError::NotCredit(_) => {
                ErrorCode::CreditAlreadySettled
            }
        };
        let app = AppError::with_message(code, err.to_string());
        match err {
            LedgerError::ExceedsBalance { amount, owed } => app
                .with_detail("amount", amount)
                .with_detail("outstanding", owed),
            _ => app,
        }
    }
}

/// A repayment to record on every sale it touches
#[derive(Debug, Clone)]
pub struct RepaymentInfo {
    pub method: PaymentMethod,
    pub paid_at: i64,
    /// "payment:key" of the payment that carried the money
    pub payment: Option<String>,
}

/// Split `amount` over the owed amounts, oldest first
///
/// Returns the amount applied to each entry (same order, trailing zeros for
/// entries the payment did not reach). Rejects payments beyond the total.
pub fn plan_allocation(amount: f64, owed: &[f64]) -> Result<Vec<Decimal>, LedgerError> {
    let amount = round(to_decimal(amount));
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }

    let owed: Vec<Decimal> = owed.iter().map(|o| round(to_decimal(*o))).collect();
    let total: Decimal = owed.iter().copied().sum();
    if total <= Decimal::ZERO {
        return Err(LedgerError::NoOutstandingCredit);
    }
    if amount - total >= MONEY_TOLERANCE {
        return Err(LedgerError::ExceedsBalance {
            amount: to_f64(amount),
            owed: to_f64(total),
        });
    }

    let mut remaining = amount.min(total);
    let plan = owed
        .into_iter()
        .map(|o| {
            let applied = remaining.min(o.max(Decimal::ZERO));
            remaining -= applied;
            applied
        })
        .collect();
    Ok(plan)
}

/// Distribute a customer payment over their outstanding credit sales
///
/// `sales` must be ordered oldest first. Only touched sales are reported.
pub fn reconcile(
    sales: &mut [Sale],
    amount: f64,
    info: &RepaymentInfo,
) -> Result<Vec<AppliedCredit>, LedgerError> {
    let owed: Vec<f64> = sales.iter().map(Sale::amount_owed).collect();
    let plan = plan_allocation(amount, &owed)?;

    let applied = sales
        .iter_mut()
        .zip(plan)
        .filter(|(_, applied)| *applied > Decimal::ZERO)
        .filter_map(|(sale, applied)| record_repayment(sale, applied, info))
        .collect();
    Ok(applied)
}

/// Repay a single credit sale
pub fn apply_to_sale(
    sale: &mut Sale,
    amount: f64,
    info: &RepaymentInfo,
) -> Result<AppliedCredit, LedgerError> {
    let sale_id = sale.id_string();
    let Some(credit) = sale.credit_details.as_ref() else {
        return Err(LedgerError::NotCredit(sale_id));
    };
    if credit.status == CreditStatus::Settled || credit.amount_owed <= 0.0 {
        return Err(LedgerError::AlreadySettled(sale_id));
    }

    let plan = plan_allocation(amount, &[credit.amount_owed])?;
    let applied = plan.first().copied().unwrap_or_default();
    record_repayment(sale, applied, info).ok_or(LedgerError::NotCredit(sale_id))
}

/// Apply an already-validated amount to one sale
fn record_repayment(sale: &mut Sale, applied: Decimal, info: &RepaymentInfo) -> Option<AppliedCredit> {
    let sale_id = sale.id_string();
    let credit = sale.credit_details.as_mut()?;

    let remaining = (round(to_decimal(credit.amount_owed)) - applied).max(Decimal::ZERO);
    credit.amount_owed = to_f64(remaining);
    credit.status = if remaining.is_zero() {
        CreditStatus::Settled
    } else {
        CreditStatus::Partial
    };
    credit.repayments.push(Repayment {
        amount: to_f64(applied),
        method: info.method,
        paid_at: info.paid_at,
        payment: info.payment.clone(),
    });
    let status = credit.status;

    sale.amount_paid = to_f64(to_decimal(sale.amount_paid) + applied);
    sale.updated_at = info.paid_at;

    Some(AppliedCredit {
        sale_id,
        applied: to_f64(applied),
        remaining_owed: to_f64(remaining),
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{CreditDetails, PaymentType};
    use surrealdb::RecordId;

    fn credit_sale(key: &str, total: f64, owed: f64, created_at: i64) -> Sale {
        Sale {
            id: Some(RecordId::from_table_key("sale", key)),
            owner: "user:shop".into(),
            customer: Some("customer:c1".into()),
            order: None,
            items: vec![],
            total_amount: total,
            amount_paid: total - owed,
            payment_method: PaymentMethod::Cash,
            payment_type: PaymentType::Credit,
            credit_details: Some(CreditDetails {
                amount_owed: owed,
                due_date: None,
                status: CreditStatus::Outstanding,
                repayments: vec![],
            }),
            created_at,
            updated_at: created_at,
        }
    }

    fn info() -> RepaymentInfo {
        RepaymentInfo {
            method: PaymentMethod::Cash,
            paid_at: 1_000,
            payment: Some("payment:p1".into()),
        }
    }

    #[test]
    fn test_plan_allocation_oldest_first() {
        let plan = plan_allocation(70.0, &[50.0, 30.0, 20.0]).unwrap();
        assert_eq!(plan, vec![Decimal::from(50), Decimal::from(20), Decimal::ZERO]);
    }

    #[test]
    fn test_plan_allocation_rejects_overpayment() {
        let err = plan_allocation(100.01, &[50.0, 50.0]).unwrap_err();
        assert_eq!(err, LedgerError::ExceedsBalance { amount: 100.01, owed: 100.0 });
        assert_eq!(plan_allocation(10.0, &[]).unwrap_err(), LedgerError::NoOutstandingCredit);
        assert_eq!(plan_allocation(0.0, &[10.0]).unwrap_err(), LedgerError::InvalidAmount);
    }

    #[test]
    fn test_reconcile_partial_payment() {
        let mut sales = vec![
            credit_sale("a", 100.0, 40.0, 1),
            credit_sale("b", 80.0, 80.0, 2),
            credit_sale("c", 10.0, 10.0, 3),
        ];
        let applied = reconcile(&mut sales, 60.0, &info()).unwrap();

        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0].sale_id, "sale:a");
        assert_eq!(applied[0].applied, 40.0);
        assert_eq!(applied[0].status, CreditStatus::Settled);
        assert_eq!(applied[1].applied, 20.0);
        assert_eq!(applied[1].remaining_owed, 60.0);
        assert_eq!(applied[1].status, CreditStatus::Partial);

        // Untouched sale keeps its state and has no repayment entry
        let c = sales[2].credit_details.as_ref().unwrap();
        assert_eq!(c.status, CreditStatus::Outstanding);
        assert!(c.repayments.is_empty());

        assert_eq!(sales[0].amount_paid, 100.0);
        assert_eq!(sales[1].amount_paid, 20.0);
        let b = sales[1].credit_details.as_ref().unwrap();
        assert_eq!(b.repayments.len(), 1);
        assert_eq!(b.repayments[0].payment.as_deref(), Some("payment:p1"));
    }

    #[test]
    fn test_reconcile_exact_total_settles_everything() {
        let mut sales = vec![credit_sale("a", 10.1, 10.1, 1), credit_sale("b", 20.2, 20.2, 2)];
        let applied = reconcile(&mut sales, 30.3, &info()).unwrap();
        assert!(applied.iter().all(|a| a.status == CreditStatus::Settled));
        assert!(sales.iter().all(|s| s.amount_owed() == 0.0));
    }

    #[test]
    fn test_reconcile_overpayment_leaves_sales_untouched() {
        let mut sales = vec![credit_sale("a", 10.0, 10.0, 1)];
        let err = reconcile(&mut sales, 15.0, &info()).unwrap_err();
        assert!(matches!(err, LedgerError::ExceedsBalance { .. }));
        assert_eq!(sales[0].amount_owed(), 10.0);
        assert!(sales[0].credit_details.as_ref().unwrap().repayments.is_empty());
    }

    #[test]
    fn test_amount_owed_never_negative() {
        // Inside the tolerance the payment is accepted and the sale settles at 0
        let mut sales = vec![credit_sale("a", 10.0, 10.0, 1)];
        reconcile(&mut sales, 10.004, &info()).unwrap();
        assert_eq!(sales[0].amount_owed(), 0.0);
    }

    #[test]
    fn test_apply_to_sale() {
        let mut sale = credit_sale("a", 50.0, 50.0, 1);
        let applied = apply_to_sale(&mut sale, 20.0, &info()).unwrap();
        assert_eq!(applied.remaining_owed, 30.0);
        assert_eq!(applied.status, CreditStatus::Partial);

        let err = apply_to_sale(&mut sale, 31.0, &info()).unwrap_err();
        assert!(matches!(err, LedgerError::ExceedsBalance { .. }));

        apply_to_sale(&mut sale, 30.0, &info()).unwrap();
        assert_eq!(
            apply_to_sale(&mut sale, 1.0, &info()).unwrap_err(),
            LedgerError::AlreadySettled("sale:a".into())
        );
    }

    #[test]
    fn test_apply_to_full_sale_rejected() {
        let mut sale = credit_sale("f", 10.0, 0.0, 1);
        sale.credit_details = None;
        sale.payment_type = PaymentType::Full;
        assert!(matches!(
            apply_to_sale(&mut sale, 1.0, &info()),
            Err(LedgerError::NotCredit(_))
        ));
    }

    #[test]
    fn test_error_codes() {
        let e: AppError = LedgerError::ExceedsBalance { amount: 2.0, owed: 1.0 }.into();
        assert_eq!(e.code, ErrorCode::PaymentExceedsBalance);
        let e: AppError = LedgerError::NoOutstandingCredit.into();
        assert_eq!(e.code, ErrorCode::NoOutstandingCredit);
        let e: AppError = LedgerError::AlreadySettled("sale:a".into()).into();
        assert_eq!(e.code, ErrorCode::CreditAlreadySettled);
    }
}
