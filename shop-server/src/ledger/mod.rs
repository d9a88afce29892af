//! Credit ledger
//!
//! - [`money`] - Decimal helpers for every monetary calculation
//! - [`reconcile`] - distributing repayments over credit sales (pure)
//! - [`CreditLedger`] - loads, applies and persists repayments

pub mod money;
pub mod reconcile;
mod service;

pub use reconcile::{LedgerError, RepaymentInfo};
pub use service::CreditLedger;
