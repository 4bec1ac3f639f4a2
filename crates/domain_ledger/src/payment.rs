//! Payment application
//!
//! Incoming payments settle outstanding due first; only the remainder becomes
//! prepaid credit. A member may never show positive credit while still
//! carrying due — paying down debt always takes priority over building
//! credit.

use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::Money;

use crate::account::MemberAccount;
use crate::error::LedgerError;

/// Result of applying one payment against a balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    /// Portion that settled outstanding due
    pub applied_to_due: Money,
    /// Portion that became prepaid credit
    pub credited: Money,
    /// The balance after application
    pub new_balance: Money,
}

/// Applies a payment to a signed balance
///
/// Arithmetically `new_balance = balance + amount`; the two steps exist so
/// the outcome reports how much went to due and how much became credit.
/// Fails with `InvalidAmount` before anything else if `amount` is not
/// strictly positive.
pub fn apply_payment(balance: Money, amount: Money) -> Result<PaymentOutcome, LedgerError> {
    if !amount.is_positive() {
        return Err(LedgerError::InvalidAmount(amount.amount()));
    }

    let due = balance.due();
    let applied_to_due = amount.min(due);
    let credited = amount - applied_to_due;
    let new_balance = balance + amount;

    debug!(
        %balance,
        %amount,
        settled = %applied_to_due,
        credited = %credited,
        "payment applied"
    );

    Ok(PaymentOutcome {
        applied_to_due,
        credited,
        new_balance,
    })
}

/// Applies a payment to an approved member account
///
/// The persistence layer runs this inside the same unit of work that inserts
/// the contribution fact, so the balance and the audit trail never diverge.
pub fn apply_payment_to_account(
    account: &MemberAccount,
    amount: Money,
) -> Result<PaymentOutcome, LedgerError> {
    account.ensure_approved()?;
    apply_payment(account.balance, amount)
}
