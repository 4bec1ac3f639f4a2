//! In-memory ledger replay
//!
//! Drives the approval, payment, and billing engines against a single
//! in-memory account, with no persistence. Used by tests and by operators who
//! want to preview how a sequence of events moves a balance.

use chrono::{DateTime, Utc};

use core_kernel::{BillingPeriod, MemberId, Money, Timezone, UserId};

use crate::account::{Actor, MemberAccount};
use crate::approval::ApprovalEngine;
use crate::billing::BillingEngine;
use crate::error::LedgerError;
use crate::payment::apply_payment_to_account;

/// A single-account replay of ledger events
#[derive(Debug)]
pub struct LedgerSimulation {
    approval: ApprovalEngine,
    billing: BillingEngine,
    account: MemberAccount,
    clock: DateTime<Utc>,
}

impl LedgerSimulation {
    /// Starts a simulation from a fresh pending registration
    pub fn new(period_charge: Money, period: BillingPeriod) -> Self {
        Self {
            approval: ApprovalEngine::new(period_charge, period, Timezone::default()),
            billing: BillingEngine::new(period_charge, period),
            account: MemberAccount::pending(MemberId::new(), UserId::new()),
            clock: Utc::now(),
        }
    }

    /// The current balance
    pub fn balance(&self) -> Money {
        self.account.balance
    }

    /// The simulated account
    pub fn account(&self) -> &MemberAccount {
        &self.account
    }

    /// Approves the registration with the given sequence number
    pub fn approve(&mut self, sequence: i64) -> Result<(), LedgerError> {
        let actor = Actor::admin(UserId::new());
        let outcome = self
            .approval
            .approve(&self.account, sequence, &actor, self.clock)?;
        self.account = outcome.account;
        Ok(())
    }

    /// Applies a payment
    pub fn pay(&mut self, amount: Money) -> Result<Money, LedgerError> {
        let outcome = apply_payment_to_account(&self.account, amount)?;
        self.account.balance = outcome.new_balance;
        self.account.updated_at = self.clock;
        Ok(outcome.new_balance)
    }

    /// Applies one period charge
    pub fn charge(&mut self) -> Result<Money, LedgerError> {
        let outcome = self.billing.apply_period_charge(&self.account)?;
        self.account.balance = outcome.new_balance;
        self.account.billing_date = Some(outcome.next_billing_date);
        self.account.updated_at = self.clock;
        Ok(outcome.new_balance)
    }
}
