//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant fields
//! while using defaults for everything else.

use chrono::{DateTime, Utc};
use core_kernel::{MemberId, MemberNumber, Money, UserId};
use domain_ledger::account::{AccountStatus, MemberAccount, RegistrationStatus};
use domain_ledger::audit::AccountSnapshot;
use domain_ledger::contribution::{Contribution, ContributionCategory, TransactionMethod};

use crate::fixtures::MoneyFixtures;

/// Builder for member accounts in arbitrary ledger states
pub struct TestMemberBuilder {
    id: MemberId,
    user_id: UserId,
    member_number: Option<MemberNumber>,
    registration_status: RegistrationStatus,
    account_status: AccountStatus,
    balance: Money,
    billing_date: Option<DateTime<Utc>>,
}

impl Default for TestMemberBuilder {
    fn default() -> Self {
        Self::pending()
    }
}

impl TestMemberBuilder {
    /// A fresh pending registration
    pub fn pending() -> Self {
        Self {
            id: MemberId::new(),
            user_id: UserId::new(),
            member_number: None,
            registration_status: RegistrationStatus::Pending,
            account_status: AccountStatus::Inactive,
            balance: Money::zero(),
            billing_date: None,
        }
    }

    /// An approved, active member one period in arrears with a billing date
    /// one period out, the state approval leaves behind
    pub fn approved(sequence: i64) -> Self {
        Self {
            id: MemberId::new(),
            user_id: UserId::new(),
            member_number: Some(MemberNumber::from_sequence(sequence).unwrap()),
            registration_status: RegistrationStatus::Approved,
            account_status: AccountStatus::Active,
            balance: MoneyFixtures::opening_balance(),
            billing_date: Some(Utc::now() + chrono::Duration::days(30)),
        }
    }

    /// Sets the member ID
    pub fn with_id(mut self, id: MemberId) -> Self {
        self.id = id;
        self
    }

    /// Sets the linked user ID
    pub fn with_user_id(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    /// Sets the signed balance
    pub fn with_balance(mut self, balance: Money) -> Self {
        self.balance = balance;
        self
    }

    /// Sets the billing date
    pub fn with_billing_date(mut self, date: DateTime<Utc>) -> Self {
        self.billing_date = Some(date);
        self
    }

    /// Clears the billing date
    pub fn without_billing_date(mut self) -> Self {
        self.billing_date = None;
        self
    }

    /// Sets the registration status
    pub fn with_registration_status(mut self, status: RegistrationStatus) -> Self {
        self.registration_status = status;
        self
    }

    /// Sets the account status
    pub fn with_account_status(mut self, status: AccountStatus) -> Self {
        self.account_status = status;
        self
    }

    /// Builds the member account
    pub fn build(self) -> MemberAccount {
        let now = Utc::now();
        MemberAccount {
            id: self.id,
            user_id: self.user_id,
            member_number: self.member_number,
            registration_status: self.registration_status,
            balance: self.balance,
            billing_date: self.billing_date,
            account_status: self.account_status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds a lenient snapshot of the same state, as the auditor reads it
    pub fn build_snapshot(self) -> AccountSnapshot {
        AccountSnapshot {
            member_id: self.id,
            member_number: self.member_number,
            registration_status: self.registration_status,
            account_status: self.account_status,
            balance: Some(self.balance),
            billing_date: self.billing_date,
        }
    }
}

/// Builder for contribution facts
pub struct TestContributionBuilder {
    member_id: MemberId,
    amount: Money,
    category: ContributionCategory,
    method: TransactionMethod,
    external_receipt: Option<String>,
    reference: Option<String>,
    recorded_by: UserId,
}

impl Default for TestContributionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContributionBuilder {
    /// A monthly cash contribution at the standard charge
    pub fn new() -> Self {
        Self {
            member_id: MemberId::new(),
            amount: MoneyFixtures::period_charge(),
            category: ContributionCategory::Monthly,
            method: TransactionMethod::Cash,
            external_receipt: None,
            reference: None,
            recorded_by: UserId::new(),
        }
    }

    /// A mobile-money contribution with a receipt
    pub fn mobile_money(receipt: impl Into<String>) -> Self {
        let mut builder = Self::new();
        builder.method = TransactionMethod::MobileMoney;
        builder.external_receipt = Some(receipt.into());
        builder
    }

    /// Sets the member
    pub fn with_member_id(mut self, member_id: MemberId) -> Self {
        self.member_id = member_id;
        self
    }

    /// Sets the amount
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the category
    pub fn with_category(mut self, category: ContributionCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the manual reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Sets the recording staff member
    pub fn with_recorded_by(mut self, user_id: UserId) -> Self {
        self.recorded_by = user_id;
        self
    }

    /// Builds the contribution
    pub fn build(self) -> Contribution {
        let mut contribution = Contribution::new(
            self.member_id,
            self.amount,
            self.category,
            self.method,
            self.recorded_by,
        );
        contribution.external_receipt = self.external_receipt;
        contribution.reference = self.reference;
        contribution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pending_builder_matches_intake_state() {
        let account = TestMemberBuilder::pending().build();

        assert!(account.is_pending());
        assert!(account.balance.is_zero());
        assert!(account.member_number.is_none());
    }

    #[test]
    fn test_approved_builder_is_active_and_in_arrears() {
        let account = TestMemberBuilder::approved(7).build();

        assert!(account.is_active());
        assert_eq!(account.balance.amount(), dec!(-100));
        assert_eq!(account.member_number.unwrap().to_string(), "TNS0007");
        assert!(account.billing_date.is_some());
    }

    #[test]
    fn test_snapshot_builder_mirrors_account_state() {
        let snapshot = TestMemberBuilder::approved(3)
            .with_balance(Money::new(dec!(40)))
            .build_snapshot();

        assert_eq!(snapshot.balance.unwrap().amount(), dec!(40));
        assert_eq!(snapshot.registration_status, RegistrationStatus::Approved);
    }

    #[test]
    fn test_mobile_money_contribution_builder() {
        let contribution = TestContributionBuilder::mobile_money("QK12XYZ889").build();

        assert_eq!(contribution.method, TransactionMethod::MobileMoney);
        assert_eq!(contribution.external_receipt.as_deref(), Some("QK12XYZ889"));
    }
}
