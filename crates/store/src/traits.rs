//! `FeeStore` trait — the lookup/update operations the reminder engine uses.

use coachfee_core::{BillingRecord, Group, GroupId, Member, MemberId, Period};

use crate::error::StoreError;

/// Read (and minimal update) access to groups, members, and billing records.
///
/// The reminder engine only reads. The update operations exist because the
/// surrounding tracker records payments through the same store, and tests
/// set up paid/partial/unpaid states the same way.
#[async_trait::async_trait]
pub trait FeeStore: Send + Sync {
    /// All groups whose `payment_due_day` equals the given day-of-month.
    async fn groups_due_on(&self, day: u32) -> Result<Vec<Group>, StoreError>;

    /// Look up a single group by id.
    async fn group(&self, id: GroupId) -> Result<Option<Group>, StoreError>;

    /// All members of a group.
    async fn members_of(&self, group_id: GroupId) -> Result<Vec<Member>, StoreError>;

    /// All billing records of a group's members for one period.
    ///
    /// Members without a record for the period are simply absent from the
    /// result; callers apply the absence-means-unpaid rule.
    async fn billing_records(
        &self,
        group_id: GroupId,
        period: &Period,
    ) -> Result<Vec<BillingRecord>, StoreError>;

    /// Insert or replace a billing record keyed by `(member_id, period)`.
    async fn upsert_billing(&self, record: BillingRecord) -> Result<(), StoreError>;

    /// Add a payment to a member's record for a period, creating the record
    /// with the member's monthly fee as `amount_due` if it does not exist.
    async fn record_payment(
        &self,
        member_id: MemberId,
        period: &Period,
        amount: f64,
    ) -> Result<BillingRecord, StoreError>;
}
