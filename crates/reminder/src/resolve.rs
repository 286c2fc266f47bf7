//! Due-day and unpaid-member resolvers.
//!
//! Both the scheduled batch and the on-demand "send now" operation resolve
//! candidates through these functions — there is no divergent logic path.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use coachfee_core::{BillingRecord, Group, Member, MemberId, PaymentStatus, Period};
use coachfee_store::FeeStore;

use crate::error::ReminderError;

/// A member who still owes money for a period, with the effective figures.
///
/// When no billing record exists for the period, the member's current
/// monthly fee is the amount due and nothing has been paid.
#[derive(Debug, Clone)]
pub struct UnpaidMember {
    pub member: Member,
    pub amount_due: f64,
    pub amount_paid: f64,
}

/// Groups whose configured due day matches `today`'s day-of-month.
///
/// The wall-clock day of the executing process is authoritative; a
/// `payment_due_day` of 31 never matches in shorter months.
pub async fn due_groups(
    store: &dyn FeeStore,
    today: NaiveDate,
) -> Result<Vec<Group>, ReminderError> {
    Ok(store.groups_due_on(today.day()).await?)
}

/// Members of `group` whose effective status for `period` is unpaid or
/// partial. Fully paid members are excluded.
pub async fn unpaid_members(
    store: &dyn FeeStore,
    group: &Group,
    period: &Period,
) -> Result<Vec<UnpaidMember>, ReminderError> {
    let members = store.members_of(group.id).await?;
    let records = store.billing_records(group.id, period).await?;

    let by_member: HashMap<MemberId, BillingRecord> =
        records.into_iter().map(|r| (r.member_id, r)).collect();

    let unpaid = members
        .into_iter()
        .filter_map(|member| {
            let (amount_due, amount_paid) = match by_member.get(&member.id) {
                Some(record) => (record.amount_due, record.amount_paid),
                None => (member.monthly_fee, 0.0),
            };
            match PaymentStatus::derive(amount_due, amount_paid) {
                PaymentStatus::Paid => None,
                PaymentStatus::Partial | PaymentStatus::Unpaid => Some(UnpaidMember {
                    member,
                    amount_due,
                    amount_paid,
                }),
            }
        })
        .collect();

    Ok(unpaid)
}
