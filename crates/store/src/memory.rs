//! In-memory `FeeStore` used by tests and local runs.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use coachfee_core::{BillingRecord, Group, GroupId, Member, MemberId, Period};

use crate::error::StoreError;
use crate::traits::FeeStore;

#[derive(Default)]
struct Tables {
    groups: HashMap<GroupId, Group>,
    members: HashMap<MemberId, Member>,
    billing: HashMap<(MemberId, Period), BillingRecord>,
}

/// Map-backed store guarded by a single `RwLock`.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-seeded with groups and members.
    pub fn seeded(groups: Vec<Group>, members: Vec<Member>) -> Self {
        let store = Self::new();
        {
            let mut tables = store
                .tables
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            for group in groups {
                tables.groups.insert(group.id, group);
            }
            for member in members {
                tables.members.insert(member.id, member);
            }
        }
        store
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl FeeStore for MemoryStore {
    async fn groups_due_on(&self, day: u32) -> Result<Vec<Group>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .groups
            .values()
            .filter(|g| u32::from(g.payment_due_day) == day)
            .cloned()
            .collect())
    }

    async fn group(&self, id: GroupId) -> Result<Option<Group>, StoreError> {
        Ok(self.read()?.groups.get(&id).cloned())
    }

    async fn members_of(&self, group_id: GroupId) -> Result<Vec<Member>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .members
            .values()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn billing_records(
        &self,
        group_id: GroupId,
        period: &Period,
    ) -> Result<Vec<BillingRecord>, StoreError> {
        let tables = self.read()?;
        let member_ids: Vec<MemberId> = tables
            .members
            .values()
            .filter(|m| m.group_id == group_id)
            .map(|m| m.id)
            .collect();
        Ok(member_ids
            .iter()
            .filter_map(|id| tables.billing.get(&(*id, *period)).cloned())
            .collect())
    }

    async fn upsert_billing(&self, record: BillingRecord) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables
            .billing
            .insert((record.member_id, record.period), record);
        Ok(())
    }

    async fn record_payment(
        &self,
        member_id: MemberId,
        period: &Period,
        amount: f64,
    ) -> Result<BillingRecord, StoreError> {
        let mut tables = self.write()?;
        let monthly_fee = tables
            .members
            .get(&member_id)
            .ok_or_else(|| StoreError::MemberNotFound(member_id.to_string()))?
            .monthly_fee;

        let record = tables
            .billing
            .entry((member_id, *period))
            .or_insert_with(|| BillingRecord {
                member_id,
                period: *period,
                amount_due: monthly_fee,
                amount_paid: 0.0,
            });
        record.amount_paid += amount;
        Ok(record.clone())
    }
}
