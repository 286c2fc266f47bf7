//! Batch dispatcher — fans reminders out across due groups and members.
//!
//! For each group the unpaid members are resolved, members without a usable
//! phone are counted separately, and the rest get one compose+send task
//! each. Tasks run concurrently and every outcome is captured
//! independently; one recipient's failure never aborts or blocks the batch
//! for other recipients.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{error, info, warn};

use coachfee_core::{Group, MemberId, Period};
use coachfee_notify::{compose, SmsGateway};
use coachfee_store::FeeStore;

use crate::resolve::{unpaid_members, UnpaidMember};

/// Result of one attempted reminder delivery. Ephemeral — lives only for
/// the duration of a batch run and its returned report.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub member_id: MemberId,
    pub name: String,
    pub phone: String,
    pub succeeded: bool,
    pub error: Option<String>,
}

/// Aggregate counts for one batch run.
///
/// `sent + failed + skipped_no_phone` partitions the unpaid-member set;
/// `total` is that set's size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub sent: usize,
    pub failed: usize,
    pub skipped_no_phone: usize,
    pub total: usize,
}

/// Summary plus the per-recipient outcomes of the attempted deliveries.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub outcomes: Vec<DispatchOutcome>,
}

/// Dispatches reminder batches over the store and gateway collaborators.
pub struct ReminderEngine {
    store: Arc<dyn FeeStore>,
    gateway: Arc<dyn SmsGateway>,
}

impl ReminderEngine {
    pub fn new(store: Arc<dyn FeeStore>, gateway: Arc<dyn SmsGateway>) -> Self {
        Self { store, gateway }
    }

    pub fn store(&self) -> &Arc<dyn FeeStore> {
        &self.store
    }

    /// Run one batch over the given groups for a billing period.
    ///
    /// A group whose member resolution fails is logged and contributes zero
    /// successes; the remaining groups are still processed. Per-recipient
    /// errors are converted into outcomes, never propagated.
    pub async fn run_batch(
        &self,
        groups: &[Group],
        period: &Period,
        custom_message: Option<&str>,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for group in groups {
            let unpaid = match unpaid_members(self.store.as_ref(), group, period).await {
                Ok(unpaid) => unpaid,
                Err(e) => {
                    error!(
                        group = %group.name,
                        group_id = %group.id,
                        error = %e,
                        "Failed to resolve unpaid members, skipping group"
                    );
                    continue;
                }
            };

            report.summary.total += unpaid.len();

            let (with_phone, without_phone): (Vec<UnpaidMember>, Vec<UnpaidMember>) = unpaid
                .into_iter()
                .partition(|u| !u.member.phone.trim().is_empty());

            for skipped in &without_phone {
                warn!(
                    member = %skipped.member.full_name,
                    group = %group.name,
                    "No phone number on file, skipping reminder"
                );
            }
            report.summary.skipped_no_phone += without_phone.len();

            let tasks: Vec<_> = with_phone
                .iter()
                .map(|unpaid| {
                    self.dispatch_one(unpaid, period, group.payment_due_day, custom_message)
                })
                .collect();

            for outcome in join_all(tasks).await {
                if outcome.succeeded {
                    report.summary.sent += 1;
                } else {
                    report.summary.failed += 1;
                }
                report.outcomes.push(outcome);
            }
        }

        info!(
            sent = report.summary.sent,
            failed = report.summary.failed,
            skipped_no_phone = report.summary.skipped_no_phone,
            total = report.summary.total,
            "Reminder batch complete"
        );
        report
    }

    /// Compose and deliver one reminder, capturing success or error.
    async fn dispatch_one(
        &self,
        unpaid: &UnpaidMember,
        period: &Period,
        due_day: u8,
        custom_message: Option<&str>,
    ) -> DispatchOutcome {
        let member = &unpaid.member;
        let mut outcome = DispatchOutcome {
            member_id: member.id,
            name: member.full_name.clone(),
            phone: member.phone.clone(),
            succeeded: false,
            error: None,
        };

        let text = match compose(
            member,
            unpaid.amount_due,
            unpaid.amount_paid,
            period,
            due_day,
            custom_message,
        ) {
            Ok(text) => text,
            Err(e) => {
                warn!(member = %member.full_name, error = %e, "Composing reminder failed");
                outcome.error = Some(e.to_string());
                return outcome;
            }
        };

        match self.gateway.send(&member.phone, &text).await {
            Ok(receipt) => {
                info!(
                    member = %member.full_name,
                    message_id = receipt.message_id.as_deref().unwrap_or("-"),
                    gateway = self.gateway.gateway_name(),
                    "Reminder sent"
                );
                outcome.succeeded = true;
            }
            Err(e) => {
                warn!(
                    member = %member.full_name,
                    error = %e,
                    gateway = self.gateway.gateway_name(),
                    "Reminder delivery failed"
                );
                outcome.error = Some(e.to_string());
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use coachfee_core::{BillingRecord, GroupId, Member};
    use coachfee_notify::{DeliveryReceipt, SmsError};
    use coachfee_store::{MemoryStore, StoreError};
    use uuid::Uuid;

    /// Gateway double that records every submitted text and can be told to
    /// fail for specific phone numbers.
    pub(crate) struct MockGateway {
        pub sent: Mutex<Vec<(String, String)>>,
        pub send_count: AtomicUsize,
        pub fail_phones: Vec<String>,
    }

    impl MockGateway {
        pub fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                send_count: AtomicUsize::new(0),
                fail_phones: Vec::new(),
            }
        }

        pub fn failing_for(phones: &[&str]) -> Self {
            Self {
                fail_phones: phones.iter().map(|p| p.to_string()).collect(),
                ..Self::new()
            }
        }
    }

    #[async_trait::async_trait]
    impl SmsGateway for MockGateway {
        async fn send(&self, phone: &str, text: &str) -> Result<DeliveryReceipt, SmsError> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            if self.fail_phones.iter().any(|p| p == phone) {
                return Err(SmsError::Provider {
                    status: "4".to_string(),
                    detail: "mock rejection".to_string(),
                });
            }
            self.sent
                .lock()
                .unwrap()
                .push((phone.to_string(), text.to_string()));
            Ok(DeliveryReceipt { message_id: None })
        }

        fn gateway_name(&self) -> &str {
            "mock"
        }
    }

    /// Store double that fails member lookups for one group and delegates
    /// everything else to an in-memory store.
    struct BrokenMembersStore {
        inner: MemoryStore,
        broken_group: GroupId,
    }

    #[async_trait::async_trait]
    impl FeeStore for BrokenMembersStore {
        async fn groups_due_on(&self, day: u32) -> Result<Vec<Group>, StoreError> {
            self.inner.groups_due_on(day).await
        }

        async fn group(&self, id: GroupId) -> Result<Option<Group>, StoreError> {
            self.inner.group(id).await
        }

        async fn members_of(&self, group_id: GroupId) -> Result<Vec<Member>, StoreError> {
            if group_id == self.broken_group {
                return Err(StoreError::Backend("member table unavailable".to_string()));
            }
            self.inner.members_of(group_id).await
        }

        async fn billing_records(
            &self,
            group_id: GroupId,
            period: &Period,
        ) -> Result<Vec<BillingRecord>, StoreError> {
            self.inner.billing_records(group_id, period).await
        }

        async fn upsert_billing(&self, record: BillingRecord) -> Result<(), StoreError> {
            self.inner.upsert_billing(record).await
        }

        async fn record_payment(
            &self,
            member_id: MemberId,
            period: &Period,
            amount: f64,
        ) -> Result<BillingRecord, StoreError> {
            self.inner.record_payment(member_id, period, amount).await
        }
    }

    fn group(due_day: u8) -> Group {
        Group {
            id: Uuid::new_v4(),
            coach_id: Uuid::new_v4(),
            name: "U16".to_string(),
            payment_due_day: due_day,
            default_fee: 50.0,
        }
    }

    fn member(group: &Group, name: &str, phone: &str) -> Member {
        Member {
            id: Uuid::new_v4(),
            group_id: group.id,
            full_name: name.to_string(),
            phone: phone.to_string(),
            monthly_fee: 50.0,
        }
    }

    fn period() -> Period {
        "2026-08".parse().unwrap()
    }

    #[tokio::test]
    async fn counts_partition_the_candidate_set() {
        let g = group(15);
        let ok = member(&g, "Dana Cohen", "0526867838");
        let no_phone = member(&g, "Avi Silent", "");
        let failing = member(&g, "Omri Levi", "0539999999");
        let store = Arc::new(MemoryStore::seeded(
            vec![g.clone()],
            vec![ok, no_phone, failing],
        ));
        let gateway = Arc::new(MockGateway::failing_for(&["0539999999"]));
        let engine = ReminderEngine::new(store, gateway);

        let report = engine.run_batch(&[g], &period(), None).await;
        assert_eq!(report.summary.sent, 1);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.skipped_no_phone, 1);
        assert_eq!(report.summary.total, 3);
        assert_eq!(
            report.summary.sent + report.summary.failed + report.summary.skipped_no_phone,
            report.summary.total
        );
    }

    #[tokio::test]
    async fn blank_phone_is_skipped_not_failed() {
        let g = group(15);
        let silent = member(&g, "Avi Silent", "   ");
        let store = Arc::new(MemoryStore::seeded(vec![g.clone()], vec![silent]));
        let gateway = Arc::new(MockGateway::new());
        let engine = ReminderEngine::new(store, gateway.clone());

        let report = engine.run_batch(&[g], &period(), None).await;
        assert_eq!(report.summary.skipped_no_phone, 1);
        assert_eq!(report.summary.failed, 0);
        assert_eq!(gateway.send_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn one_failure_does_not_block_siblings() {
        let g = group(15);
        let a = member(&g, "A One", "0521111111");
        let b = member(&g, "B Two", "0522222222");
        let c = member(&g, "C Three", "0523333333");
        let store = Arc::new(MemoryStore::seeded(vec![g.clone()], vec![a, b, c]));
        let gateway = Arc::new(MockGateway::failing_for(&["0522222222"]));
        let engine = ReminderEngine::new(store, gateway.clone());

        let report = engine.run_batch(&[g], &period(), None).await;
        assert_eq!(report.summary.sent, 2);
        assert_eq!(report.summary.failed, 1);
        let failed: Vec<_> = report.outcomes.iter().filter(|o| !o.succeeded).collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].error.as_deref().unwrap().contains("mock rejection"));
    }

    #[tokio::test]
    async fn paid_member_excluded_and_remaining_computed() {
        let g = group(15);
        let paid = member(&g, "Avi Paid", "0521111111");
        let partial = member(&g, "Dana Cohen", "0526867838");
        let store = Arc::new(MemoryStore::seeded(
            vec![g.clone()],
            vec![paid.clone(), partial.clone()],
        ));
        let p = period();
        store.record_payment(paid.id, &p, 50.0).await.unwrap();
        store.record_payment(partial.id, &p, 20.0).await.unwrap();

        let gateway = Arc::new(MockGateway::new());
        let engine = ReminderEngine::new(store, gateway.clone());

        let report = engine.run_batch(&[g], &p, None).await;
        assert_eq!(report.summary.sent, 1);
        assert_eq!(report.summary.total, 1);

        let sent = gateway.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "0526867838");
        assert!(sent[0].1.contains("remaining: 30"));
    }

    #[tokio::test]
    async fn custom_message_sent_verbatim_to_all_included() {
        let g = group(15);
        let a = member(&g, "A One", "0521111111");
        let b = member(&g, "B Two", "0522222222");
        let store = Arc::new(MemoryStore::seeded(vec![g.clone()], vec![a, b]));
        let gateway = Arc::new(MockGateway::new());
        let engine = ReminderEngine::new(store, gateway.clone());

        let report = engine.run_batch(&[g], &period(), Some("Reminder!")).await;
        assert_eq!(report.summary.sent, 2);
        let sent = gateway.sent.lock().unwrap();
        assert!(sent.iter().all(|(_, text)| text == "Reminder!"));
    }

    #[tokio::test]
    async fn group_with_failing_member_lookup_does_not_stop_other_groups() {
        let broken = group(15);
        let healthy = group(15);
        let unreachable = member(&broken, "Lost Row", "0521111111");
        let reachable = member(&healthy, "Dana Cohen", "0526867838");
        let store = Arc::new(BrokenMembersStore {
            inner: MemoryStore::seeded(
                vec![broken.clone(), healthy.clone()],
                vec![unreachable, reachable],
            ),
            broken_group: broken.id,
        });
        let gateway = Arc::new(MockGateway::new());
        let engine = ReminderEngine::new(store, gateway.clone());

        let report = engine.run_batch(&[broken, healthy], &period(), None).await;
        assert_eq!(report.summary.sent, 1);
        assert_eq!(report.summary.failed, 0);
        assert_eq!(report.summary.total, 1);
        assert_eq!(report.outcomes.len(), 1);

        let sent = gateway.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "0526867838");
    }

    #[tokio::test]
    async fn empty_group_list_yields_empty_report() {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(MockGateway::new());
        let engine = ReminderEngine::new(store, gateway);

        let report = engine.run_batch(&[], &period(), None).await;
        assert_eq!(report.summary, BatchSummary::default());
        assert!(report.outcomes.is_empty());
    }
}
