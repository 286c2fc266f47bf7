//! On-demand "send reminders now" operation.
//!
//! Takes an explicit request struct validated at the boundary and always
//! returns a response body — individual send failures show up only in the
//! `failed` count and `details`, never as an error. `success` reflects
//! whether the operation could run at all (period parses, group exists).
//!
//! This path does NOT consult the run guard: a manual call can run
//! concurrently with a scheduled batch and double-send to the same
//! recipients. Documented behavior, covered by tests.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use coachfee_core::{GroupId, Period};
use coachfee_store::FeeStore;

use crate::engine::{BatchReport, ReminderEngine};

/// Manual trigger request for one group and billing period.
#[derive(Debug, Clone, Deserialize)]
pub struct SendRemindersRequest {
    pub group_id: GroupId,
    /// Billing period in `YYYY-MM` form; validated before dispatch.
    pub period: String,
    /// Optional message sent verbatim instead of the default template.
    #[serde(default)]
    pub custom_message: Option<String>,
}

/// Per-recipient delivery detail in the response.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderDetail {
    pub member_name: String,
    pub phone: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body for the on-demand trigger.
#[derive(Debug, Serialize)]
pub struct SendRemindersResponse {
    /// Whether the operation could run at all — not whether every send
    /// succeeded.
    pub success: bool,
    pub sent: usize,
    pub failed: usize,
    pub total: usize,
    /// Formatted period, e.g. "March 2026".
    pub month: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub details: Vec<ReminderDetail>,
}

impl SendRemindersResponse {
    fn refused(month: String, message: String) -> Self {
        Self {
            success: false,
            sent: 0,
            failed: 0,
            total: 0,
            month,
            message: Some(message),
            details: Vec::new(),
        }
    }

    fn from_report(month: String, report: BatchReport) -> Self {
        Self {
            success: true,
            sent: report.summary.sent,
            failed: report.summary.failed,
            total: report.summary.total,
            month,
            message: None,
            details: report
                .outcomes
                .into_iter()
                .map(|o| ReminderDetail {
                    member_name: o.name,
                    phone: o.phone,
                    success: o.succeeded,
                    error: o.error,
                })
                .collect(),
        }
    }
}

impl ReminderEngine {
    /// Send reminders for a single group right now.
    ///
    /// Uses the same resolver and batch path as the scheduled trigger, with
    /// `groups = [group]`.
    pub async fn send_reminders_now(
        &self,
        request: SendRemindersRequest,
    ) -> SendRemindersResponse {
        let period: Period = match request.period.parse() {
            Ok(period) => period,
            Err(e) => {
                warn!(period = %request.period, error = %e, "Rejecting send-now request");
                return SendRemindersResponse::refused(request.period.clone(), e.to_string());
            }
        };

        let group = match self.store().group(request.group_id).await {
            Ok(Some(group)) => group,
            Ok(None) => {
                warn!(group_id = %request.group_id, "Send-now for unknown group");
                return SendRemindersResponse::refused(
                    period.label(),
                    format!("Group not found: {}", request.group_id),
                );
            }
            Err(e) => {
                warn!(group_id = %request.group_id, error = %e, "Group lookup failed");
                return SendRemindersResponse::refused(period.label(), e.to_string());
            }
        };

        info!(group = %group.name, period = %period, "Manual reminder run requested");
        let report = self
            .run_batch(
                std::slice::from_ref(&group),
                &period,
                request.custom_message.as_deref(),
            )
            .await;

        SendRemindersResponse::from_report(period.label(), report)
    }
}
