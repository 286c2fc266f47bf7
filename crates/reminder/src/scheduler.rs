//! Daily scheduler trigger for the reminder batch.
//!
//! One long-lived timer computes the next cron tick (local wall clock,
//! default 09:00), sleeps until it, and fires the batch at most once
//! concurrently: if the previous run is still active the tick is skipped,
//! not queued. A missed tick is lost, not replayed. No retry and no
//! in-flight timeout.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Datelike, Local};
use cron::Schedule;
use tracing::{error, info, warn};

use coachfee_core::Period;

use crate::engine::{BatchReport, ReminderEngine};
use crate::error::ReminderError;
use crate::guard::RunGuard;
use crate::resolve::due_groups;

/// Normalize a 5-field cron expression to 6-field by prepending "0 " for
/// seconds. The `cron` crate wants `sec min hour dom month dow`; config
/// uses standard 5-field cron.
fn normalize_cron(cron_5field: &str) -> String {
    let trimmed = cron_5field.trim();
    if trimmed.split_whitespace().count() == 5 {
        format!("0 {trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Fires the reminder batch on a daily cron schedule, guarded against
/// overlapping runs.
pub struct ReminderScheduler {
    engine: Arc<ReminderEngine>,
    guard: RunGuard,
    schedule: Schedule,
    cron_expr: String,
}

impl ReminderScheduler {
    /// Build a scheduler from a 5-field cron expression (local wall clock).
    pub fn new(engine: Arc<ReminderEngine>, cron_expr: &str) -> Result<Self, ReminderError> {
        let normalized = normalize_cron(cron_expr);
        let schedule = Schedule::from_str(&normalized).map_err(|e| ReminderError::Schedule {
            expr: cron_expr.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            engine,
            guard: RunGuard::new(),
            schedule,
            cron_expr: cron_expr.to_string(),
        })
    }

    /// The run guard. The on-demand path deliberately does not consult it.
    pub fn guard(&self) -> &RunGuard {
        &self.guard
    }

    /// Timer loop: sleep until the next scheduled tick, then fire.
    pub async fn run(&self) {
        info!(cron = %self.cron_expr, "Reminder scheduler started");
        loop {
            let now = Local::now();
            let next = match self.schedule.after(&now).next() {
                Some(next) => next,
                None => {
                    error!(cron = %self.cron_expr, "Schedule yields no future ticks, stopping");
                    return;
                }
            };
            let wait = (next - now).to_std().unwrap_or_default();
            info!(next = %next, "Next reminder batch scheduled");
            tokio::time::sleep(wait).await;
            self.fire().await;
        }
    }

    /// Execute one guarded firing.
    ///
    /// Returns `None` when a previous run is still active (the tick is
    /// skipped). The permit is dropped on every path, so a failing batch
    /// can never wedge the guard.
    pub async fn fire(&self) -> Option<BatchReport> {
        let Some(_permit) = self.guard.try_acquire() else {
            warn!("Previous reminder batch still running, skipping this tick");
            return None;
        };
        Some(self.run_due().await)
    }

    /// Resolve today's due groups and dispatch the batch.
    async fn run_due(&self) -> BatchReport {
        let today = Local::now().date_naive();
        let period = Period::from_date(today);

        let groups = match due_groups(self.engine.store().as_ref(), today).await {
            Ok(groups) => groups,
            Err(e) => {
                error!(error = %e, "Resolving due groups failed, nothing dispatched");
                return BatchReport::default();
            }
        };

        if groups.is_empty() {
            info!(day = today.day(), "No groups due today");
            return BatchReport::default();
        }

        info!(groups = groups.len(), period = %period, "Dispatching scheduled reminder batch");
        self.engine.run_batch(&groups, &period, None).await
    }
}
