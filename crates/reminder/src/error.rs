use thiserror::Error;

use coachfee_store::StoreError;

/// Errors surfaced by the reminder engine outside the per-recipient path.
///
/// Per-recipient delivery errors never appear here — they are captured into
/// [`DispatchOutcome`](crate::engine::DispatchOutcome) at the fan-out
/// boundary.
#[derive(Error, Debug)]
pub enum ReminderError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid cron expression '{expr}': {reason}")]
    Schedule { expr: String, reason: String },
}
