//! Automated payment-reminder engine.
//!
//! Once a day a scheduled trigger decides which groups are due, which of
//! their members still owe money, and dispatches one SMS per member with
//! per-recipient failure isolation. The same batch path also serves the
//! on-demand "send reminders now" operation.
//!
//! This crate provides:
//! - Due-day and unpaid-member resolvers over the `FeeStore` collaborator
//! - `ReminderEngine` — concurrent fan-out batch dispatcher
//! - On-demand send operation with an explicit request/response surface
//! - `RunGuard` + `ReminderScheduler` — daily cron trigger, at most one
//!   scheduled batch in flight

pub mod engine;
pub mod error;
pub mod guard;
pub mod resolve;
pub mod scheduler;
pub mod send_now;

pub use engine::{BatchReport, BatchSummary, DispatchOutcome, ReminderEngine};
pub use error::ReminderError;
pub use guard::{RunGuard, RunPermit};
pub use resolve::{due_groups, unpaid_members, UnpaidMember};
pub use scheduler::ReminderScheduler;
pub use send_now::{ReminderDetail, SendRemindersRequest, SendRemindersResponse};
