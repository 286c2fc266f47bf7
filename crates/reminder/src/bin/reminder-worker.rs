//! reminder-worker — daily payment-reminder batch scheduler.
//!
//! Wires the reminder engine to the configured SMS gateway and fee store,
//! then runs the cron loop (default 09:00 local time). `--once` fires a
//! single guarded batch and exits, which is handy for cron-external
//! invocation and smoke testing.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use coachfee_core::{config, Config};
use coachfee_notify::HttpSmsGateway;
use coachfee_reminder::{ReminderEngine, ReminderScheduler};
use coachfee_store::MemoryStore;

/// Daily payment-reminder worker.
#[derive(Parser, Debug)]
#[command(name = "reminder-worker", version, about)]
struct Cli {
    /// 5-field cron expression for the daily batch (local wall clock).
    #[arg(long, env = "REMINDER_CRON")]
    cron: Option<String>,

    /// Fire one guarded batch immediately and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    config::load_dotenv();
    let cli = Cli::parse();
    let config = Config::from_env();
    config.log_summary();

    let gateway = Arc::new(HttpSmsGateway::from_config(&config.sms)?);
    // Wiring point for the real document store; the in-memory store keeps
    // the worker runnable without a backend.
    let store = Arc::new(MemoryStore::new());
    let engine = Arc::new(ReminderEngine::new(store, gateway));

    let cron = cli.cron.unwrap_or(config.scheduler.cron);
    let scheduler = ReminderScheduler::new(engine, &cron)?;

    if cli.once {
        info!("Firing a single reminder batch");
        match scheduler.fire().await {
            Some(report) => info!(
                sent = report.summary.sent,
                failed = report.summary.failed,
                skipped_no_phone = report.summary.skipped_no_phone,
                total = report.summary.total,
                "Batch finished"
            ),
            None => info!("Batch skipped: another run is active"),
        }
        return Ok(());
    }

    scheduler.run().await;
    Ok(())
}
