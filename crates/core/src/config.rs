use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sms: SmsConfig,
    pub scheduler: SchedulerConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            sms: SmsConfig::from_env(),
            scheduler: SchedulerConfig::from_env(),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  sms:        sender={}, country_code={}, configured={}",
            self.sms.sender_id,
            self.sms.country_code,
            self.sms.is_configured()
        );
        tracing::info!("  scheduler:  cron={}", self.scheduler.cron);
    }
}

// ── SMS gateway ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    /// Provider submit endpoint.
    pub api_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// Sender id shown to recipients.
    pub sender_id: String,
    /// International prefix prepended to local numbers (no leading '+').
    pub country_code: String,
}

impl SmsConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env_or("SMS_API_URL", "https://rest.nexmo.com/sms/json"),
            api_key: env_opt("SMS_API_KEY"),
            api_secret: env_opt("SMS_API_SECRET"),
            sender_id: env_or("SMS_SENDER_ID", "CoachFee"),
            country_code: env_or("SMS_COUNTRY_CODE", "972"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.api_secret.is_some()
    }
}

// ── Reminder scheduler ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// 5-field cron expression for the daily batch, local wall clock.
    pub cron: String,
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        Self {
            cron: env_or("REMINDER_CRON", "0 9 * * *"),
        }
    }
}
