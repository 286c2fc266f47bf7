//! Reminder message composition.
//!
//! Pure — no gateway involved, so composition is testable in isolation.
//! A caller-supplied custom message bypasses the template and is used
//! verbatim; otherwise the default template is rendered with minijinja.
//! Templates are plain strings (not pre-registered files), so a fresh
//! [`minijinja::Environment`] is created per render call.

use coachfee_core::{Member, Period};
use serde::Serialize;

use crate::traits::SmsError;

/// Default reminder body. Rendered with [`ReminderContext`].
const DEFAULT_TEMPLATE: &str = "Hi {{ first_name }}, a quick reminder: your {{ month }} \
training fee is due on the {{ due_day }}. Fee: {{ amount_due }}, paid so far: \
{{ amount_paid }}, remaining: {{ remaining }}. Thank you!";

/// Context data available to the reminder template.
#[derive(Debug, Serialize)]
struct ReminderContext {
    first_name: String,
    /// Formatted period, e.g. "March 2026".
    month: String,
    /// Ordinal-suffixed due day, e.g. "15th".
    due_day: String,
    amount_due: String,
    amount_paid: String,
    remaining: String,
}

/// Compose the reminder text for one member.
///
/// `custom` (when non-empty) is used verbatim. Otherwise the default
/// template is filled with the member's first name, the formatted period,
/// the ordinal due day, and the three monetary figures.
pub fn compose(
    member: &Member,
    amount_due: f64,
    amount_paid: f64,
    period: &Period,
    due_day: u8,
    custom: Option<&str>,
) -> Result<String, SmsError> {
    if let Some(message) = custom {
        if !message.trim().is_empty() {
            return Ok(message.to_string());
        }
    }

    let ctx = ReminderContext {
        first_name: member.first_name().to_string(),
        month: period.label(),
        due_day: ordinal(due_day),
        amount_due: format_amount(amount_due),
        amount_paid: format_amount(amount_paid),
        remaining: format_amount(amount_due - amount_paid),
    };

    let env = minijinja::Environment::new();
    env.render_str(DEFAULT_TEMPLATE, &ctx)
        .map_err(|e| SmsError::Template(e.to_string()))
}

/// Day-of-month with English ordinal suffix: 1st, 2nd, 3rd, 4th, ... 21st, 31st.
fn ordinal(day: u8) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

/// Whole amounts render without decimals, fractional amounts with two.
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
