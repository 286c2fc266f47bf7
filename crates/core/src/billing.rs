use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Unique group identifier.
pub type GroupId = Uuid;
/// Unique member identifier.
pub type MemberId = Uuid;
/// Unique coach identifier.
pub type CoachId = Uuid;

/// A training group with a configured monthly payment due day.
///
/// Read-only to the reminder subsystem — groups are created and edited
/// elsewhere in the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub coach_id: CoachId,
    pub name: String,
    /// Calendar day-of-month (1-31) on which reminders fire.
    pub payment_due_day: u8,
    /// Fee applied to members without an individual override.
    pub default_fee: f64,
}

/// A member of a training group. Read-only to the reminder subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub group_id: GroupId,
    pub full_name: String,
    /// Raw phone number as entered; may be empty or in local form.
    pub phone: String,
    pub monthly_fee: f64,
}

impl Member {
    /// First token of the full name, used as the salutation in reminders.
    pub fn first_name(&self) -> &str {
        self.full_name
            .split_whitespace()
            .next()
            .unwrap_or(self.full_name.as_str())
    }
}

/// Derived payment state of a billing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    /// Derive the status from the two monetary figures.
    ///
    /// `Paid` iff `amount_paid >= amount_due`; `Partial` iff
    /// `0 < amount_paid < amount_due`; else `Unpaid`. Pure — recomputing
    /// from the same inputs always yields the same value.
    pub fn derive(amount_due: f64, amount_paid: f64) -> Self {
        if amount_paid >= amount_due {
            PaymentStatus::Paid
        } else if amount_paid > 0.0 {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }
}

/// One member's billing state for one period.
///
/// A record may not exist for a period — absence is equivalent to `Unpaid`
/// with `amount_due = member.monthly_fee` and `amount_paid = 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingRecord {
    pub member_id: MemberId,
    pub period: Period,
    pub amount_due: f64,
    pub amount_paid: f64,
}

impl BillingRecord {
    pub fn status(&self) -> PaymentStatus {
        PaymentStatus::derive(self.amount_due, self.amount_paid)
    }
}

/// A billing month in `YYYY-MM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl Period {
    /// Build a period from explicit components. Month must be 1-12.
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) || !(1000..=9999).contains(&year) {
            return Err(CoreError::InvalidPeriod(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// The period a given date falls into.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Human-readable label, e.g. "March 2026".
    pub fn label(&self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidPeriod(s.to_string());
        let (year_str, month_str) = s.split_once('-').ok_or_else(invalid)?;
        if year_str.len() != 4 || month_str.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year_str.parse().map_err(|_| invalid())?;
        let month: u32 = month_str.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Period {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_paid_when_paid_covers_due() {
        assert_eq!(PaymentStatus::derive(50.0, 50.0), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::derive(50.0, 60.0), PaymentStatus::Paid);
    }

    #[test]
    fn status_partial_when_some_paid() {
        assert_eq!(PaymentStatus::derive(50.0, 20.0), PaymentStatus::Partial);
        assert_eq!(PaymentStatus::derive(50.0, 0.01), PaymentStatus::Partial);
    }

    #[test]
    fn status_unpaid_when_nothing_paid() {
        assert_eq!(PaymentStatus::derive(50.0, 0.0), PaymentStatus::Unpaid);
    }

    #[test]
    fn status_derivation_is_idempotent() {
        for (due, paid) in [(50.0, 50.0), (50.0, 20.0), (50.0, 0.0), (0.0, 0.0)] {
            let first = PaymentStatus::derive(due, paid);
            let second = PaymentStatus::derive(due, paid);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn record_status_matches_derivation() {
        let record = BillingRecord {
            member_id: Uuid::new_v4(),
            period: "2026-03".parse().unwrap(),
            amount_due: 50.0,
            amount_paid: 20.0,
        };
        assert_eq!(record.status(), PaymentStatus::Partial);
    }

    #[test]
    fn period_parses_and_displays() {
        let p: Period = "2026-03".parse().unwrap();
        assert_eq!(p.year(), 2026);
        assert_eq!(p.month(), 3);
        assert_eq!(p.to_string(), "2026-03");
    }

    #[test]
    fn period_label_is_month_year() {
        let p: Period = "2026-03".parse().unwrap();
        assert_eq!(p.label(), "March 2026");
        let p: Period = "2025-12".parse().unwrap();
        assert_eq!(p.label(), "December 2025");
    }

    #[test]
    fn period_rejects_malformed_input() {
        for bad in ["2026", "2026-13", "2026-00", "26-03", "2026-3", "abcd-ef", ""] {
            assert!(bad.parse::<Period>().is_err(), "should reject {bad:?}");
        }
    }

    #[test]
    fn period_from_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 15).unwrap();
        assert_eq!(Period::from_date(date).to_string(), "2026-08");
    }

    #[test]
    fn period_serde_round_trips_as_string() {
        let p: Period = "2026-03".parse().unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"2026-03\"");
        let back: Period = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn first_name_is_first_token() {
        let member = Member {
            id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            full_name: "Dana Cohen".to_string(),
            phone: String::new(),
            monthly_fee: 50.0,
        };
        assert_eq!(member.first_name(), "Dana");
    }
}
