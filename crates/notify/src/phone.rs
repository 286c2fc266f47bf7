//! Phone number normalization to international submit form.
//!
//! Providers expect digits-only international numbers without a leading `+`.
//! Numbers are stored as entered by coaches, usually in local mobile form
//! (e.g. "052-686-7838"), so the adapter rewrites them before submission.

use crate::traits::SmsError;

/// Normalize a raw phone number for submission.
///
/// - strips whitespace, parentheses, and dashes
/// - a leading `+` marks the number as already international; the `+` is dropped
/// - a number already starting with the country code passes through
/// - local mobile form `05XXXXXXXX` becomes `<country_code><XXXXXXXXX>`
/// - anything else gets the country code prepended (leading `0` removed)
pub fn normalize_phone(raw: &str, country_code: &str) -> Result<String, SmsError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '(' | ')' | '-'))
        .collect();

    if cleaned.is_empty() {
        return Err(SmsError::EmptyPhone);
    }

    let (international, digits) = match cleaned.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(SmsError::InvalidPhone(raw.to_string()));
    }

    if international || digits.starts_with(country_code) {
        return Ok(digits.to_string());
    }

    // Domestic mobile form: 05X followed by seven digits.
    if digits.len() == 10 && digits.starts_with("05") {
        return Ok(format!("{country_code}{}", &digits[1..]));
    }

    let local = digits.strip_prefix('0').unwrap_or(digits);
    Ok(format!("{country_code}{local}"))
}
