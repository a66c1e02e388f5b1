//! Input validation helpers shared by route handlers.

use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex");
    static ref PHONE_REGEX: Regex =
        Regex::new(r"^\+?[1-9]\d{0,15}$").expect("Invalid phone regex");
    static ref PHONE_SEPARATORS: Regex =
        Regex::new(r"[\s\-()]").expect("Invalid phone separator regex");
    static ref UUID_REGEX: Regex = Regex::new(
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$"
    )
    .expect("Invalid UUID regex");
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Accepts an optional leading `+` followed by up to 16 digits, ignoring
/// spaces, dashes and parentheses
pub fn validate_phone(phone: &str) -> bool {
    let stripped = PHONE_SEPARATORS.replace_all(phone, "");
    PHONE_REGEX.is_match(&stripped)
}

/// Trim whitespace and drop angle brackets
pub fn sanitize_string(input: &str) -> String {
    input.trim().chars().filter(|c| *c != '<' && *c != '>').collect()
}

pub fn validate_uuid(uuid: &str) -> bool {
    UUID_REGEX.is_match(uuid)
}

/// Parse `value` as a number and check it against optional bounds
pub fn validate_number(value: &str, min: Option<f64>, max: Option<f64>) -> bool {
    let Ok(number) = value.trim().parse::<f64>() else {
        return false;
    };
    if number.is_nan() {
        return false;
    }
    if min.is_some_and(|min| number < min) {
        return false;
    }
    if max.is_some_and(|max| number > max) {
        return false;
    }
    true
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates
pub fn validate_date(date: &str) -> bool {
    DateTime::parse_from_rfc3339(date).is_ok()
        || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}
