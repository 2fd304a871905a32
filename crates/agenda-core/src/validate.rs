use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

static DATE_PATTERN: OnceLock<Regex> = OnceLock::new();
static TIME_PATTERN: OnceLock<Regex> = OnceLock::new();

fn date_pattern() -> &'static Regex {
    DATE_PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid pattern"))
}

fn time_pattern() -> &'static Regex {
    TIME_PATTERN.get_or_init(|| Regex::new(r"^\d{2}:\d{2}$").expect("valid pattern"))
}

/// Why a date string was rejected. The two cases produce distinct user
/// messages: a shape mismatch and a well-formed but impossible date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("date must use the YYYY-MM-DD format")]
    Format,
    #[error("date does not exist in the calendar")]
    Impossible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("time must use the HH:MM format")]
    Format,
    #[error("time does not exist on a 24-hour clock")]
    Impossible,
}

/// Checks a `YYYY-MM-DD` string: exact shape first, then whether it denotes
/// a real Gregorian calendar date.
pub fn validate_date(input: &str) -> Result<(), DateError> {
    if !date_pattern().is_match(input) {
        return Err(DateError::Format);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| DateError::Impossible)
}

/// Checks an `HH:MM` string: exact shape first, then whether it denotes a
/// real 24-hour clock time.
pub fn validate_time(input: &str) -> Result<(), TimeError> {
    if !time_pattern().is_match(input) {
        return Err(TimeError::Format);
    }
    NaiveTime::parse_from_str(input, "%H:%M")
        .map(|_| ())
        .map_err(|_| TimeError::Impossible)
}
