//! Display formatting for dates and money

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Shown for absent values
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown for dates that do not parse
pub const INVALID_DATE: &str = "Invalid Date";

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parse the date forms the front-end produces.
///
/// Timestamps keep the calendar date as written; no timezone shifting.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(stamp.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y/%m/%d").ok()
}

/// Format as `DD/MM/YYYY`, or the `N/A` / `Invalid Date` sentinels
pub fn display_date(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => NOT_AVAILABLE.to_string(),
        Some(raw) => match parse_date(raw) {
            Some(date) => date.format("%d/%m/%Y").to_string(),
            None => INVALID_DATE.to_string(),
        },
    }
}

/// Currency symbol followed by the amount to two decimals
pub fn money(amount: f64, symbol: &str) -> String {
    // Avoid printing "-0.00" for a zero product such as 0 h x rate
    let amount = if amount == 0.0 { 0.0 } else { amount };
    format!("{}{:.2}", symbol, amount)
}

pub fn hours(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.2}", value)
}

/// Text value, or `N/A` when absent or blank
pub fn or_not_available(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}
