//! Date and time utility functions
//!
//! Timestamps sent to the record store use the ISO 8601 form with
//! millisecond precision and a `Z` suffix. Dates shown to people use short
//! relative wording ("today", "tomorrow", "next Friday").

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, SecondsFormat, Utc, Weekday};

/// Standard date format used for record store date fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date string in YYYY-MM-DD format to NaiveDate
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
}

/// Format a NaiveDate to YYYY-MM-DD string
pub fn format_ymd(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Format a UTC instant the way the record store compares timestamps,
/// e.g. `2025-06-01T08:30:00.000Z`.
pub fn to_store_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Inclusive `[now, now + days]` window as store timestamps.
pub fn window_from(now: DateTime<Utc>, days: i64) -> (String, String) {
    (to_store_timestamp(now), to_store_timestamp(now + Duration::days(days)))
}

/// Format a due date (plain date or RFC 3339 timestamp) relative to `today`.
///
/// Unparseable input is returned unchanged.
pub fn format_human_due(due: &str, today: NaiveDate) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(due) {
        let local = dt.with_timezone(&Local);
        return format!(
            "{} at {}",
            format_human_date(local.date_naive(), today),
            local.format("%H:%M")
        );
    }

    match parse_date(due) {
        Ok(date) => format_human_date(date, today),
        Err(_) => due.to_string(),
    }
}

/// Human-readable date relative to `today`
pub fn format_human_date(input_date: NaiveDate, today: NaiveDate) -> String {
    let days_diff = (input_date - today).num_days();

    match days_diff {
        -1 => "yesterday".to_string(),
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        diff if diff > 1 && diff <= 7 => format!("next {}", weekday_name(input_date.weekday())),
        diff if (-7..-1).contains(&diff) => format!("last {}", weekday_name(input_date.weekday())),
        diff if diff > 7 && diff <= 30 => format!("in {} days", diff),
        diff if (-30..-7).contains(&diff) => format!("{} days ago", -diff),
        _ => {
            if input_date.year() == today.year() {
                input_date.format("%b %d").to_string()
            } else {
                input_date.format("%b %d, %Y").to_string()
            }
        }
    }
}

/// Get a human-readable weekday name
fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
