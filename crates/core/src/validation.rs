//! Input validation rules
//!
//! Pure predicates and parsers for identifiers, turnaround triples,
//! timestamps, numeric results and free-text fields. The only side effect is
//! a `warn!` when a timestamp cannot be parsed by [`is_future_timestamp`].

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::{DATE_FORMAT, TIMESTAMP_FORMAT};

/// Column delimiter of both tables; free-text fields may not contain it.
pub const FIELD_DELIMITER: char = ',';

/// Check that `s` is exactly seven ASCII digits.
pub fn is_seven_digit_id(s: &str) -> bool {
    s.len() == 7 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Check turnaround bounds, naming the first component that is out of range.
pub fn check_turnaround(days: u32, hours: u32, minutes: u32) -> Result<()> {
    if days > 31 {
        return Err(Error::validation(
            "turnaround",
            "days must be between 0 and 31",
        ));
    }
    if hours > 23 {
        return Err(Error::validation(
            "turnaround",
            "hours must be between 0 and 23",
        ));
    }
    if minutes > 59 {
        return Err(Error::validation(
            "turnaround",
            "minutes must be between 0 and 59",
        ));
    }
    Ok(())
}

/// Boolean form of [`check_turnaround`].
pub fn is_turnaround_valid(days: u32, hours: u32, minutes: u32) -> bool {
    match check_turnaround(days, hours, minutes) {
        Ok(()) => true,
        Err(e) => {
            debug!("{}", e);
            false
        }
    }
}

/// Parse a `DD-hh-mm` turnaround (two digits per component).
///
/// Only the shape is checked here; bounds are checked by [`check_turnaround`].
pub fn parse_turnaround(s: &str) -> Result<(u32, u32, u32)> {
    let text = s.trim();
    let parts: Vec<&str> = text.split('-').collect();
    let well_formed = parts.len() == 3
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.bytes().all(|b| b.is_ascii_digit()));
    if !well_formed {
        return Err(Error::parse(text, "turnaround must have the form DD-hh-mm"));
    }

    // Two ASCII digits always fit in u32.
    let number = |p: &str| p.parse::<u32>().map_err(|e| Error::parse(p, e.to_string()));
    Ok((number(parts[0])?, number(parts[1])?, number(parts[2])?))
}

/// Parse a `YYYY-MM-DD hh:mm` timestamp.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
        .map_err(|_| Error::parse(s, "timestamp must have the form YYYY-MM-DD hh:mm"))
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| Error::parse(s, "date must have the form YYYY-MM-DD"))
}

/// Current local wall-clock time, the reference for "in the future".
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Check whether a timestamp or date lies strictly after the current time.
///
/// Fails closed: unparsable input is reported and treated as not-future.
pub fn is_future_timestamp(s: &str) -> bool {
    is_future_timestamp_at(s, now())
}

/// [`is_future_timestamp`] against an explicit clock.
pub fn is_future_timestamp_at(s: &str, now: NaiveDateTime) -> bool {
    if let Ok(ts) = parse_timestamp(s) {
        return ts > now;
    }
    if let Ok(date) = parse_date(s) {
        return date.and_hms_opt(0, 0, 0).map_or(false, |ts| ts > now);
    }
    warn!(
        input = %s,
        "Invalid date/time format, expected YYYY-MM-DD hh:mm or YYYY-MM-DD"
    );
    false
}

/// Parse a timestamp field and require that it is not in the future.
pub fn check_past_timestamp(
    field: &'static str,
    s: &str,
    now: NaiveDateTime,
) -> Result<NaiveDateTime> {
    let ts = parse_timestamp(s).map_err(|_| {
        Error::validation(field, format!("'{}' must have the form YYYY-MM-DD hh:mm", s))
    })?;
    if ts > now {
        return Err(Error::validation(
            field,
            format!("'{}' cannot be in the future", s),
        ));
    }
    Ok(ts)
}

/// Parse a date field and require that it is not in the future.
pub fn check_past_date(field: &'static str, s: &str, now: NaiveDateTime) -> Result<NaiveDate> {
    let date = parse_date(s).map_err(|_| {
        Error::validation(field, format!("'{}' must have the form YYYY-MM-DD", s))
    })?;
    if date > now.date() {
        return Err(Error::validation(
            field,
            format!("'{}' cannot be in the future", s),
        ));
    }
    Ok(date)
}

/// Parse a measured value; must be a finite number.
pub fn parse_result_value(s: &str) -> Result<f64> {
    let text = s.trim();
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::validation(
            "result",
            format!("'{}' must be a numeric value", text),
        )),
    }
}

/// Trim a free-text field and reject characters that would break the line format.
///
/// Empty values are allowed; see [`check_required_text`].
pub fn check_delimiter_free(field: &'static str, s: &str) -> Result<String> {
    let text = s.trim();
    if text.contains(FIELD_DELIMITER) || text.contains('\n') || text.contains('\r') {
        return Err(Error::validation(
            field,
            format!("'{}' may not contain commas or line breaks", text),
        ));
    }
    Ok(text.to_string())
}

/// Like [`check_delimiter_free`], but the value must also be non-empty.
pub fn check_required_text(field: &'static str, s: &str) -> Result<String> {
    let text = check_delimiter_free(field, s)?;
    if text.is_empty() {
        return Err(Error::validation(field, "cannot be empty"));
    }
    Ok(text)
}

/// Canonical form of a test name: trimmed and uppercased.
pub fn normalize_test_name(s: &str) -> String {
    s.trim().to_uppercase()
}

/// Validate a test name for the catalog and return its canonical form.
pub fn check_test_name(s: &str) -> Result<String> {
    let name = normalize_test_name(s);
    if name.is_empty() {
        return Err(Error::validation("test name", "cannot be empty"));
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation(
            "test name",
            format!("'{}' must contain letters, not only digits", name),
        ));
    }
    if name.contains(FIELD_DELIMITER) || name.contains(':') || name.contains('\n') {
        return Err(Error::validation(
            "test name",
            format!("'{}' may not contain ',' or ':'", name),
        ));
    }
    Ok(name)
}
