use crate::error::{ProcessingError, Result};
use crate::utils::constants::MISSING_MARKERS;
use chrono::{NaiveDate, NaiveDateTime};

/// Parse an ISO calendar date, accepting a trailing time component
///
/// # Examples
/// ```
/// use weather_etl::utils::parse_date;
///
/// let date = parse_date("2020-01-15").unwrap();
/// assert_eq!(date, parse_date("2020-01-15T06:00:00").unwrap());
/// ```
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }

    // Report the error from the plain date format
    Ok(NaiveDate::parse_from_str(value, "%Y-%m-%d")?)
}

/// Whether a cell holds one of the missing-value markers
pub fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value.trim())
}

/// Parse a numeric measurement cell; missing markers yield `None`
pub fn parse_measurement(value: &str, column: &str) -> Result<Option<f64>> {
    let value = value.trim();
    if is_missing(value) {
        return Ok(None);
    }

    let parsed = value.parse::<f64>().map_err(|_| {
        ProcessingError::InvalidFormat(format!("Invalid {} value: '{}'", column, value))
    })?;

    if parsed.is_nan() {
        Ok(None)
    } else {
        Ok(Some(parsed))
    }
}

/// Render a float for text output: shortest round-trip digits, always with a
/// fractional part, NaN as an empty cell.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return String::new();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}
