//! Timestamp extraction for pidstat section headers
//!
//! pidstat prints only the time of day on each header (`09:55:46 PM`, or
//! `21:55:46` with a 24-hour locale). The full timestamp is built by combining
//! that token with a reference date. Consecutive decreasing times are not
//! treated as a day rollover.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::{Error, Result};

/// Leading `HH:MM:SS` token with an optional two-letter meridiem
static TIME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})[:.](\d{2})[:.](\d{2})(?:\s+([A-Za-z]{2}))?(?:\s|$)")
        .expect("time token pattern is valid")
});

/// Date printed on the banner line (`03/02/2025`, `03/02/25` or `2025-03-02`)
static BANNER_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4}-\d{2}-\d{2}|\d{2}/\d{2}/\d{4}|\d{2}/\d{2}/\d{2})\b")
        .expect("banner date pattern is valid")
});

/// Why a header line did not yield a timestamp
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("no HH:MM:SS time token at start of line")]
    NoTimeToken,

    #[error("invalid {component} '{value}' in time token")]
    InvalidComponent {
        component: &'static str,
        value: String,
    },
}

/// Extract the snapshot timestamp from a header line
pub fn extract_timestamp(
    header_line: &str,
    reference_date: NaiveDate,
) -> std::result::Result<NaiveDateTime, TimestampError> {
    let caps = TIME_TOKEN
        .captures(header_line.trim())
        .ok_or(TimestampError::NoTimeToken)?;

    let hour = component(&caps, 1, "hour")?;
    let minute = component(&caps, 2, "minute")?;
    let second = component(&caps, 3, "second")?;

    if minute >= 60 {
        return Err(invalid("minute", minute));
    }
    if second >= 60 {
        return Err(invalid("second", second));
    }

    let hour = match caps.get(4).map(|m| m.as_str().to_ascii_uppercase()) {
        Some(meridiem) if meridiem == "AM" || meridiem == "PM" => {
            if hour > 12 {
                return Err(invalid("hour", hour));
            }
            match (meridiem.as_str(), hour) {
                ("AM", 12) => 0,
                ("PM", h) if h < 12 => h + 12,
                (_, h) => h,
            }
        }
        Some(other) => {
            return Err(TimestampError::InvalidComponent {
                component: "meridiem",
                value: other,
            });
        }
        None if hour < 24 => hour,
        None => return Err(invalid("hour", hour)),
    };

    let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
        TimestampError::InvalidComponent {
            component: "time",
            value: format!("{:02}:{:02}:{:02}", hour, minute, second),
        }
    })?;

    Ok(reference_date.and_time(time))
}

/// Remove a leading time token (and meridiem) from a data row
///
/// Rows printed by pidstat repeat the sampling time before the uid column.
pub fn strip_time_prefix(line: &str) -> &str {
    let trimmed = line.trim_start();
    match TIME_TOKEN.find(trimmed) {
        Some(m) => trimmed[m.end()..].trim_start(),
        None => trimmed,
    }
}

/// Extract the date printed on the banner line, if any
pub fn banner_date(line: &str) -> Option<NaiveDate> {
    let token = BANNER_DATE.captures(line)?.get(1)?.as_str();

    let format = if token.contains('-') {
        "%Y-%m-%d"
    } else if token.len() == 10 {
        "%m/%d/%Y"
    } else {
        "%m/%d/%y"
    };

    NaiveDate::parse_from_str(token, format).ok()
}

/// Parse a caller-supplied reference date (`MM/DD/YYYY` or `YYYY-MM-DD`)
pub fn parse_reference_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    let format = if value.contains('/') {
        "%m/%d/%Y"
    } else {
        "%Y-%m-%d"
    };

    NaiveDate::parse_from_str(value, format).map_err(|e| {
        Error::date_parsing(
            format!(
                "Invalid date format. Expected MM/DD/YYYY or YYYY-MM-DD, got: {}",
                value
            ),
            Some(e),
        )
    })
}

fn component(
    caps: &Captures<'_>,
    index: usize,
    name: &'static str,
) -> std::result::Result<u32, TimestampError> {
    let raw = caps.get(index).map(|m| m.as_str()).unwrap_or_default();
    raw.parse::<u32>()
        .map_err(|_| TimestampError::InvalidComponent {
            component: name,
            value: raw.to_string(),
        })
}

fn invalid(component: &'static str, value: u32) -> TimestampError {
    TimestampError::InvalidComponent {
        component,
        value: value.to_string(),
    }
}
