//! Date normalization
//!
//! Turns whatever the model put in a date field into a concrete timestamp.
//! Normalization is total: unparseable input resolves to the current time.

use crate::models::Timestamp;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::debug;

/// Placeholder the extraction prompt uses for the date field.
/// The model sometimes echoes it back instead of a real date.
pub const NOW_PLACEHOLDER: &str = "ngay_tao";

/// Accepted layouts, tried in order. `true` when the layout carries a time.
const FORMATS: &[(&str, bool)] = &[
    ("%Y-%m-%d %H:%M:%S%.f", true),
    ("%Y-%m-%d %H:%M:%S", true),
    ("%Y-%m-%d", false),
    ("%d/%m/%Y %H:%M:%S", true),
    ("%d/%m/%Y", false),
    ("%d-%m-%Y %H:%M:%S", true),
    ("%d-%m-%Y", false),
];

/// Raw date value as received at a boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// Use the current time
    Now,
    Text(String),
    Resolved(Timestamp),
}

impl DateInput {
    /// Map a JSON field onto an input. Anything that is not a string
    /// (missing, null, numbers, objects) resolves to `Now`.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => DateInput::Text(s.clone()),
            _ => DateInput::Now,
        }
    }
}

impl From<&str> for DateInput {
    fn from(s: &str) -> Self {
        DateInput::Text(s.to_string())
    }
}

impl From<Timestamp> for DateInput {
    fn from(ts: Timestamp) -> Self {
        DateInput::Resolved(ts)
    }
}

pub struct DateNormalizer;

impl DateNormalizer {
    pub fn now() -> Timestamp {
        Local::now().naive_local()
    }

    pub fn normalize(input: DateInput) -> Timestamp {
        Self::normalize_at(input, Self::now())
    }

    /// Same as [`normalize`](Self::normalize) with an explicit "now".
    pub fn normalize_at(input: DateInput, now: Timestamp) -> Timestamp {
        match input {
            DateInput::Resolved(ts) => ts,
            DateInput::Now => now,
            DateInput::Text(text) => {
                let text = text.trim();
                if text.is_empty() || text == NOW_PLACEHOLDER {
                    return now;
                }
                Self::parse(text).unwrap_or_else(|| {
                    debug!(input = %text, "Unrecognized date, using current time");
                    now
                })
            }
        }
    }

    /// First matching layout wins; ISO-8601 is the last resort.
    pub fn parse(text: &str) -> Option<Timestamp> {
        for (format, has_time) in FORMATS {
            let parsed = if *has_time {
                NaiveDateTime::parse_from_str(text, format).ok()
            } else {
                NaiveDate::parse_from_str(text, format)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            };
            if parsed.is_some() {
                return parsed;
            }
        }

        parse_iso(text)
    }
}

/// ISO-8601 with optional offset. A trailing `Z` means UTC.
/// Offset timestamps keep their own wall-clock time.
fn parse_iso(text: &str) -> Option<Timestamp> {
    let text = match text.strip_suffix('Z').or_else(|| text.strip_suffix('z')) {
        Some(stripped) => format!("{}+00:00", stripped),
        None => text.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.naive_local());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok())
}
