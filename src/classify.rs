//! Field value classification.
//!
//! Every field value is classified once into a [`FieldKind`] and the rest
//! of the mapper dispatches on that tag instead of probing shapes again.
//! Date detection lives here too since it is the other shape question
//! consumers ask about a value.

use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;
use serde_json::Value;

/// Kind of a field value as far as mapping is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Media asset with a file descriptor
    Asset,
    /// Nested entry (`sys` + `fields`)
    LinkedEntry,
    /// Array of any values
    Array,
    /// Anything else: strings, numbers, plain objects
    Scalar,
}

/// Classify a field value.
///
/// An asset is an object whose `fields.file` exposes string `url`,
/// `fileName` and `contentType`. A linked entry is any other object that
/// has both `sys` and `fields` objects.
pub fn classify(value: &Value) -> FieldKind {
    match value {
        Value::Array(_) => FieldKind::Array,
        Value::Object(map) => {
            let fields = map.get("fields").and_then(Value::as_object);
            let file = fields
                .and_then(|f| f.get("file"))
                .and_then(Value::as_object);

            if let Some(file) = file {
                let has = |key: &str| file.get(key).map_or(false, Value::is_string);
                if has("url") && has("fileName") && has("contentType") {
                    return FieldKind::Asset;
                }
            }

            if fields.is_some() && map.get("sys").map_or(false, Value::is_object) {
                FieldKind::LinkedEntry
            } else {
                FieldKind::Scalar
            }
        }
        _ => FieldKind::Scalar,
    }
}

fn date_time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(\d{4}-\d{2}-\d{2})T(\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?)(Z|[+-]\d{2}:?\d{2})?$",
        )
        .expect("date pattern is valid")
    })
}

/// Whether a value is a date-and-time string.
///
/// Requires a date, a `T` separator and a time of day, optionally followed
/// by `Z` or a numeric offset. Bare dates such as `2021-07-08` are plain
/// strings, as are free-text dates and non-string values.
pub fn is_date_field(value: &Value) -> bool {
    value
        .as_str()
        .map_or(false, |s| date_time_pattern().is_match(s))
}

/// A parsed date field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    /// Date-time carrying an offset (or `Z`)
    Zoned(DateTime<FixedOffset>),
    /// Date-time without any offset
    Local(NaiveDateTime),
}

impl DateValue {
    /// RFC 3339 rendering; offset-less values are rendered without a zone
    pub fn to_rfc3339(&self) -> String {
        match self {
            DateValue::Zoned(dt) => dt.to_rfc3339(),
            DateValue::Local(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        }
    }
}

/// Parse a date field into a timestamp.
///
/// Returns `None` for anything [`is_date_field`] rejects, and also for
/// pattern matches that are not real calendar values (`2021-13-40T99:00`).
pub fn parse_date_field(value: &Value) -> Option<DateValue> {
    let caps = date_time_pattern().captures(value.as_str()?)?;

    let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
    let time_str = &caps[2];
    let time = if time_str.len() == 5 {
        NaiveTime::parse_from_str(time_str, "%H:%M").ok()?
    } else {
        NaiveTime::parse_from_str(time_str, "%H:%M:%S%.f").ok()?
    };
    let naive = date.and_time(time);

    match caps.get(3).map(|m| m.as_str()) {
        None => Some(DateValue::Local(naive)),
        Some(zone) => {
            let offset = parse_offset(zone)?;
            offset
                .from_local_datetime(&naive)
                .single()
                .map(DateValue::Zoned)
        }
    }
}

fn parse_offset(zone: &str) -> Option<FixedOffset> {
    if zone == "Z" {
        return FixedOffset::east_opt(0);
    }

    let sign = if zone.starts_with('-') { -1 } else { 1 };
    let digits: String = zone[1..].chars().filter(|c| *c != ':').collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4)?.parse().ok()?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
