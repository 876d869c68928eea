//! Generic JSON adapter
//!
//! A JSON array of message objects, as produced by iMessage exporters and
//! hand-made fixtures. Field names are matched against a few common aliases.

use crate::error::AnalysisError;
use crate::types::ChatRecord;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use super::ChatExportAdapter;

const TEXT_FIELDS: &[&str] = &["text", "message", "content", "body"];
const TIMESTAMP_FIELDS: &[&str] = &["timestamp", "date", "time", "sent_at"];
const SENDER_FIELDS: &[&str] = &["sender", "from", "author", "sender_name"];

/// Sender used when a record names none
pub const UNKNOWN_SENDER: &str = "Unknown";

/// Naive timestamp layouts, read as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Magnitudes from which a numeric timestamp is read as milliseconds,
/// microseconds and nanoseconds; anything smaller is seconds
const MILLIS_THRESHOLD: i64 = 100_000_000_000;
const MICROS_THRESHOLD: i64 = 100_000_000_000_000;
const NANOS_THRESHOLD: i64 = 100_000_000_000_000_000;

/// Generic JSON array adapter
pub struct GenericJsonAdapter;

impl ChatExportAdapter for GenericJsonAdapter {
    fn parse(&self, content: &str) -> Result<Vec<ChatRecord>, AnalysisError> {
        let value: Value = serde_json::from_str(content)?;
        let items = value.as_array().ok_or_else(|| {
            AnalysisError::ParseError("expected a JSON array of messages".to_string())
        })?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_record(i, item))
            .collect()
    }
}

fn parse_record(index: usize, item: &Value) -> Result<ChatRecord, AnalysisError> {
    let object = item.as_object().ok_or_else(|| {
        AnalysisError::ParseError(format!("message {index} is not an object"))
    })?;
    let first = |fields: &[&str]| fields.iter().find_map(|f| object.get(*f));

    let text = first(TEXT_FIELDS)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let sender = first(SENDER_FIELDS)
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_SENDER)
        .to_string();
    let timestamp = first(TIMESTAMP_FIELDS)
        .ok_or_else(|| AnalysisError::ParseError(format!("message {index} has no timestamp")))
        .and_then(|v| {
            parse_timestamp(v).ok_or_else(|| {
                AnalysisError::ParseError(format!("message {index} has an unreadable timestamp: {v}"))
            })
        })?;

    Ok(ChatRecord {
        text,
        timestamp,
        sender,
    })
}

/// Parse an RFC 3339 string, one of the naive layouts, or a UNIX timestamp in
/// seconds, milliseconds, microseconds or nanoseconds
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                from_unix(i)
            } else {
                let f = n.as_f64()?;
                if !f.is_finite() {
                    None
                } else if f.abs() >= MILLIS_THRESHOLD as f64 {
                    from_unix(f.round() as i64)
                } else {
                    DateTime::from_timestamp_millis((f * 1000.0).round() as i64)
                }
            }
        }
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

pub(super) fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(dt.and_utc());
    }
    s.parse::<i64>().ok().and_then(from_unix)
}

fn from_unix(value: i64) -> Option<DateTime<Utc>> {
    let magnitude = value.unsigned_abs();
    let per_second: i64 = if magnitude >= NANOS_THRESHOLD as u64 {
        1_000_000_000
    } else if magnitude >= MICROS_THRESHOLD as u64 {
        1_000_000
    } else if magnitude >= MILLIS_THRESHOLD as u64 {
        1_000
    } else {
        1
    };
    let nanos_per_unit = 1_000_000_000 / per_second;
    let subsec = value.rem_euclid(per_second) * nanos_per_unit;
    DateTime::from_timestamp(value.div_euclid(per_second), u32::try_from(subsec).ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_canonical_fields() {
        let content = r#"[
            {"text": "Hey!", "timestamp": "2024-01-15T14:00:00Z", "sender": "Alex"},
            {"text": "Hi!", "timestamp": "2024-01-15T14:02:00Z", "sender": "Sam"}
        ]"#;
        let records = GenericJsonAdapter.parse(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, t0());
        assert_eq!(records[1].sender, "Sam");
    }

    #[test]
    fn test_field_aliases() {
        let content = r#"[{"message": "yo", "date": "2024-01-15 14:00:00", "from": "Sam"}]"#;
        let records = GenericJsonAdapter.parse(content).unwrap();
        assert_eq!(records[0].text, "yo");
        assert_eq!(records[0].sender, "Sam");
        assert_eq!(records[0].timestamp, t0());
    }

    #[test]
    fn test_missing_sender_and_text() {
        let content = r#"[{"time": 1705327200}]"#;
        let records = GenericJsonAdapter.parse(content).unwrap();
        assert_eq!(records[0].sender, UNKNOWN_SENDER);
        assert_eq!(records[0].text, "");
    }

    #[test]
    fn test_timestamp_formats() {
        assert_eq!(parse_timestamp(&json!(1705327200)), Some(t0()));
        assert_eq!(parse_timestamp(&json!(1705327200000i64)), Some(t0()));
        assert_eq!(parse_timestamp(&json!("1705327200")), Some(t0()));
        assert_eq!(parse_timestamp(&json!("2024-01-15T15:00:00+01:00")), Some(t0()));
        assert_eq!(parse_timestamp(&json!("2024-01-15 14:00:00.000")), Some(t0()));
        assert_eq!(parse_timestamp(&json!("01/15/2024 14:00:00")), Some(t0()));
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_timestamp(&json!(null)), None);
    }

    #[test]
    fn test_sub_second_units() {
        assert_eq!(parse_timestamp(&json!(1705327200000000i64)), Some(t0()));
        assert_eq!(parse_timestamp(&json!(1705327200000000000i64)), Some(t0()));
        assert_eq!(parse_timestamp(&json!("1705327200000000")), Some(t0()));
        assert_eq!(
            parse_timestamp(&json!(1705327200500000i64)),
            Some(t0() + chrono::Duration::milliseconds(500))
        );
    }

    #[test]
    fn test_mixed_units_stay_in_range() {
        let content = r#"[
            {"text": "hi", "timestamp": 1705327200, "sender": "Alex"},
            {"text": "hey", "timestamp": 1705327320000000, "sender": "Sam"}
        ]"#;
        let records = GenericJsonAdapter.parse(content).unwrap();
        assert_eq!(records[1].timestamp, t0() + chrono::Duration::minutes(2));
    }

    #[test]
    fn test_unreadable_timestamp_is_an_error() {
        let content = r#"[{"text": "hi", "timestamp": "soon", "sender": "Sam"}]"#;
        let err = GenericJsonAdapter.parse(content).unwrap_err();
        assert!(matches!(err, AnalysisError::ParseError(_)));
    }

    #[test]
    fn test_not_an_array() {
        let err = GenericJsonAdapter.parse(r#"{"messages": []}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::ParseError(_)));
    }
}
