//! Facebook Messenger / Instagram adapter
//!
//! Parses the JSON export from "Download your information". Only text
//! messages are kept; photos, stickers and calls have no `content` field.

use crate::error::AnalysisError;
use crate::types::ChatRecord;
use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

use super::ChatExportAdapter;

/// Messenger and Instagram export adapter
pub struct MessengerAdapter;

impl ChatExportAdapter for MessengerAdapter {
    fn parse(&self, content: &str) -> Result<Vec<ChatRecord>, AnalysisError> {
        let export: MessengerExport = serde_json::from_str(content)?;
        let mut records = Vec::with_capacity(export.messages.len());
        let mut skipped = 0usize;

        for message in export.messages {
            let Some(text) = message.content else {
                skipped += 1;
                continue;
            };
            let timestamp = DateTime::from_timestamp_millis(message.timestamp_ms).ok_or_else(|| {
                AnalysisError::ParseError(format!(
                    "timestamp_ms out of range: {}",
                    message.timestamp_ms
                ))
            })?;
            records.push(ChatRecord {
                text,
                timestamp,
                sender: message.sender_name,
            });
        }

        if skipped > 0 {
            debug!(skipped, "skipped non-text messenger entries");
        }
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct MessengerExport {
    #[serde(default)]
    messages: Vec<MessengerMessage>,
}

#[derive(Debug, Deserialize)]
struct MessengerMessage {
    sender_name: String,
    timestamp_ms: i64,
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_export() -> &'static str {
        r#"{
            "participants": [{"name": "Sam"}, {"name": "Alex"}],
            "messages": [
                {"sender_name": "Sam", "timestamp_ms": 1705327320000, "content": "Hi! How are you?"},
                {"sender_name": "Sam", "timestamp_ms": 1705327300000, "photos": [{"uri": "a.jpg"}]},
                {"sender_name": "Alex", "timestamp_ms": 1705327200000, "content": "Hey!"}
            ]
        }"#
    }

    #[test]
    fn test_parse_text_messages() {
        let records = MessengerAdapter.parse(sample_export()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sender, "Sam");
        assert_eq!(records[0].text, "Hi! How are you?");
        assert_eq!(
            records[1].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_messages_key_is_empty() {
        let records = MessengerAdapter.parse(r#"{"participants": []}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        let err = MessengerAdapter.parse("not json").unwrap_err();
        assert!(matches!(err, AnalysisError::JsonError(_)));
    }
}
