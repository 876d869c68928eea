//! CSV adapter
//!
//! Header row plus one message per row, as written by iMessage export tools and
//! spreadsheets. Columns are matched by name against the same aliases as the
//! generic JSON layout; extra columns are ignored.

use crate::error::AnalysisError;
use crate::types::ChatRecord;
use serde::Deserialize;

use super::generic::{parse_timestamp_str, UNKNOWN_SENDER};
use super::ChatExportAdapter;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default, alias = "message", alias = "content", alias = "body")]
    text: Option<String>,
    #[serde(default, alias = "date", alias = "time", alias = "sent_at")]
    timestamp: Option<String>,
    #[serde(default, alias = "from", alias = "author", alias = "sender_name")]
    sender: Option<String>,
}

/// CSV export adapter
pub struct CsvAdapter;

impl ChatExportAdapter for CsvAdapter {
    fn parse(&self, content: &str) -> Result<Vec<ChatRecord>, AnalysisError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(content.as_bytes());

        reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(i, row)| {
                // Row 1 is the header
                let line = i + 2;
                let row =
                    row.map_err(|e| AnalysisError::ParseError(format!("CSV row {line}: {e}")))?;
                parse_row(line, row)
            })
            .collect()
    }
}

fn parse_row(line: usize, row: CsvRow) -> Result<ChatRecord, AnalysisError> {
    let raw = row
        .timestamp
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AnalysisError::ParseError(format!("CSV row {line} has no timestamp")))?;
    let timestamp = parse_timestamp_str(raw.trim()).ok_or_else(|| {
        AnalysisError::ParseError(format!("CSV row {line} has an unreadable timestamp: {raw}"))
    })?;
    let sender = row
        .sender
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_SENDER.to_string());

    Ok(ChatRecord {
        text: row.text.unwrap_or_default(),
        timestamp,
        sender,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_canonical_columns() {
        let content = "text,timestamp,sender\n\
                       Hey!,2024-01-15 14:00:00,Alex\n\
                       \"Hi, how are you?\",2024-01-15T14:02:00Z,Sam\n";
        let records = CsvAdapter.parse(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, t0());
        assert_eq!(records[1].text, "Hi, how are you?");
        assert_eq!(records[1].timestamp, t0() + Duration::minutes(2));
        assert_eq!(records[1].sender, "Sam");
    }

    #[test]
    fn test_column_aliases_and_extra_columns() {
        let content = "from,message,date,service\nSam,yo,1705327200,iMessage\n";
        let records = CsvAdapter.parse(content).unwrap();
        assert_eq!(records[0].sender, "Sam");
        assert_eq!(records[0].text, "yo");
        assert_eq!(records[0].timestamp, t0());
    }

    #[test]
    fn test_missing_sender_column() {
        let content = "text,timestamp\nhello,2024-01-15 14:00:00\n";
        let records = CsvAdapter.parse(content).unwrap();
        assert_eq!(records[0].sender, UNKNOWN_SENDER);
    }

    #[test]
    fn test_missing_timestamp_is_an_error() {
        let content = "text,timestamp,sender\nhello,,Sam\n";
        let err = CsvAdapter.parse(content).unwrap_err();
        assert!(matches!(err, AnalysisError::ParseError(ref m) if m.contains("row 2")));
    }

    #[test]
    fn test_unreadable_timestamp_is_an_error() {
        let content = "text,timestamp,sender\nhello,yesterday,Sam\n";
        assert!(matches!(
            CsvAdapter.parse(content),
            Err(AnalysisError::ParseError(_))
        ));
    }

    #[test]
    fn test_header_only_is_empty() {
        let records = CsvAdapter.parse("text,timestamp,sender\n").unwrap();
        assert!(records.is_empty());
    }
}
