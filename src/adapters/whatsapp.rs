//! WhatsApp adapter
//!
//! Parses the plain-text "Export chat" format. Both layouts are accepted:
//!
//! ```text
//! [15/01/2024, 14:00:00] Alex: Hey!
//! 15/01/2024, 14:02 - Sam: Hi! How are you?
//! ```
//!
//! Dates are read day-first and fall back to month-first when that is not a
//! valid date. Lines without a header continue the previous message.

use crate::error::AnalysisError;
use crate::types::ChatRecord;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::ChatExportAdapter;

lazy_static! {
    static ref RE_MESSAGE: Regex = Regex::new(
        r"^\[?(\d{1,2})/(\d{1,2})/(\d{2,4}),?\s+(\d{1,2}):(\d{2})(?::(\d{2}))?(?:\s*([AaPp])\.?[Mm]\.?)?\]?\s+(?:-\s+)?([^:]+?):\s?(.*)$"
    )
    .expect("valid WhatsApp message pattern");

    // Header without a sender: encryption notices, group events
    static ref RE_SYSTEM: Regex = Regex::new(
        r"^\[?\d{1,2}/\d{1,2}/\d{2,4},?\s+\d{1,2}:\d{2}"
    )
    .expect("valid WhatsApp system pattern");
}

/// WhatsApp text export adapter
pub struct WhatsAppAdapter;

impl ChatExportAdapter for WhatsAppAdapter {
    fn parse(&self, content: &str) -> Result<Vec<ChatRecord>, AnalysisError> {
        let mut records: Vec<ChatRecord> = Vec::new();
        // Whether continuation lines still belong to the last record
        let mut open = false;

        for raw_line in content.lines() {
            let line = raw_line.trim_start_matches(['\u{feff}', '\u{200e}', '\u{200f}']);

            if let Some(caps) = RE_MESSAGE.captures(line) {
                let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());
                let Some(timestamp) = parse_timestamp(
                    field(1),
                    field(2),
                    field(3),
                    field(4),
                    field(5),
                    field(6),
                    field(7),
                ) else {
                    debug!(line, "skipping line with an invalid date");
                    open = false;
                    continue;
                };
                records.push(ChatRecord {
                    text: field(9).trim().to_string(),
                    timestamp,
                    sender: field(8).trim().to_string(),
                });
                open = true;
            } else if RE_SYSTEM.is_match(line) {
                open = false;
            } else if open {
                if let Some(last) = records.last_mut() {
                    last.text.push('\n');
                    last.text.push_str(line.trim_end());
                }
            }
        }

        if records.is_empty() && !content.trim().is_empty() {
            return Err(AnalysisError::ParseError(
                "no WhatsApp messages found".to_string(),
            ));
        }
        Ok(records)
    }
}

fn parse_timestamp(
    first: &str,
    second: &str,
    year: &str,
    hour: &str,
    minute: &str,
    seconds: &str,
    meridiem: &str,
) -> Option<DateTime<Utc>> {
    let first: u32 = first.parse().ok()?;
    let second: u32 = second.parse().ok()?;
    let mut year: i32 = year.parse().ok()?;
    if year < 100 {
        year += 2000;
    }

    let mut hour: u32 = hour.parse().ok()?;
    match meridiem {
        "p" | "P" if hour < 12 => hour += 12,
        "a" | "A" if hour == 12 => hour = 0,
        _ => {}
    }
    let minute: u32 = minute.parse().ok()?;
    let seconds: u32 = if seconds.is_empty() { 0 } else { seconds.parse().ok()? };
    let time = NaiveTime::from_hms_opt(hour, minute, seconds)?;

    let date = NaiveDate::from_ymd_opt(year, second, first)
        .or_else(|| NaiveDate::from_ymd_opt(year, first, second))?;
    Some(date.and_time(time).and_utc())
}
