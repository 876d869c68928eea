//! Chat export adapters
//!
//! Each adapter parses one platform's export into [`ChatRecord`]s; [`normalize`]
//! then resolves sender names to [`Participant`]s and orders the messages for
//! analysis.

mod csv;
mod generic;
mod imessage;
mod messenger;
mod whatsapp;

pub use self::csv::CsvAdapter;
pub use generic::{parse_timestamp, GenericJsonAdapter, UNKNOWN_SENDER};
pub use imessage::IMessageAdapter;
pub use messenger::MessengerAdapter;
pub use whatsapp::WhatsAppAdapter;

use crate::error::AnalysisError;
use crate::types::{ChatRecord, Message, Participant};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Trait for chat export adapters
pub trait ChatExportAdapter {
    /// Parse a raw export into records in file order
    fn parse(&self, content: &str) -> Result<Vec<ChatRecord>, AnalysisError>;
}

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Facebook Messenger or Instagram JSON export
    Messenger,
    /// WhatsApp text export
    WhatsApp,
    /// iMessage export from a third-party tool, JSON array or CSV
    #[serde(rename = "imessage")]
    IMessage,
    /// JSON array of `{text, timestamp, sender}` objects
    GenericJson,
    /// CSV with `text`, `timestamp` and `sender` columns
    Csv,
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Messenger => "messenger",
            Platform::WhatsApp => "whatsapp",
            Platform::IMessage => "imessage",
            Platform::GenericJson => "generic_json",
            Platform::Csv => "csv",
        }
    }

    fn adapter(&self) -> &'static dyn ChatExportAdapter {
        match self {
            Platform::Messenger => &MessengerAdapter,
            Platform::WhatsApp => &WhatsAppAdapter,
            Platform::IMessage => &IMessageAdapter,
            Platform::GenericJson => &GenericJsonAdapter,
            Platform::Csv => &CsvAdapter,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "messenger" | "facebook" | "fb" | "instagram" | "ig" => Ok(Platform::Messenger),
            "whatsapp" | "wa" => Ok(Platform::WhatsApp),
            "imessage" | "apple" => Ok(Platform::IMessage),
            "json" | "generic" | "generic_json" => Ok(Platform::GenericJson),
            "csv" => Ok(Platform::Csv),
            other => Err(AnalysisError::UnsupportedPlatform(other.to_string())),
        }
    }
}

/// Guess the export format from the file name and content.
///
/// `.txt` files are WhatsApp and `.csv` files are CSV; a JSON object with a
/// `messages` key is Messenger; any other JSON is the generic array layout.
pub fn detect_platform(file_name: &str, content: &str) -> Platform {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".txt") {
        return Platform::WhatsApp;
    }
    if lower.ends_with(".csv") {
        return Platform::Csv;
    }

    let trimmed = content.trim_start();
    if trimmed.starts_with('{') {
        let is_messenger = serde_json::from_str::<serde_json::Value>(content)
            .map(|v| v.get("messages").is_some_and(|m| m.is_array()))
            .unwrap_or(false);
        if is_messenger {
            return Platform::Messenger;
        }
    }
    if !lower.ends_with(".json") && !trimmed.starts_with('[') && !trimmed.starts_with('{') {
        return Platform::WhatsApp;
    }
    Platform::GenericJson
}

/// Parse an export with the adapter for `platform`
pub fn parse(platform: Platform, content: &str) -> Result<Vec<ChatRecord>, AnalysisError> {
    let records = platform.adapter().parse(content)?;
    debug!(platform = %platform, records = records.len(), "parsed chat export");
    Ok(records)
}

/// Resolve sender names to participants and sort by time.
///
/// Names match after trimming, ignoring case. Records from anyone else (group
/// members, system senders) are dropped. The sort is stable, so messages with
/// equal timestamps keep their export order.
pub fn normalize(
    records: Vec<ChatRecord>,
    me: &str,
    them: &str,
) -> Result<Vec<Message>, AnalysisError> {
    let me_key = identity_key(me);
    let them_key = identity_key(them);
    if me_key.is_empty() || them_key.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "participant identities must not be empty".to_string(),
        ));
    }
    if me_key == them_key {
        return Err(AnalysisError::InvalidInput(format!(
            "self and target identities are the same ({me})"
        )));
    }

    let total = records.len();
    let mut messages: Vec<Message> = records
        .into_iter()
        .filter_map(|record| {
            let key = identity_key(&record.sender);
            let sender = if key == me_key {
                Participant::Me
            } else if key == them_key {
                Participant::Them
            } else {
                return None;
            };
            Some(Message::new(record.text, record.timestamp, sender))
        })
        .collect();

    let dropped = total - messages.len();
    if dropped > 0 {
        debug!(dropped, "dropped records from other senders");
    }

    messages.sort_by_key(|m| m.timestamp);
    Ok(messages)
}

fn identity_key(name: &str) -> String {
    name.trim().to_lowercase()
}
