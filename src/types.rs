//! Core data types
//!
//! This module defines the messages that flow into the scoring engine and the
//! per-signal results and report that flow out of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which side of the conversation sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Participant {
    /// The person running the analysis
    Me,
    /// The participant whose interest is being scored
    Them,
}

/// A normalized chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message body
    pub text: String,
    /// When the message was sent
    pub timestamp: DateTime<Utc>,
    /// Who sent it
    pub sender: Participant,
}

impl Message {
    pub fn new(text: impl Into<String>, timestamp: DateTime<Utc>, sender: Participant) -> Self {
        Self {
            text: text.into(),
            timestamp,
            sender,
        }
    }
}

/// A chat message as it appears in a platform export, before sender identities
/// are resolved to [`Participant`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    /// Message body
    pub text: String,
    /// When the message was sent
    pub timestamp: DateTime<Utc>,
    /// Display name of the sender, verbatim from the export
    pub sender: String,
}

/// The eight behavioral signals, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    ResponseTime,
    MessageLength,
    EmojiUsage,
    QuestionAsking,
    ConversationInitiation,
    Enthusiasm,
    Consistency,
    Reciprocity,
}

impl SignalKind {
    /// Every signal kind, in the order they appear in a [`ScoreReport`]
    pub const ALL: [SignalKind; 8] = [
        SignalKind::ResponseTime,
        SignalKind::MessageLength,
        SignalKind::EmojiUsage,
        SignalKind::QuestionAsking,
        SignalKind::ConversationInitiation,
        SignalKind::Enthusiasm,
        SignalKind::Consistency,
        SignalKind::Reciprocity,
    ];

    /// Machine name (matches the serde representation)
    pub fn name(self) -> &'static str {
        match self {
            SignalKind::ResponseTime => "response_time",
            SignalKind::MessageLength => "message_length",
            SignalKind::EmojiUsage => "emoji_usage",
            SignalKind::QuestionAsking => "question_asking",
            SignalKind::ConversationInitiation => "conversation_initiation",
            SignalKind::Enthusiasm => "enthusiasm",
            SignalKind::Consistency => "consistency",
            SignalKind::Reciprocity => "reciprocity",
        }
    }

    /// Human-readable title
    pub fn title(self) -> &'static str {
        match self {
            SignalKind::ResponseTime => "Response Time",
            SignalKind::MessageLength => "Message Length",
            SignalKind::EmojiUsage => "Emoji Usage",
            SignalKind::QuestionAsking => "Question Asking",
            SignalKind::ConversationInitiation => "Conversation Initiation",
            SignalKind::Enthusiasm => "Enthusiasm",
            SignalKind::Consistency => "Consistency",
            SignalKind::Reciprocity => "Reciprocity",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detail key set on every signal; `true` when the signal fell back to its neutral default
pub const INSUFFICIENT_DATA: &str = "insufficient_data";

/// A supporting statistic attached to a signal result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    Flag(bool),
    Count(u64),
    Value(f64),
}

impl From<bool> for DetailValue {
    fn from(v: bool) -> Self {
        DetailValue::Flag(v)
    }
}

impl From<usize> for DetailValue {
    fn from(v: usize) -> Self {
        DetailValue::Count(v as u64)
    }
}

impl From<u64> for DetailValue {
    fn from(v: u64) -> Self {
        DetailValue::Count(v)
    }
}

impl From<f64> for DetailValue {
    fn from(v: f64) -> Self {
        DetailValue::Value(v)
    }
}

impl DetailValue {
    /// Numeric view; flags read as 0 or 1
    pub fn as_f64(self) -> f64 {
        match self {
            DetailValue::Flag(b) => f64::from(u8::from(b)),
            DetailValue::Count(n) => n as f64,
            DetailValue::Value(v) => v,
        }
    }
}

impl fmt::Display for DetailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailValue::Flag(b) => write!(f, "{b}"),
            DetailValue::Count(n) => write!(f, "{n}"),
            DetailValue::Value(v) => write!(f, "{v:.2}"),
        }
    }
}

/// Result of a single signal extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    /// Which signal this is
    pub kind: SignalKind,
    /// Sub-score (0-100)
    pub score: f64,
    /// Weight of this signal in the composite
    pub weight: f64,
    /// Supporting statistics keyed by metric name
    pub detail: BTreeMap<String, DetailValue>,
}

impl SignalResult {
    /// Create a computed result. The score is clamped to 0-100.
    pub fn new(kind: SignalKind, score: f64, weight: f64) -> Self {
        let mut detail = BTreeMap::new();
        detail.insert(INSUFFICIENT_DATA.to_string(), DetailValue::Flag(false));
        Self {
            kind,
            score: clamp_score(score),
            weight,
            detail,
        }
    }

    /// Create a fallback result for a signal whose statistic could not be computed
    pub fn insufficient_data(kind: SignalKind, neutral_score: f64, weight: f64) -> Self {
        let mut result = Self::new(kind, neutral_score, weight);
        result.detail.insert(INSUFFICIENT_DATA.to_string(), DetailValue::Flag(true));
        result
    }

    /// Attach a supporting statistic
    pub fn with_detail(mut self, key: &str, value: impl Into<DetailValue>) -> Self {
        self.detail.insert(key.to_string(), value.into());
        self
    }

    /// Whether this signal fell back to its neutral default
    pub fn is_insufficient(&self) -> bool {
        matches!(
            self.detail.get(INSUFFICIENT_DATA),
            Some(DetailValue::Flag(true))
        )
    }

    /// Contribution of this signal to the composite score
    pub fn weighted_score(&self) -> f64 {
        self.score * self.weight
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// Interpretive band for the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestLabel {
    Minimal,
    Low,
    Moderate,
    Good,
    Strong,
}

impl InterestLabel {
    /// Map a composite score onto its band. Every band is closed at its lower bound.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            InterestLabel::Strong
        } else if score >= 65.0 {
            InterestLabel::Good
        } else if score >= 50.0 {
            InterestLabel::Moderate
        } else if score >= 35.0 {
            InterestLabel::Low
        } else {
            InterestLabel::Minimal
        }
    }

    /// One-line interpretation for display
    pub fn description(self) -> &'static str {
        match self {
            InterestLabel::Strong => "Strong interest - very positive signs",
            InterestLabel::Good => "Good interest - looking promising",
            InterestLabel::Moderate => "Moderate interest - could go either way",
            InterestLabel::Low => "Low interest - not looking great",
            InterestLabel::Minimal => "Minimal interest - might want to move on",
        }
    }
}

impl fmt::Display for InterestLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterestLabel::Minimal => "Minimal",
            InterestLabel::Low => "Low",
            InterestLabel::Moderate => "Moderate",
            InterestLabel::Good => "Good",
            InterestLabel::Strong => "Strong",
        };
        f.write_str(name)
    }
}

/// Message counts and time span of the analyzed conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Total number of messages
    pub message_count: usize,
    /// Messages sent by the target participant
    pub their_message_count: usize,
    /// Messages sent by me
    pub my_message_count: usize,
    /// Timestamp of the first message
    pub first_message_at: DateTime<Utc>,
    /// Timestamp of the last message
    pub last_message_at: DateTime<Utc>,
}

/// Composite interest score with its per-signal breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Weighted composite score (0-100)
    pub composite: f64,
    /// Interpretive band of the composite
    pub label: InterestLabel,
    /// Per-signal results, in [`SignalKind::ALL`] order
    pub signals: Vec<SignalResult>,
    /// Conversation statistics
    pub summary: ConversationSummary,
}

impl ScoreReport {
    /// Look up the result for one signal
    pub fn signal(&self, kind: SignalKind) -> Option<&SignalResult> {
        self.signals.iter().find(|s| s.kind == kind)
    }

    /// Signals that fell back to their neutral default
    pub fn warnings(&self) -> Vec<SignalKind> {
        self.signals
            .iter()
            .filter(|s| s.is_insufficient())
            .map(|s| s.kind)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_kind_serialization() {
        let kind = SignalKind::ConversationInitiation;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"conversation_initiation\"");

        let parsed: SignalKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, SignalKind::ConversationInitiation);
    }

    #[test]
    fn test_signal_kind_names_match_serde() {
        for kind in SignalKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn test_label_boundaries_are_closed_below() {
        assert_eq!(InterestLabel::from_score(100.0), InterestLabel::Strong);
        assert_eq!(InterestLabel::from_score(80.0), InterestLabel::Strong);
        assert_eq!(InterestLabel::from_score(79.999), InterestLabel::Good);
        assert_eq!(InterestLabel::from_score(65.0), InterestLabel::Good);
        assert_eq!(InterestLabel::from_score(64.999), InterestLabel::Moderate);
        assert_eq!(InterestLabel::from_score(50.0), InterestLabel::Moderate);
        assert_eq!(InterestLabel::from_score(49.999), InterestLabel::Low);
        assert_eq!(InterestLabel::from_score(35.0), InterestLabel::Low);
        assert_eq!(InterestLabel::from_score(34.999), InterestLabel::Minimal);
        assert_eq!(InterestLabel::from_score(0.0), InterestLabel::Minimal);
    }

    #[test]
    fn test_signal_result_clamps_score() {
        assert_eq!(SignalResult::new(SignalKind::Enthusiasm, 130.0, 0.15).score, 100.0);
        assert_eq!(SignalResult::new(SignalKind::Enthusiasm, -4.0, 0.15).score, 0.0);
        assert_eq!(SignalResult::new(SignalKind::Enthusiasm, f64::NAN, 0.15).score, 0.0);
    }

    #[test]
    fn test_insufficient_data_flag() {
        let computed = SignalResult::new(SignalKind::Consistency, 72.0, 0.08);
        assert!(!computed.is_insufficient());
        assert_eq!(
            computed.detail.get(INSUFFICIENT_DATA),
            Some(&DetailValue::Flag(false))
        );

        let fallback = SignalResult::insufficient_data(SignalKind::Consistency, 50.0, 0.08);
        assert!(fallback.is_insufficient());
        assert_eq!(fallback.score, 50.0);
    }

    #[test]
    fn test_detail_values_serialize_untagged() {
        let result = SignalResult::new(SignalKind::ResponseTime, 90.0, 0.18)
            .with_detail("pair_count", 3usize)
            .with_detail("median_minutes", 2.5);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "response_time");
        assert_eq!(json["detail"]["pair_count"], 3);
        assert_eq!(json["detail"]["median_minutes"], 2.5);
        assert_eq!(json["detail"]["insufficient_data"], false);
    }

    #[test]
    fn test_message_deserialization() {
        let json = r#"{
            "text": "Hi! How are you?",
            "timestamp": "2024-01-15T14:02:00Z",
            "sender": "them"
        }"#;

        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.sender, Participant::Them);
        assert_eq!(message.text, "Hi! How are you?");
    }
}
