//! Validated conversation view
//!
//! Wraps a time-ordered message slice and derives the sub-structures the signal
//! extractors share: reply pairs, same-sender runs and initiation events.

use crate::error::AnalysisError;
use crate::types::{ConversationSummary, Message, Participant};
use chrono::{DateTime, Duration, Utc};

/// A reply from them directly following one of my messages
#[derive(Debug, Clone, Copy)]
pub struct ResponsePair<'a> {
    pub prompt: &'a Message,
    pub reply: &'a Message,
}

impl ResponsePair<'_> {
    /// Reply latency in minutes
    pub fn latency_minutes(&self) -> f64 {
        minutes_between(self.prompt.timestamp, self.reply.timestamp)
    }
}

/// A run of consecutive messages from the same sender
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub sender: Participant,
    /// Number of messages in the run
    pub len: usize,
}

/// Read-only, validated view over a conversation
#[derive(Debug, Clone, Copy)]
pub struct Conversation<'a> {
    messages: &'a [Message],
    my_name: &'a str,
    their_name: &'a str,
}

impl<'a> Conversation<'a> {
    /// Validate a message sequence.
    ///
    /// Fails when there are fewer than two messages, timestamps go backwards, the
    /// identities are empty or equal, or either participant never sends a message.
    pub fn new(
        messages: &'a [Message],
        my_name: &'a str,
        their_name: &'a str,
    ) -> Result<Self, AnalysisError> {
        if my_name.trim().is_empty() || their_name.trim().is_empty() {
            return Err(AnalysisError::InvalidInput(
                "participant identities must not be empty".to_string(),
            ));
        }
        if my_name.trim().eq_ignore_ascii_case(their_name.trim()) {
            return Err(AnalysisError::InvalidInput(format!(
                "self and target identities are the same ({my_name})"
            )));
        }
        if messages.len() < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "at least 2 messages are required, got {}",
                messages.len()
            )));
        }
        if let Some(i) = messages
            .windows(2)
            .position(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(AnalysisError::InvalidInput(format!(
                "messages are not in time order (message {} precedes message {})",
                i + 1,
                i
            )));
        }
        if !messages.iter().any(|m| m.sender == Participant::Me) {
            return Err(AnalysisError::InvalidInput(format!(
                "{my_name} never sends a message"
            )));
        }
        if !messages.iter().any(|m| m.sender == Participant::Them) {
            return Err(AnalysisError::InvalidInput(format!(
                "{their_name} never sends a message"
            )));
        }

        Ok(Self {
            messages,
            my_name,
            their_name,
        })
    }

    pub fn messages(&self) -> &'a [Message] {
        self.messages
    }

    pub fn my_name(&self) -> &'a str {
        self.my_name
    }

    pub fn their_name(&self) -> &'a str {
        self.their_name
    }

    /// Messages sent by one participant, in order
    pub fn sent_by(&self, sender: Participant) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages.iter().filter(move |m| m.sender == sender)
    }

    /// Number of messages sent by one participant
    pub fn count(&self, sender: Participant) -> usize {
        self.sent_by(sender).count()
    }

    pub fn first_timestamp(&self) -> DateTime<Utc> {
        self.messages[0].timestamp
    }

    pub fn last_timestamp(&self) -> DateTime<Utc> {
        self.messages[self.messages.len() - 1].timestamp
    }

    /// Every adjacent (my message, their message) pair
    pub fn response_pairs(&self) -> Vec<ResponsePair<'a>> {
        self.messages
            .windows(2)
            .filter(|pair| pair[0].sender == Participant::Me && pair[1].sender == Participant::Them)
            .map(|pair| ResponsePair {
                prompt: &pair[0],
                reply: &pair[1],
            })
            .collect()
    }

    /// Consecutive same-sender runs
    pub fn runs(&self) -> Vec<Run> {
        let mut runs: Vec<Run> = Vec::new();
        for message in self.messages {
            match runs.last_mut() {
                Some(run) if run.sender == message.sender => run.len += 1,
                _ => runs.push(Run {
                    sender: message.sender,
                    len: 1,
                }),
            }
        }
        runs
    }

    /// Messages that follow a silence longer than `gap`.
    ///
    /// The opening message of the log is not counted: nothing precedes it, so there
    /// is no gap to measure.
    pub fn initiation_events(&self, gap: Duration) -> Vec<&'a Message> {
        self.messages
            .windows(2)
            .filter(|pair| pair[1].timestamp - pair[0].timestamp > gap)
            .map(|pair| &pair[1])
            .collect()
    }

    pub fn summary(&self) -> ConversationSummary {
        let their_message_count = self.count(Participant::Them);
        let my_message_count = self.count(Participant::Me);
        ConversationSummary {
            message_count: self.messages.len(),
            their_message_count,
            my_message_count,
            first_message_at: self.first_timestamp(),
            last_message_at: self.last_timestamp(),
        }
    }
}

/// Elapsed minutes from `from` to `to`
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}
