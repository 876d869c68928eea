//! Plain-language remarks on a report
//!
//! A few signals get a one-line reading when their sub-score is clearly high or
//! low. Signals that fell back to the neutral score say nothing.

use crate::types::{ScoreReport, SignalKind};
use serde::Serialize;

/// A remark about one signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub signal: SignalKind,
    pub message: &'static str,
}

struct Rule {
    signal: SignalKind,
    low: Option<(f64, &'static str)>,
    high: Option<(f64, &'static str)>,
}

const RULES: &[Rule] = &[
    Rule {
        signal: SignalKind::ResponseTime,
        low: Some((50.0, "They take a while to respond. Might be busy or not prioritizing")),
        high: Some((80.0, "Quick responses! They're engaged and interested")),
    },
    Rule {
        signal: SignalKind::ConversationInitiation,
        low: Some((40.0, "They rarely start conversations. You're doing most of the work")),
        high: Some((70.0, "They regularly initiate conversations. Great sign!")),
    },
    Rule {
        signal: SignalKind::Enthusiasm,
        low: Some((50.0, "Messages lack enthusiasm. Keep an eye on this")),
        high: Some((75.0, "High enthusiasm in messages! They're excited to talk")),
    },
    Rule {
        signal: SignalKind::Reciprocity,
        low: Some((60.0, "Imbalanced conversation. One person is putting in more effort")),
        high: None,
    },
    Rule {
        signal: SignalKind::QuestionAsking,
        low: Some((40.0, "They don't ask many questions about you. Less personal interest")),
        high: Some((70.0, "Asks lots of questions. Wants to know more about you!")),
    },
];

/// Remarks for the signals whose sub-scores are below or above their thresholds
pub fn insights(report: &ScoreReport) -> Vec<Insight> {
    RULES
        .iter()
        .filter_map(|rule| {
            let result = report.signal(rule.signal)?;
            if result.is_insufficient() {
                return None;
            }
            let message = match (rule.low, rule.high) {
                (Some((threshold, message)), _) if result.score < threshold => message,
                (_, Some((threshold, message))) if result.score > threshold => message,
                _ => return None,
            };
            Some(Insight {
                signal: rule.signal,
                message,
            })
        })
        .collect()
}
