//! Reciprocity signal
//!
//! Balance of message counts. The curve is applied to ln(their / mine), so
//! sending twice as many messages as me scores the same as half as many.

use crate::signals::SignalContext;
use crate::types::{Participant, SignalKind, SignalResult};

pub fn extract(ctx: &SignalContext<'_>) -> SignalResult {
    let weight = ctx.weight(SignalKind::Reciprocity);
    let conversation = ctx.conversation;

    let theirs = conversation.count(Participant::Them);
    let mine = conversation.count(Participant::Me);
    // Both are at least one after validation
    let ratio = theirs as f64 / mine.max(1) as f64;
    let score = ctx.config.reciprocity.curve.score(ratio.ln());

    let their_runs: Vec<usize> = conversation
        .runs()
        .into_iter()
        .filter(|run| run.sender == Participant::Them)
        .map(|run| run.len)
        .collect();
    let mean_run = their_runs.iter().sum::<usize>() as f64 / their_runs.len().max(1) as f64;

    SignalResult::new(SignalKind::Reciprocity, score, weight)
        .with_detail("their_messages", theirs)
        .with_detail("my_messages", mine)
        .with_detail("message_ratio", ratio)
        .with_detail("their_run_count", their_runs.len())
        .with_detail("mean_their_run_length", mean_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::fixtures::{me, sample_exchange, them};
    use crate::signals::test_support::with_context;
    use crate::types::{DetailValue, Message};

    fn conversation_with(their_count: i64, my_count: i64) -> Vec<Message> {
        let mut messages = Vec::new();
        for i in 0..my_count {
            messages.push(me("mine", i));
        }
        for i in 0..their_count {
            messages.push(them("theirs", my_count + i));
        }
        messages
    }

    #[test]
    fn test_balanced_scores_full() {
        let messages = sample_exchange();
        let result = with_context(&messages, extract);
        assert_eq!(result.score, 100.0);
        assert_eq!(result.detail["message_ratio"], DetailValue::Value(1.0));
        assert_eq!(result.detail["their_run_count"], DetailValue::Count(2));
    }

    #[test]
    fn test_symmetric_in_ratio() {
        let more = with_context(&conversation_with(6, 3), extract);
        let fewer = with_context(&conversation_with(3, 6), extract);
        assert!((more.score - fewer.score).abs() < 1e-9);
        assert!(more.score < 100.0);
    }

    #[test]
    fn test_lopsided_scores_low() {
        let result = with_context(&conversation_with(1, 10), extract);
        assert!(result.score < 5.0);
    }

    #[test]
    fn test_run_lengths() {
        let messages = vec![me("a", 0), them("b", 1), them("c", 2), them("d", 3), me("e", 4)];
        let result = with_context(&messages, extract);
        assert_eq!(result.detail["their_run_count"], DetailValue::Count(1));
        assert_eq!(result.detail["mean_their_run_length"], DetailValue::Value(3.0));
    }
}
