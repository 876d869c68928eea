//! Question asking signal
//!
//! Share of their messages that ask me something: a question mark plus a
//! second-person reference or my name.

use crate::signals::SignalContext;
use crate::text::has_question_mark;
use crate::types::{Participant, SignalKind, SignalResult};

pub fn extract(ctx: &SignalContext<'_>) -> SignalResult {
    let weight = ctx.weight(SignalKind::QuestionAsking);
    let settings = &ctx.config.questions;

    let addresses_me = |text: &str| {
        ctx.lexicons.second_person.is_match(text)
            || ctx.my_name.as_ref().is_some_and(|m| m.is_match(text))
    };

    let mut message_count = 0usize;
    let mut question_count = 0usize;
    for message in ctx.conversation.sent_by(Participant::Them) {
        message_count += 1;
        if has_question_mark(&message.text) && addresses_me(&message.text) {
            question_count += 1;
        }
    }

    let rate = if message_count > 0 {
        question_count as f64 / message_count as f64
    } else {
        0.0
    };

    SignalResult::new(SignalKind::QuestionAsking, settings.rate_curve.score(rate), weight)
        .with_detail("question_count", question_count)
        .with_detail("question_rate", rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::conversation::fixtures::{me, sample_exchange, them};
    use crate::signals::test_support::{with_config, with_context};
    use crate::types::DetailValue;

    #[test]
    fn test_question_about_me_counts() {
        let messages = sample_exchange();
        let result = with_context(&messages, extract);
        assert_eq!(result.detail["question_count"], DetailValue::Count(1));
        // 50% of messages, above the 30% ceiling
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_question_without_reference_does_not_count() {
        let messages = vec![me("hi", 0), them("what time is it?", 1), them("is it raining?", 2)];
        let result = with_context(&messages, extract);
        assert_eq!(result.detail["question_count"], DetailValue::Count(0));
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_reference_without_question_does_not_count() {
        let messages = vec![me("hi", 0), them("you are funny", 1)];
        let result = with_context(&messages, extract);
        assert_eq!(result.detail["question_count"], DetailValue::Count(0));
    }

    #[test]
    fn test_direct_address_by_name() {
        let messages = vec![me("hi", 0), them("me, free tonight?", 1)];
        let result = with_context(&messages, extract);
        assert_eq!(result.detail["question_count"], DetailValue::Count(1));

        let mut config = AnalyzerConfig::default();
        config.questions.address_by_name = false;
        let result = with_config(&messages, &config, extract);
        assert_eq!(result.detail["question_count"], DetailValue::Count(0));
    }

    #[test]
    fn test_rate_scales_linearly_below_ceiling() {
        let mut messages = vec![me("hi", 0), them("how was your day?", 1)];
        for i in 0..9 {
            messages.push(them("ok", 2 + i));
        }
        let result = with_context(&messages, extract);
        // 1 in 10 messages = 0.1, a third of the 0.3 ceiling
        assert!((result.score - 100.0 / 3.0).abs() < 1e-6);
    }
}
