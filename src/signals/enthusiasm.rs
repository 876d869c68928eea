//! Enthusiasm signal
//!
//! Half sentiment polarity of their messages, half density of enthusiasm
//! markers: exclamation marks, laughter, superlatives and affectionate phrases.

use crate::signals::SignalContext;
use crate::text::count_exclamations;
use crate::types::{Participant, SignalKind, SignalResult};

pub fn extract(ctx: &SignalContext<'_>) -> SignalResult {
    let weight = ctx.weight(SignalKind::Enthusiasm);
    let settings = &ctx.config.enthusiasm;
    let lexicons = ctx.lexicons;

    let mut message_count = 0usize;
    let mut polarity_sum = 0.0;
    let mut marker_count = 0usize;
    for message in ctx.conversation.sent_by(Participant::Them) {
        let text = message.text.as_str();
        message_count += 1;
        polarity_sum += ctx.sentiment.polarity(text).clamp(-1.0, 1.0);
        marker_count += count_exclamations(text, settings.max_exclamations_per_message)
            + lexicons.laughter.count(text)
            + lexicons.superlatives.count(text)
            + lexicons.affectionate.count(text);
    }

    // Conversation validation guarantees at least one message from them
    let n = message_count.max(1) as f64;
    let mean_polarity = polarity_sum / n;
    let markers_per_message = marker_count as f64 / n;

    let sentiment_component = (mean_polarity + 1.0) / 2.0 * 100.0;
    let marker_component = settings.marker_curve.score(markers_per_message);
    let score = (sentiment_component + marker_component) / 2.0;

    SignalResult::new(SignalKind::Enthusiasm, score, weight)
        .with_detail("mean_polarity", mean_polarity)
        .with_detail("marker_count", marker_count)
        .with_detail("markers_per_message", markers_per_message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::conversation::fixtures::{me, sample_exchange, them};
    use crate::conversation::Conversation;
    use crate::signals::test_support::{with_config, with_context};
    use crate::signals::CompiledLexicons;
    use crate::types::DetailValue;

    #[test]
    fn test_sample_exchange_is_enthusiastic() {
        let messages = sample_exchange();
        let result = with_context(&messages, extract);
        // 3 exclamations, "great" and "missing you"
        assert_eq!(result.detail["marker_count"], DetailValue::Count(5));
        assert!((result.score - 87.5).abs() < 1e-9);
    }

    #[test]
    fn test_flat_replies_score_half_of_sentiment() {
        let messages = vec![me("how was it?", 0), them("it was at noon", 3)];
        let result = with_context(&messages, extract);
        assert_eq!(result.detail["marker_count"], DetailValue::Count(0));
        // neutral polarity gives 50 on the sentiment half, 0 on the marker half
        assert!((result.score - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_exclamations_are_capped_per_message() {
        let messages = vec![me("guess what", 0), them("!!!!!!!!!!", 1)];
        let result = with_context(&messages, extract);
        assert_eq!(result.detail["marker_count"], DetailValue::Count(3));

        let mut config = AnalyzerConfig::default();
        config.enthusiasm.max_exclamations_per_message = 1;
        let result = with_config(&messages, &config, extract);
        assert_eq!(result.detail["marker_count"], DetailValue::Count(1));
    }

    #[test]
    fn test_laughter_runs_count() {
        let messages = vec![me("joke", 0), them("hahahaha lol", 1)];
        let result = with_context(&messages, extract);
        assert_eq!(result.detail["marker_count"], DetailValue::Count(2));
    }

    #[test]
    fn test_sentiment_is_pluggable() {
        let messages = vec![me("hi", 0), them("whatever", 1)];
        let config = AnalyzerConfig::default();
        let conversation = Conversation::new(&messages, "Me", "Them").unwrap();
        let lexicons = CompiledLexicons::from_config(&config).unwrap();
        let glowing = |_: &str| 1.0;
        let ctx = SignalContext::new(&conversation, &config, &lexicons, &glowing).unwrap();
        let result = extract(&ctx);
        assert_eq!(result.detail["mean_polarity"], DetailValue::Value(1.0));
        assert!((result.score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_polarity_is_clamped() {
        let messages = vec![me("hi", 0), them("meh", 1)];
        let config = AnalyzerConfig::default();
        let conversation = Conversation::new(&messages, "Me", "Them").unwrap();
        let lexicons = CompiledLexicons::from_config(&config).unwrap();
        let broken = |_: &str| -7.0;
        let ctx = SignalContext::new(&conversation, &config, &lexicons, &broken).unwrap();
        let result = extract(&ctx);
        assert_eq!(result.score, 0.0);
    }
}
