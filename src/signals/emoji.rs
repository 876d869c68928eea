//! Emoji usage signal
//!
//! Rewards both how often they use emoji (saturating) and how positive those
//! emoji are.

use crate::signals::SignalContext;
use crate::text::{extract_emoji, normalize_emoji};
use crate::types::{Participant, SignalKind, SignalResult};

pub fn extract(ctx: &SignalContext<'_>) -> SignalResult {
    let weight = ctx.weight(SignalKind::EmojiUsage);
    let settings = &ctx.config.emoji;

    let mut message_count = 0usize;
    let mut emoji_count = 0usize;
    let mut positive_count = 0usize;
    for message in ctx.conversation.sent_by(Participant::Them) {
        message_count += 1;
        for emoji in extract_emoji(&message.text) {
            emoji_count += 1;
            if ctx.lexicons.positive_emoji.contains(&normalize_emoji(&emoji)) {
                positive_count += 1;
            }
        }
    }

    let per_message = if message_count > 0 {
        emoji_count as f64 / message_count as f64
    } else {
        0.0
    };
    let positive_fraction = if emoji_count > 0 {
        positive_count as f64 / emoji_count as f64
    } else {
        0.0
    };

    let rate_component = settings.rate_curve.score(per_message);
    let positivity_component = positive_fraction * 100.0;
    let score =
        settings.rate_weight * rate_component + settings.positivity_weight * positivity_component;

    SignalResult::new(SignalKind::EmojiUsage, score, weight)
        .with_detail("emoji_count", emoji_count)
        .with_detail("positive_emoji_count", positive_count)
        .with_detail("emoji_per_message", per_message)
        .with_detail("positive_fraction", positive_fraction)
}
