//! Conversation initiation signal
//!
//! Who breaks the silence after a long gap. Their share of initiation events is
//! scored favorably well before it reaches half.

use crate::signals::{SignalContext, NEUTRAL_SCORE};
use crate::types::{Participant, SignalKind, SignalResult};

pub fn extract(ctx: &SignalContext<'_>) -> SignalResult {
    let weight = ctx.weight(SignalKind::ConversationInitiation);
    let settings = &ctx.config.initiation;
    let Some(gap) = settings.inactivity_gap() else {
        return SignalResult::insufficient_data(
            SignalKind::ConversationInitiation,
            NEUTRAL_SCORE,
            weight,
        )
        .with_detail("initiation_events", 0usize);
    };

    let events = ctx.conversation.initiation_events(gap);
    if events.is_empty() {
        return SignalResult::insufficient_data(
            SignalKind::ConversationInitiation,
            NEUTRAL_SCORE,
            weight,
        )
        .with_detail("initiation_events", 0usize);
    }

    let theirs = events
        .iter()
        .filter(|m| m.sender == Participant::Them)
        .count();
    let share = theirs as f64 / events.len() as f64;

    SignalResult::new(
        SignalKind::ConversationInitiation,
        settings.share_curve.score(share),
        weight,
    )
    .with_detail("initiation_events", events.len())
    .with_detail("their_initiations", theirs)
    .with_detail("their_share", share)
}
