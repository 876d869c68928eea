//! Message length signal
//!
//! Compares how much they write against how much I write. Matching or exceeding
//! my investment scores high; terse replies score low.

use crate::signals::SignalContext;
use crate::stats::mean;
use crate::text::char_len;
use crate::types::{Participant, SignalKind, SignalResult};

/// Ratios above this are treated as equal to it
const MAX_LENGTH_RATIO: f64 = 2.0;

pub fn extract(ctx: &SignalContext<'_>) -> SignalResult {
    let weight = ctx.weight(SignalKind::MessageLength);
    let their_mean = mean_length(ctx, Participant::Them);
    let my_mean = mean_length(ctx, Participant::Me);

    let ratio = if my_mean > 0.0 {
        (their_mean / my_mean).clamp(0.0, MAX_LENGTH_RATIO)
    } else {
        1.0
    };

    let score = ctx.config.message_length.curve.score(ratio);
    SignalResult::new(SignalKind::MessageLength, score, weight)
        .with_detail("their_mean_chars", their_mean)
        .with_detail("my_mean_chars", my_mean)
        .with_detail("length_ratio", ratio)
}

fn mean_length(ctx: &SignalContext<'_>, sender: Participant) -> f64 {
    let lengths: Vec<f64> = ctx
        .conversation
        .sent_by(sender)
        .map(|m| char_len(&m.text) as f64)
        .collect();
    mean(&lengths).unwrap_or(0.0)
}
