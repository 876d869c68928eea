//! Response time signal
//!
//! Median latency of their replies to my messages. The median keeps one slow
//! overnight reply from dominating.

use crate::signals::{SignalContext, NEUTRAL_SCORE};
use crate::stats::{mean, median};
use crate::types::{SignalKind, SignalResult};

pub fn extract(ctx: &SignalContext<'_>) -> SignalResult {
    let weight = ctx.weight(SignalKind::ResponseTime);
    let latencies: Vec<f64> = ctx
        .conversation
        .response_pairs()
        .iter()
        .map(|pair| pair.latency_minutes())
        .collect();

    let (Some(median_minutes), Some(mean_minutes)) = (median(&latencies), mean(&latencies)) else {
        return SignalResult::insufficient_data(SignalKind::ResponseTime, NEUTRAL_SCORE, weight)
            .with_detail("pair_count", 0usize);
    };

    let score = ctx.config.response_time.curve.score(median_minutes);
    SignalResult::new(SignalKind::ResponseTime, score, weight)
        .with_detail("pair_count", latencies.len())
        .with_detail("median_minutes", median_minutes)
        .with_detail("mean_minutes", mean_minutes)
}
