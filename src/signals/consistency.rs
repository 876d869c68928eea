//! Consistency signal
//!
//! Splits the conversation span into fixed UTC windows and measures how evenly
//! their messages are spread across them. Steady engagement beats bursts
//! followed by silence.

use crate::signals::{SignalContext, NEUTRAL_SCORE};
use crate::stats::sparse_coefficient_of_variation;
use crate::types::{Participant, SignalKind, SignalResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Their message counts per UTC window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowCounts {
    /// Counts of the windows they wrote in, keyed by window index
    pub active: BTreeMap<i64, u64>,
    /// Windows from the first message of the conversation to the last, empty ones included
    pub window_count: u64,
}

/// Bucket their messages into windows of `bucket_seconds`. Only active windows
/// are stored, so the cost follows the message count, not the time span.
pub fn window_counts(ctx: &SignalContext<'_>, bucket_seconds: i64) -> WindowCounts {
    let window_of = |ts: DateTime<Utc>| ts.timestamp().div_euclid(bucket_seconds);

    let first = window_of(ctx.conversation.first_timestamp());
    let last = window_of(ctx.conversation.last_timestamp());
    let mut active = BTreeMap::new();
    for message in ctx.conversation.sent_by(Participant::Them) {
        *active.entry(window_of(message.timestamp)).or_insert(0u64) += 1;
    }

    WindowCounts {
        active,
        window_count: last.abs_diff(first) + 1,
    }
}

pub fn extract(ctx: &SignalContext<'_>) -> SignalResult {
    let weight = ctx.weight(SignalKind::Consistency);
    let Some(bucket_seconds) = ctx.config.consistency.bucket_seconds() else {
        return SignalResult::insufficient_data(SignalKind::Consistency, NEUTRAL_SCORE, weight);
    };

    let counts = window_counts(ctx, bucket_seconds);
    let active = counts.active.len();
    if active < 2 {
        return SignalResult::insufficient_data(SignalKind::Consistency, NEUTRAL_SCORE, weight)
            .with_detail("window_count", counts.window_count)
            .with_detail("active_windows", active);
    }

    let values: Vec<f64> = counts.active.values().map(|c| *c as f64).collect();
    let Some(cv) = sparse_coefficient_of_variation(&values, counts.window_count) else {
        return SignalResult::insufficient_data(SignalKind::Consistency, NEUTRAL_SCORE, weight);
    };

    SignalResult::new(
        SignalKind::Consistency,
        ctx.config.consistency.variation_curve.score(cv),
        weight,
    )
    .with_detail("window_count", counts.window_count)
    .with_detail("active_windows", active)
    .with_detail("coefficient_of_variation", cv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::fixtures::{me, sample_exchange, them};
    use crate::config::AnalyzerConfig;
    use crate::signals::test_support::{with_config, with_context};
    use crate::types::DetailValue;

    const DAY: i64 = 24 * 60;

    #[test]
    fn test_single_day_falls_back() {
        let messages = sample_exchange();
        let result = with_context(&messages, extract);
        assert!(result.is_insufficient());
        assert_eq!(result.score, 50.0);
        assert_eq!(result.detail["active_windows"], DetailValue::Count(1));
    }

    #[test]
    fn test_steady_daily_messages_score_full() {
        let mut messages = vec![me("hi", 0)];
        for day in 0..5 {
            messages.push(them("morning!", day * DAY + 30));
            messages.push(them("night!", day * DAY + 300));
        }
        let result = with_context(&messages, extract);
        assert_eq!(result.detail["window_count"], DetailValue::Count(5));
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_silent_days_count_against() {
        let mut messages = vec![me("hi", 0), them("hey", 1)];
        // Five quiet days, me still writing
        for day in 1..6 {
            messages.push(me("you there?", day * DAY));
        }
        messages.push(them("sorry, busy week", 6 * DAY));
        let result = with_context(&messages, extract);
        assert_eq!(result.detail["window_count"], DetailValue::Count(7));
        assert_eq!(result.detail["active_windows"], DetailValue::Count(2));
        // counts [1,0,0,0,0,0,1]: mean 2/7, cv = sqrt(5/2)
        let cv = (2.5f64).sqrt();
        assert!((result.score - 100.0 * (1.0 - cv / 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_bursty_scores_below_steady() {
        let mut steady = vec![me("hi", 0)];
        let mut bursty = vec![me("hi", 0)];
        for day in 0..4 {
            steady.push(them("hey", day * DAY + 60));
            steady.push(them("hey", day * DAY + 61));
        }
        for i in 0..7 {
            bursty.push(them("hey", 60 + i));
        }
        bursty.push(them("hey", 3 * DAY + 60));

        let steady = with_context(&steady, extract);
        let bursty = with_context(&bursty, extract);
        assert!(steady.score > bursty.score);
    }

    #[test]
    fn test_distant_timestamps_stay_sparse() {
        // A microsecond timestamp misread as milliseconds lands ~54,000 years out
        let messages = vec![me("hi", 0), them("hey", 1), them("again", 28_000_000_000)];
        let result = with_context(&messages, extract);
        assert_eq!(result.detail["active_windows"], DetailValue::Count(2));
        assert!(matches!(result.detail["window_count"], DetailValue::Count(n) if n > 19_000_000));
        assert!((0.0..=100.0).contains(&result.score));
    }

    #[test]
    fn test_out_of_range_bucket_falls_back() {
        let mut messages = vec![me("hi", 0)];
        for day in 0..3 {
            messages.push(them("hey", day * DAY + 60));
        }
        let mut config = AnalyzerConfig::default();
        config.consistency.bucket_hours = i64::MAX as u64;
        let result = with_config(&messages, &config, extract);
        assert!(result.is_insufficient());
        assert_eq!(result.score, 50.0);
    }
}
