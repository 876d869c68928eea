//! Weighted aggregation of signal results into a [`ScoreReport`]

use crate::types::{ConversationSummary, InterestLabel, ScoreReport, SignalResult};
use tracing::info;

/// Weighted sum of sub-scores, clamped to 0-100
pub fn composite_score(signals: &[SignalResult]) -> f64 {
    let total: f64 = signals.iter().map(SignalResult::weighted_score).sum();
    if total.is_nan() {
        return 0.0;
    }
    total.clamp(0.0, 100.0)
}

/// Combine signal results into the final report
pub fn aggregate(signals: Vec<SignalResult>, summary: ConversationSummary) -> ScoreReport {
    let composite = composite_score(&signals);
    let label = InterestLabel::from_score(composite);
    info!(composite, label = %label, "interest score computed");

    ScoreReport {
        composite,
        label,
        signals,
        summary,
    }
}
