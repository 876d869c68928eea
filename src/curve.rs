//! Score curves
//!
//! Every signal turns a raw statistic into a 0-100 sub-score through one of these
//! named curve shapes. Curves are plain data so they can be overridden from a
//! configuration file.

use serde::{Deserialize, Serialize};

/// Mapping from a raw statistic to a 0-100 score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreCurve {
    /// 0 at `from`, rising linearly to 100 at `to`, flat outside
    Linear { from: f64, to: f64 },
    /// 100 at `from`, falling linearly to 0 at `to`, flat outside
    InverseLinear { from: f64, to: f64 },
    /// Linear interpolation between `(x, score)` breakpoints sorted by `x`,
    /// flat beyond the first and last breakpoint
    Piecewise { points: Vec<(f64, f64)> },
    /// `100 * exp(-((x - center) / width)^2 / 2)`
    GaussianDecay { center: f64, width: f64 },
}

impl ScoreCurve {
    /// Evaluate the curve. The result is always within 0-100.
    pub fn score(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }
        let raw = match self {
            ScoreCurve::Linear { from, to } => 100.0 * unit_ramp(x, *from, *to),
            ScoreCurve::InverseLinear { from, to } => 100.0 * (1.0 - unit_ramp(x, *from, *to)),
            ScoreCurve::Piecewise { points } => interpolate(points, x),
            ScoreCurve::GaussianDecay { center, width } => {
                if *width <= 0.0 {
                    return if x == *center { 100.0 } else { 0.0 };
                }
                let z = (x - center) / width;
                100.0 * (-0.5 * z * z).exp()
            }
        };
        raw.clamp(0.0, 100.0)
    }

    /// Check the curve parameters, returning a description of the first problem found
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ScoreCurve::Linear { from, to } | ScoreCurve::InverseLinear { from, to } => {
                if !from.is_finite() || !to.is_finite() {
                    return Err("linear curve bounds must be finite".to_string());
                }
                if from == to {
                    return Err(format!("linear curve bounds must differ (both {from})"));
                }
            }
            ScoreCurve::Piecewise { points } => {
                if points.is_empty() {
                    return Err("piecewise curve needs at least one point".to_string());
                }
                if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
                    return Err("piecewise curve points must be finite".to_string());
                }
                if points.windows(2).any(|w| w[1].0 <= w[0].0) {
                    return Err("piecewise curve points must be strictly increasing in x".to_string());
                }
            }
            ScoreCurve::GaussianDecay { center, width } => {
                if !center.is_finite() || !width.is_finite() || *width <= 0.0 {
                    return Err("gaussian decay needs a finite center and a positive width".to_string());
                }
            }
        }
        Ok(())
    }
}

/// Position of `x` between `from` and `to`, clamped to 0-1. Works for descending ranges too.
fn unit_ramp(x: f64, from: f64, to: f64) -> f64 {
    let span = to - from;
    if span == 0.0 {
        return if x >= to { 1.0 } else { 0.0 };
    }
    ((x - from) / span).clamp(0.0, 1.0)
}

fn interpolate(points: &[(f64, f64)], x: f64) -> f64 {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return 0.0,
    };
    if x <= first.0 {
        return first.1;
    }
    if x >= last.0 {
        return last.1;
    }

    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x <= x1 {
            let t = (x - x0) / (x1 - x0);
            return y0 + t * (y1 - y0);
        }
    }
    last.1
}
