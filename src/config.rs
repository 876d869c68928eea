//! Analyzer configuration
//!
//! Thresholds, lexicons, curves and weights for every signal. All fields have
//! defaults, so a configuration file only needs to name what it overrides.

use crate::curve::ScoreCurve;
use crate::error::AnalysisError;
use crate::types::SignalKind;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tolerance for the weights-sum-to-one check
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Longest accepted inactivity gap (one year)
pub const MAX_INACTIVITY_GAP_MINUTES: u64 = 365 * 24 * 60;

/// Widest accepted consistency window (one year)
pub const MAX_BUCKET_HOURS: u64 = 365 * 24;

/// Root configuration passed to every analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub weights: SignalWeights,
    #[serde(default)]
    pub response_time: ResponseTimeConfig,
    #[serde(default)]
    pub message_length: MessageLengthConfig,
    #[serde(default)]
    pub emoji: EmojiConfig,
    #[serde(default)]
    pub questions: QuestionConfig,
    #[serde(default)]
    pub initiation: InitiationConfig,
    #[serde(default)]
    pub enthusiasm: EnthusiasmConfig,
    #[serde(default)]
    pub consistency: ConsistencyConfig,
    #[serde(default)]
    pub reciprocity: ReciprocityConfig,
}

impl AnalyzerConfig {
    /// Parse a TOML configuration and validate it
    pub fn from_toml_str(s: &str) -> Result<Self, AnalysisError> {
        let config: Self = toml::from_str(s)
            .map_err(|e| AnalysisError::ConfigError(format!("Failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration and validate it
    pub fn from_json_str(s: &str) -> Result<Self, AnalysisError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file. `.json` files are read as JSON, anything else as TOML.
    pub fn from_path(path: &Path) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::ConfigError(format!("Cannot read {}: {e}", path.display()))
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String, AnalysisError> {
        toml::to_string_pretty(self)
            .map_err(|e| AnalysisError::ConfigError(format!("Failed to encode TOML: {e}")))
    }

    /// Check weights, thresholds and curves
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.weights.validate()?;

        let gap = self.initiation.inactivity_gap_minutes;
        if gap == 0 || gap > MAX_INACTIVITY_GAP_MINUTES {
            return Err(AnalysisError::ConfigError(format!(
                "initiation.inactivity_gap_minutes must be between 1 and {MAX_INACTIVITY_GAP_MINUTES} (got {gap})"
            )));
        }
        let bucket = self.consistency.bucket_hours;
        if bucket == 0 || bucket > MAX_BUCKET_HOURS {
            return Err(AnalysisError::ConfigError(format!(
                "consistency.bucket_hours must be between 1 and {MAX_BUCKET_HOURS} (got {bucket})"
            )));
        }
        let emoji_split = self.emoji.rate_weight + self.emoji.positivity_weight;
        if self.emoji.rate_weight < 0.0
            || self.emoji.positivity_weight < 0.0
            || (emoji_split - 1.0).abs() > WEIGHT_SUM_TOLERANCE
        {
            return Err(AnalysisError::ConfigError(format!(
                "emoji.rate_weight and emoji.positivity_weight must be non-negative and sum to 1.0 (got {emoji_split})"
            )));
        }

        let curves = [
            ("response_time.curve", &self.response_time.curve),
            ("message_length.curve", &self.message_length.curve),
            ("emoji.rate_curve", &self.emoji.rate_curve),
            ("questions.rate_curve", &self.questions.rate_curve),
            ("initiation.share_curve", &self.initiation.share_curve),
            ("enthusiasm.marker_curve", &self.enthusiasm.marker_curve),
            ("consistency.variation_curve", &self.consistency.variation_curve),
            ("reciprocity.curve", &self.reciprocity.curve),
        ];
        for (name, curve) in curves {
            curve
                .validate()
                .map_err(|e| AnalysisError::ConfigError(format!("{name}: {e}")))?;
        }

        Ok(())
    }
}

/// Weight of each signal in the composite score. Must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub response_time: f64,
    pub message_length: f64,
    pub emoji_usage: f64,
    pub question_asking: f64,
    pub conversation_initiation: f64,
    pub enthusiasm: f64,
    pub consistency: f64,
    pub reciprocity: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            response_time: 0.18,
            message_length: 0.12,
            emoji_usage: 0.09,
            question_asking: 0.10,
            conversation_initiation: 0.15,
            enthusiasm: 0.15,
            consistency: 0.08,
            reciprocity: 0.13,
        }
    }
}

impl SignalWeights {
    /// Weight for one signal
    pub fn weight(&self, kind: SignalKind) -> f64 {
        match kind {
            SignalKind::ResponseTime => self.response_time,
            SignalKind::MessageLength => self.message_length,
            SignalKind::EmojiUsage => self.emoji_usage,
            SignalKind::QuestionAsking => self.question_asking,
            SignalKind::ConversationInitiation => self.conversation_initiation,
            SignalKind::Enthusiasm => self.enthusiasm,
            SignalKind::Consistency => self.consistency,
            SignalKind::Reciprocity => self.reciprocity,
        }
    }

    /// Sum of all eight weights
    pub fn total(&self) -> f64 {
        SignalKind::ALL.iter().map(|k| self.weight(*k)).sum()
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if let Some(kind) = SignalKind::ALL
            .iter()
            .find(|k| !(self.weight(**k) >= 0.0 && self.weight(**k).is_finite()))
        {
            return Err(AnalysisError::ConfigError(format!(
                "weight for {kind} must be a non-negative number"
            )));
        }
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AnalysisError::ConfigError(format!(
                "signal weights must sum to 1.0 (got {total})"
            )));
        }
        Ok(())
    }
}

/// Response time scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseTimeConfig {
    /// Maps the median reply latency in minutes to a score
    pub curve: ScoreCurve,
}

impl Default for ResponseTimeConfig {
    fn default() -> Self {
        Self {
            curve: ScoreCurve::Piecewise {
                points: vec![
                    (0.0, 100.0),
                    (5.0, 98.0),
                    (60.0, 88.0),
                    (360.0, 50.0),
                    (1440.0, 5.0),
                    (4320.0, 1.0),
                ],
            },
        }
    }
}

/// Message length scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageLengthConfig {
    /// Maps their/my mean length ratio (clipped to 0-2) to a score
    pub curve: ScoreCurve,
}

impl Default for MessageLengthConfig {
    fn default() -> Self {
        Self {
            curve: ScoreCurve::Piecewise {
                points: vec![
                    (0.0, 0.0),
                    (0.25, 20.0),
                    (0.5, 55.0),
                    (0.8, 85.0),
                    (1.0, 95.0),
                    (2.0, 100.0),
                ],
            },
        }
    }
}

/// Emoji usage scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmojiConfig {
    /// Emoji counted as positive
    pub positive: Vec<String>,
    /// Maps emoji per message to the rate component
    pub rate_curve: ScoreCurve,
    /// Share of the rate component in the sub-score
    pub rate_weight: f64,
    /// Share of the positivity component in the sub-score
    pub positivity_weight: f64,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        let positive = [
            "❤️", "💕", "💖", "😊", "😍", "🥰", "😘", "💗", "💓", "💝", "😄", "😁", "🙂", "😉",
            "🥺", "✨", "💫", "⭐", "😂", "🤣", "😆", "☺️", "💘", "💞", "😻", "🤗", "👍", "🎉",
        ];
        Self {
            positive: positive.iter().map(|s| s.to_string()).collect(),
            rate_curve: ScoreCurve::Linear { from: 0.0, to: 0.5 },
            rate_weight: 0.6,
            positivity_weight: 0.4,
        }
    }
}

/// Question asking scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionConfig {
    /// Whole words that mark a question as being about me
    pub second_person_terms: Vec<String>,
    /// Also treat my display name in the message as direct address
    pub address_by_name: bool,
    /// Maps the share of messages that are questions about me to a score
    pub rate_curve: ScoreCurve,
}

impl Default for QuestionConfig {
    fn default() -> Self {
        let terms = [
            "you", "your", "yours", "yourself", "you're", "youre", "you've", "you'll", "you'd",
            "u", "ur", "ya", "y'all",
        ];
        Self {
            second_person_terms: terms.iter().map(|s| s.to_string()).collect(),
            address_by_name: true,
            rate_curve: ScoreCurve::Linear { from: 0.0, to: 0.3 },
        }
    }
}

/// Conversation initiation scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitiationConfig {
    /// Silence after which the next message starts a new conversation
    pub inactivity_gap_minutes: u64,
    /// Maps their share of initiation events to a score
    pub share_curve: ScoreCurve,
}

impl InitiationConfig {
    /// The inactivity gap as a duration, `None` when it does not fit
    pub fn inactivity_gap(&self) -> Option<Duration> {
        i64::try_from(self.inactivity_gap_minutes)
            .ok()
            .and_then(Duration::try_minutes)
    }
}

impl Default for InitiationConfig {
    fn default() -> Self {
        Self {
            inactivity_gap_minutes: 240,
            share_curve: ScoreCurve::Piecewise {
                points: vec![
                    (0.0, 0.0),
                    (0.2, 35.0),
                    (0.5, 70.0),
                    (0.8, 95.0),
                    (1.0, 100.0),
                ],
            },
        }
    }
}

/// Enthusiasm scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnthusiasmConfig {
    /// Whole-word laughter tokens (runs like "hahaha" are recognized separately)
    pub laughter: Vec<String>,
    /// Whole-word superlatives
    pub superlatives: Vec<String>,
    /// Affectionate words or phrases
    pub affectionate: Vec<String>,
    /// Cap on exclamation marks counted per message
    pub max_exclamations_per_message: usize,
    /// Maps markers per message to the marker component
    pub marker_curve: ScoreCurve,
}

impl Default for EnthusiasmConfig {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|s| s.to_string()).collect()
        }
        Self {
            laughter: owned(&["lol", "lmao", "lmfao", "rofl", "omg", "haha", "hehe"]),
            superlatives: owned(&[
                "amazing",
                "awesome",
                "incredible",
                "wonderful",
                "fantastic",
                "perfect",
                "best",
                "great",
                "wow",
                "love",
            ]),
            affectionate: owned(&[
                "miss you",
                "missing you",
                "xoxo",
                "babe",
                "sweetheart",
                "darling",
                "cutie",
                "hugs",
                "can't wait",
            ]),
            max_exclamations_per_message: 3,
            marker_curve: ScoreCurve::Linear { from: 0.0, to: 2.0 },
        }
    }
}

/// Consistency scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsistencyConfig {
    /// Width of each counting window
    pub bucket_hours: u64,
    /// Maps the coefficient of variation of per-window counts to a score
    pub variation_curve: ScoreCurve,
}

impl ConsistencyConfig {
    /// Window width in seconds, `None` when zero or out of range
    pub fn bucket_seconds(&self) -> Option<i64> {
        i64::try_from(self.bucket_hours)
            .ok()
            .filter(|h| *h > 0)
            .and_then(|h| h.checked_mul(3600))
    }
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            bucket_hours: 24,
            variation_curve: ScoreCurve::InverseLinear { from: 0.0, to: 2.0 },
        }
    }
}

/// Reciprocity scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReciprocityConfig {
    /// Maps ln(their count / my count) to a score; centred curves keep r and 1/r equal
    pub curve: ScoreCurve,
}

impl Default for ReciprocityConfig {
    fn default() -> Self {
        Self {
            curve: ScoreCurve::GaussianDecay {
                center: 0.0,
                width: 0.5,
            },
        }
    }
}
