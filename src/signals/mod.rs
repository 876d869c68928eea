//! Signal extractors
//!
//! Eight independent analyzers, each turning a validated conversation into a
//! bounded 0-100 sub-score with supporting statistics. Extractors share no
//! mutable state and may run in any order.
//!
//! Pipeline: Conversation → Extract×8 → Aggregator → ScoreReport

pub mod consistency;
pub mod emoji;
pub mod enthusiasm;
pub mod initiation;
pub mod message_length;
pub mod questions;
pub mod reciprocity;
pub mod response_time;

use crate::config::AnalyzerConfig;
use crate::conversation::Conversation;
use crate::error::AnalysisError;
use crate::sentiment::SentimentAnalyzer;
use crate::text::{normalize_emoji, LexiconMatcher};
use crate::types::{SignalKind, SignalResult};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Score used when a signal's statistic cannot be computed
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Laughter runs recognized regardless of the configured word list
const LAUGHTER_PATTERNS: &[&str] = &[r"a?(?:ha){2,}h?", r"(?:he){2,}h?", r"lo{2,}l", r"lma+o+"];

/// Lexicons from the configuration, compiled once per analyzer
#[derive(Debug, Clone)]
pub struct CompiledLexicons {
    pub positive_emoji: HashSet<String>,
    pub second_person: LexiconMatcher,
    pub laughter: LexiconMatcher,
    pub superlatives: LexiconMatcher,
    pub affectionate: LexiconMatcher,
}

impl CompiledLexicons {
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, AnalysisError> {
        let lexicon_error =
            |name: &str, e: regex::Error| AnalysisError::ConfigError(format!("{name}: {e}"));

        Ok(Self {
            positive_emoji: config
                .emoji
                .positive
                .iter()
                .map(|e| normalize_emoji(e))
                .collect(),
            second_person: LexiconMatcher::new(&config.questions.second_person_terms)
                .map_err(|e| lexicon_error("questions.second_person_terms", e))?,
            laughter: LexiconMatcher::with_patterns(&config.enthusiasm.laughter, LAUGHTER_PATTERNS)
                .map_err(|e| lexicon_error("enthusiasm.laughter", e))?,
            superlatives: LexiconMatcher::new(&config.enthusiasm.superlatives)
                .map_err(|e| lexicon_error("enthusiasm.superlatives", e))?,
            affectionate: LexiconMatcher::new(&config.enthusiasm.affectionate)
                .map_err(|e| lexicon_error("enthusiasm.affectionate", e))?,
        })
    }
}

/// Everything an extractor reads. Nothing mutable.
pub struct SignalContext<'a> {
    pub conversation: &'a Conversation<'a>,
    pub config: &'a AnalyzerConfig,
    pub lexicons: &'a CompiledLexicons,
    pub sentiment: &'a dyn SentimentAnalyzer,
    /// Matches my display name, when questions may address me by name
    pub my_name: Option<LexiconMatcher>,
}

impl<'a> SignalContext<'a> {
    /// Assemble the context for one analysis, compiling the per-conversation matchers
    pub fn new(
        conversation: &'a Conversation<'a>,
        config: &'a AnalyzerConfig,
        lexicons: &'a CompiledLexicons,
        sentiment: &'a dyn SentimentAnalyzer,
    ) -> Result<Self, AnalysisError> {
        let my_name = if config.questions.address_by_name {
            let name = [conversation.my_name().to_string()];
            let matcher = LexiconMatcher::new(&name).map_err(|e| {
                AnalysisError::ConfigError(format!("questions.address_by_name: {e}"))
            })?;
            Some(matcher)
        } else {
            None
        };

        Ok(Self {
            conversation,
            config,
            lexicons,
            sentiment,
            my_name,
        })
    }

    /// Configured weight of a signal
    pub fn weight(&self, kind: SignalKind) -> f64 {
        self.config.weights.weight(kind)
    }
}

/// Run one extractor
pub fn extract(kind: SignalKind, ctx: &SignalContext<'_>) -> SignalResult {
    match kind {
        SignalKind::ResponseTime => response_time::extract(ctx),
        SignalKind::MessageLength => message_length::extract(ctx),
        SignalKind::EmojiUsage => emoji::extract(ctx),
        SignalKind::QuestionAsking => questions::extract(ctx),
        SignalKind::ConversationInitiation => initiation::extract(ctx),
        SignalKind::Enthusiasm => enthusiasm::extract(ctx),
        SignalKind::Consistency => consistency::extract(ctx),
        SignalKind::Reciprocity => reciprocity::extract(ctx),
    }
}

/// Run every extractor, returning results in [`SignalKind::ALL`] order
pub fn extract_all(ctx: &SignalContext<'_>) -> Vec<SignalResult> {
    SignalKind::ALL
        .iter()
        .map(|kind| {
            let result = extract(*kind, ctx);
            if result.is_insufficient() {
                warn!(signal = %kind, score = result.score, "insufficient data, using neutral score");
            } else {
                debug!(signal = %kind, score = result.score, "signal extracted");
            }
            result
        })
        .collect()
}
