//! Interest scoring pipeline
//!
//! Public entry points. A run validates the messages into a [`Conversation`],
//! runs every signal extractor and aggregates the results:
//!
//! records → normalize → Conversation → extract×8 → aggregate → ScoreReport

use crate::adapters::{self, Platform};
use crate::aggregator::aggregate;
use crate::config::AnalyzerConfig;
use crate::conversation::Conversation;
use crate::encoder::ReportEncoder;
use crate::error::AnalysisError;
use crate::sentiment::{LexiconSentiment, SentimentAnalyzer};
use crate::signals::{extract_all, CompiledLexicons, SignalContext};
use crate::types::{ChatRecord, Message, ScoreReport};
use tracing::info_span;

/// Score a conversation with the default configuration (stateless, one-shot).
///
/// # Example
/// ```ignore
/// let report = analyze_conversation(&messages, "Alex", "Sam")?;
/// println!("{:.1} ({})", report.composite, report.label);
/// ```
pub fn analyze_conversation(
    messages: &[Message],
    me: &str,
    them: &str,
) -> Result<ScoreReport, AnalysisError> {
    InterestAnalyzer::new(AnalyzerConfig::default())?.analyze(messages, me, them)
}

/// Score a JSON array of chat records and return the encoded report payload.
///
/// Records use the generic JSON layout (`text`, `timestamp`, `sender` or their
/// aliases); senders other than `me` and `them` are ignored.
pub fn analyze_json(records_json: &str, me: &str, them: &str) -> Result<String, AnalysisError> {
    InterestAnalyzer::new(AnalyzerConfig::default())?.analyze_json(records_json, me, them)
}

/// Reusable analyzer holding a validated configuration, compiled lexicons and a
/// sentiment scorer.
pub struct InterestAnalyzer {
    config: AnalyzerConfig,
    lexicons: CompiledLexicons,
    sentiment: Box<dyn SentimentAnalyzer>,
    encoder: ReportEncoder,
}

impl InterestAnalyzer {
    /// Validate the configuration and compile its lexicons
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let lexicons = CompiledLexicons::from_config(&config)?;
        Ok(Self {
            config,
            lexicons,
            sentiment: Box::new(LexiconSentiment::new()),
            encoder: ReportEncoder::new(),
        })
    }

    /// Replace the sentiment scorer used by the enthusiasm signal
    pub fn with_sentiment(mut self, sentiment: impl SentimentAnalyzer + 'static) -> Self {
        self.sentiment = Box::new(sentiment);
        self
    }

    /// Replace the payload encoder (e.g. to pin the instance ID)
    pub fn with_encoder(mut self, encoder: ReportEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Score a time-ordered message sequence
    pub fn analyze(
        &self,
        messages: &[Message],
        me: &str,
        them: &str,
    ) -> Result<ScoreReport, AnalysisError> {
        let span = info_span!("analyze", messages = messages.len());
        let _guard = span.enter();

        let conversation = Conversation::new(messages, me, them)?;
        let ctx = SignalContext::new(
            &conversation,
            &self.config,
            &self.lexicons,
            self.sentiment.as_ref(),
        )?;

        let signals = extract_all(&ctx);
        Ok(aggregate(signals, conversation.summary()))
    }

    /// Resolve raw records to participants, then score them
    pub fn analyze_records(
        &self,
        records: Vec<ChatRecord>,
        me: &str,
        them: &str,
    ) -> Result<ScoreReport, AnalysisError> {
        let messages = adapters::normalize(records, me, them)?;
        self.analyze(&messages, me, them)
    }

    /// Parse an export in the given format and score it
    pub fn analyze_export(
        &self,
        platform: Platform,
        content: &str,
        me: &str,
        them: &str,
    ) -> Result<ScoreReport, AnalysisError> {
        let records = adapters::parse(platform, content)?;
        self.analyze_records(records, me, them)
    }

    /// Score a generic JSON array of records and return the encoded payload
    pub fn analyze_json(
        &self,
        records_json: &str,
        me: &str,
        them: &str,
    ) -> Result<String, AnalysisError> {
        let report = self.analyze_export(Platform::GenericJson, records_json, me, them)?;
        self.encoder.encode_to_json(report, me, them)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::fixtures::{me, sample_exchange, them};
    use crate::types::{InterestLabel, SignalKind};

    fn sample_records_json() -> &'static str {
        r#"[
            {"sender": "Alex", "timestamp": "2024-01-15T14:00:00Z", "text": "Hey!"},
            {"sender": "Sam", "timestamp": "2024-01-15T14:02:00Z", "text": "Hi! How are you? 😊"},
            {"sender": "Alex", "timestamp": "2024-01-15T14:10:00Z", "text": "Good, you?"},
            {"sender": "Sam", "timestamp": "2024-01-15T14:12:00Z", "text": "Great!! Missing you"}
        ]"#
    }

    #[test]
    fn test_sample_exchange_scores_good_or_strong() {
        let report = analyze_conversation(&sample_exchange(), "Me", "Them").unwrap();
        assert!(matches!(report.label, InterestLabel::Good | InterestLabel::Strong));
        assert_eq!(report.signals.len(), 8);
        assert_eq!(report.summary.message_count, 4);
    }

    #[test]
    fn test_sample_exchange_fallbacks() {
        let report = analyze_conversation(&sample_exchange(), "Me", "Them").unwrap();
        // No long silences and a single day: both fall back to neutral
        assert_eq!(
            report.warnings(),
            vec![SignalKind::ConversationInitiation, SignalKind::Consistency]
        );
    }

    #[test]
    fn test_deterministic_output() {
        let analyzer = InterestAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let messages = sample_exchange();
        let first = serde_json::to_string(&analyzer.analyze(&messages, "Me", "Them").unwrap()).unwrap();
        let second = serde_json::to_string(&analyzer.analyze(&messages, "Me", "Them").unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_message_is_invalid() {
        let err = analyze_conversation(&[me("Hey!", 0)], "Me", "Them").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_self_is_invalid() {
        let messages = vec![them("hello", 0), them("hello??", 10)];
        let err = analyze_conversation(&messages, "Me", "Them").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AnalyzerConfig::default();
        config.weights.response_time = 0.5;
        assert!(matches!(
            InterestAnalyzer::new(config),
            Err(AnalysisError::ConfigError(_))
        ));
    }

    #[test]
    fn test_custom_sentiment() {
        let messages = sample_exchange();
        let gloomy = InterestAnalyzer::new(AnalyzerConfig::default())
            .unwrap()
            .with_sentiment(|_: &str| -1.0);
        let default = analyze_conversation(&messages, "Me", "Them").unwrap();
        let report = gloomy.analyze(&messages, "Me", "Them").unwrap();
        let enthusiasm = |r: &ScoreReport| r.signal(SignalKind::Enthusiasm).unwrap().score;
        assert!(enthusiasm(&report) < enthusiasm(&default));
    }

    #[test]
    fn test_records_match_messages() {
        let analyzer = InterestAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let from_json = analyzer
            .analyze_export(Platform::GenericJson, sample_records_json(), "alex", "SAM")
            .unwrap();
        let direct = analyzer.analyze(&sample_exchange(), "Me", "Them").unwrap();
        assert_eq!(from_json.signals, direct.signals);
        assert_eq!(from_json.composite, direct.composite);
    }

    #[test]
    fn test_analyze_json_payload() {
        let json = analyze_json(sample_records_json(), "Alex", "Sam").unwrap();
        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(payload["producer"]["name"], "rapport");
        assert_eq!(payload["participants"]["them"], "Sam");
        assert_eq!(payload["report"]["summary"]["message_count"], 4);
    }

    #[test]
    fn test_invalid_json() {
        assert!(analyze_json("not valid json", "Alex", "Sam").is_err());
    }
}
