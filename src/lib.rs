//! Rapport - on-device engine that scores conversational interest
//!
//! Rapport turns an exported chat log into a 0-100 interest score through a
//! deterministic pipeline: export adaptation → participant normalization →
//! eight independent signal extractors → weighted aggregation.
//!
//! ## Signals
//!
//! Response time, message length, emoji usage, question asking, conversation
//! initiation, enthusiasm, consistency and reciprocity. Each produces a bounded
//! sub-score plus supporting statistics; signals without enough data fall back
//! to a neutral 50 and say so in their detail.

pub mod adapters;
pub mod aggregator;
pub mod config;
pub mod conversation;
pub mod curve;
pub mod encoder;
pub mod error;
pub mod insights;
pub mod pipeline;
pub mod sentiment;
pub mod signals;
pub mod stats;
pub mod text;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use adapters::{detect_platform, normalize, Platform};
pub use config::AnalyzerConfig;
pub use encoder::{ReportEncoder, ReportPayload, SCHEMA_VERSION};
pub use error::AnalysisError;
pub use pipeline::{analyze_conversation, analyze_json, InterestAnalyzer};
pub use sentiment::{LexiconSentiment, SentimentAnalyzer};
pub use types::{
    ChatRecord, InterestLabel, Message, Participant, ScoreReport, SignalKind, SignalResult,
};

/// Rapport version embedded in every report payload
pub const RAPPORT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "rapport";
