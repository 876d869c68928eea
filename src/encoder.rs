//! Report encoder
//!
//! Wraps a [`ScoreReport`] in a self-describing payload: schema version, producer
//! metadata and the identities the report was computed for.

use crate::error::AnalysisError;
use crate::types::ScoreReport;
use crate::{PRODUCER_NAME, RAPPORT_VERSION};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current report payload schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Identities the report was computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportParticipants {
    pub me: String,
    pub them: String,
}

/// Complete report payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub schema_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub participants: ReportParticipants,
    pub report: ScoreReport,
}

/// Report payload encoder
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Wrap a report in a payload
    pub fn encode(&self, report: ScoreReport, me: &str, them: &str) -> ReportPayload {
        ReportPayload {
            schema_version: SCHEMA_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: RAPPORT_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            participants: ReportParticipants {
                me: me.to_string(),
                them: them.to_string(),
            },
            report,
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(
        &self,
        report: ScoreReport,
        me: &str,
        them: &str,
    ) -> Result<String, AnalysisError> {
        let payload = self.encode(report, me, them);
        serde_json::to_string_pretty(&payload).map_err(AnalysisError::JsonError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::fixtures::sample_exchange;
    use crate::pipeline::analyze_conversation;

    fn sample_report() -> ScoreReport {
        analyze_conversation(&sample_exchange(), "Me", "Them").unwrap()
    }

    #[test]
    fn test_encode_payload() {
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());
        let payload = encoder.encode(sample_report(), "Me", "Them");

        assert_eq!(payload.schema_version, SCHEMA_VERSION);
        assert_eq!(payload.producer.name, "rapport");
        assert_eq!(payload.producer.instance_id, "test-instance");
        assert_eq!(payload.participants.them, "Them");
        assert!(chrono::DateTime::parse_from_rfc3339(&payload.computed_at_utc).is_ok());
    }

    #[test]
    fn test_encode_to_json() {
        let encoder = ReportEncoder::new();
        let json = encoder.encode_to_json(sample_report(), "Me", "Them").unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["schema_version"], "1.0.0");
        assert!(value["report"]["composite"].is_number());
        assert_eq!(value["report"]["signals"].as_array().unwrap().len(), 8);
        assert_eq!(value["report"]["signals"][0]["kind"], "response_time");
    }

    #[test]
    fn test_instance_ids_are_unique() {
        assert_ne!(ReportEncoder::new().instance_id(), ReportEncoder::new().instance_id());
    }
}
