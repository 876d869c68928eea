//! iMessage adapter
//!
//! iMessage has no official export; third-party tools write either a JSON array
//! or a CSV table. The layout is chosen from the content.

use crate::error::AnalysisError;
use crate::types::ChatRecord;

use super::csv::CsvAdapter;
use super::generic::GenericJsonAdapter;
use super::ChatExportAdapter;

/// iMessage export adapter (JSON array or CSV)
pub struct IMessageAdapter;

impl ChatExportAdapter for IMessageAdapter {
    fn parse(&self, content: &str) -> Result<Vec<ChatRecord>, AnalysisError> {
        if content.trim_start().starts_with('[') {
            GenericJsonAdapter.parse(content)
        } else {
            CsvAdapter.parse(content)
        }
    }
}
