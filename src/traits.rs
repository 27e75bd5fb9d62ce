use crate::model::{CandidateRecord, SourceDescriptor};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to parse content: {0}")]
    InvalidContent(String),
    #[error("Unexpected payload shape: expected {expected}, got {actual}")]
    UnexpectedShape {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Turns the raw response body of one source into candidate records.
pub trait SourceAdapter: Send + Sync {
    /// Returns the format ID this adapter handles (e.g., "json_array").
    fn format_id(&self) -> &str;

    /// Decodes a non-empty body into candidate records.
    ///
    /// Individual entries that are not key-value mappings are skipped by the
    /// implementation; only failures affecting the whole body are returned.
    fn decode(
        &self,
        response_text: &str,
        source: &SourceDescriptor,
    ) -> Result<Vec<CandidateRecord>, ParseError>;

    /// Parses a response body, absorbing every decode failure.
    ///
    /// Blank input yields no records. Failures are logged and also yield no
    /// records, so one bad source never aborts the run.
    fn parse(&self, response_text: &str, source: &SourceDescriptor) -> Vec<CandidateRecord> {
        if response_text.trim().is_empty() {
            return Vec::new();
        }

        match self.decode(response_text, source) {
            Ok(records) => records,
            Err(err @ ParseError::UnexpectedShape { .. }) => {
                warn!(source = %source.name, "Source returned an unusable payload: {}", err);
                Vec::new()
            }
            Err(err) => {
                error!(source = %source.name, "Source did not return valid content: {}", err);
                Vec::new()
            }
        }
    }
}

/// Name of the JSON type held by `value`, for diagnostics.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
