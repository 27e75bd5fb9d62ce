use serde_json::Value;
use tracing::debug;

use super::with_source_name;
use crate::model::{CandidateRecord, SourceDescriptor};
use crate::traits::{json_kind, ParseError, SourceAdapter};

/// Adapter for endpoints returning a JSON array of deal objects.
pub struct JsonArrayAdapter;

impl SourceAdapter for JsonArrayAdapter {
    fn format_id(&self) -> &str {
        "json_array"
    }

    fn decode(
        &self,
        response_text: &str,
        source: &SourceDescriptor,
    ) -> Result<Vec<CandidateRecord>, ParseError> {
        let payload: Value = serde_json::from_str(response_text)?;
        let entries = match payload {
            Value::Array(entries) => entries,
            other => {
                return Err(ParseError::UnexpectedShape {
                    expected: "array",
                    actual: json_kind(&other),
                })
            }
        };

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                Value::Object(map) => records.push(with_source_name(map, source)),
                other => {
                    debug!(source = %source.name, entry = %other, "Skipping non-object entry");
                }
            }
        }
        Ok(records)
    }
}
