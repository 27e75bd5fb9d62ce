//! Source adapter implementations.
//!
//! Each submodule provides a [`SourceAdapter`](crate::traits::SourceAdapter)
//! for one payload format:
//! - `json_array` - a single JSON array of deal objects
//! - `json_lines` - one JSON object per line

pub mod json_array;
pub mod json_lines;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::harvest::normalize::is_truthy;
use crate::model::{CandidateRecord, SourceDescriptor};
use crate::traits::SourceAdapter;

pub use json_array::JsonArrayAdapter;
pub use json_lines::JsonLinesAdapter;

/// Payload format of a configured source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    #[default]
    JsonArray,
    JsonLines,
}

impl SourceFormat {
    /// Builds the adapter that understands this format.
    pub fn adapter(self) -> Arc<dyn SourceAdapter> {
        match self {
            SourceFormat::JsonArray => Arc::new(JsonArrayAdapter),
            SourceFormat::JsonLines => Arc::new(JsonLinesAdapter),
        }
    }
}

/// Attaches the source name as `data_source` unless the entry names one.
pub(crate) fn with_source_name(
    mut entry: CandidateRecord,
    source: &SourceDescriptor,
) -> CandidateRecord {
    let named = ["data_source", "fuente_datos"]
        .iter()
        .any(|key| entry.get(*key).is_some_and(is_truthy));
    if !named {
        entry.insert("data_source".to_string(), Value::String(source.name.clone()));
    }
    entry
}
