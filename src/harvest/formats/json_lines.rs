use serde_json::Value;
use tracing::warn;

use super::with_source_name;
use crate::model::{CandidateRecord, SourceDescriptor};
use crate::traits::{json_kind, ParseError, SourceAdapter};

/// Adapter for newline-delimited JSON feeds (one deal object per line).
///
/// A bad line only loses that line.
pub struct JsonLinesAdapter;

impl SourceAdapter for JsonLinesAdapter {
    fn format_id(&self) -> &str {
        "json_lines"
    }

    fn decode(
        &self,
        response_text: &str,
        source: &SourceDescriptor,
    ) -> Result<Vec<CandidateRecord>, ParseError> {
        let mut records = Vec::new();
        for (index, line) in response_text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(Value::Object(map)) => records.push(with_source_name(map, source)),
                Ok(other) => warn!(
                    source = %source.name,
                    line = index + 1,
                    kind = json_kind(&other),
                    "Skipping non-object line"
                ),
                Err(err) => warn!(
                    source = %source.name,
                    line = index + 1,
                    "Skipping undecodable line: {}",
                    err
                ),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> SourceDescriptor {
        SourceDescriptor {
            name: "Lines".to_string(),
            url: "https://example.com/deals.jsonl".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_parses_each_line() {
        let body = "{\"name\": \"A\"}\n\n{\"name\": \"B\"}\n";
        let records = JsonLinesAdapter.parse(body, &descriptor());
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["name"], "B");
        assert_eq!(records[1]["data_source"], "Lines");
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        let body = "{\"name\": \"A\"}\nnot json\n[1, 2]\n{\"name\": \"C\"}";
        let records = JsonLinesAdapter.parse(body, &descriptor());
        let names: Vec<&Value> = records.iter().map(|r| &r["name"]).collect();
        assert_eq!(names, vec!["A", "C"]);
    }
}
