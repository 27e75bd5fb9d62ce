use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::info;

use super::SinkError;
use crate::model::DealRecord;

/// Writes the records as a pretty-printed UTF-8 JSON array.
///
/// Parent directories are created as needed. Non-ASCII text is written as-is.
pub fn persist_to_json(records: &[DealRecord], output_path: &Path) -> Result<(), SinkError> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut body = serde_json::to_string_pretty(records)?;
    body.push('\n');
    let mut file = fs::File::create(output_path)?;
    file.write_all(body.as_bytes())?;

    let shown = output_path
        .canonicalize()
        .unwrap_or_else(|_| output_path.to_path_buf());
    info!("Persisted {} deals to {}", records.len(), shown.display());
    Ok(())
}
