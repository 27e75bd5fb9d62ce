//! Consumers of the final ordered record collection.

pub mod google_sheets;
pub mod json_file;

use std::path::PathBuf;

use thiserror::Error;

pub use google_sheets::{persist_to_google_sheet, SheetTarget};
pub use json_file::persist_to_json;

/// Errors raised by sinks. These are fatal for the sink that raised them.
#[derive(Error, Debug)]
pub enum SinkError {
    /// No service account file could be resolved
    #[error(
        "Google Sheets upload requires a service account JSON file. \
         Provide --google-credentials or set {env_var}."
    )]
    MissingCredentials { env_var: &'static str },

    /// Resolved credential path does not exist
    #[error("Credential file not found: {0}")]
    CredentialFileNotFound(PathBuf),

    /// Worksheet gid is not part of the document
    #[error("Worksheet with gid={worksheet_id} not found in spreadsheet {spreadsheet_id}.")]
    WorksheetNotFound {
        spreadsheet_id: String,
        worksheet_id: i64,
    },

    /// Service account token exchange failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Spreadsheet API returned an error status
    #[error("Spreadsheet API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Endpoint could not be built from the configured base URL
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
