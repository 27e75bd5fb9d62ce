//! Transport boundary.
//!
//! A fetch either yields the decoded body or an empty string. Transport
//! failures, including bodies that do not decode in their declared charset,
//! are logged here and never reach the orchestrator as errors.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, error};

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the response body of `url`, or `""` on any failure.
    async fn fetch(&self, url: &str, timeout: Duration) -> String;
}

/// Reasons a fetch produced no body.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("not a local file path: {0}")]
    InvalidFilePath(Url),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unsupported charset '{0}'")]
    UnsupportedCharset(String),

    #[error("body is not valid {charset}")]
    Undecodable { charset: &'static str },
}

/// [`Fetcher`] backed by `reqwest`, with `file://` support for local feeds.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn get_text(&self, url: Url, timeout: Duration) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;

        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_param)
            .map(str::to_string);
        let body = response.bytes().await?;
        decode_body(&body, charset.as_deref())
    }

    async fn read_file(url: Url) -> Result<String, FetchError> {
        let path = url
            .to_file_path()
            .map_err(|_| FetchError::InvalidFilePath(url.clone()))?;
        let body = tokio::fs::read(&path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })?;
        decode_body(&body, None)
    }
}

/// Value of the `charset` parameter of a Content-Type header, if any.
fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// Strictly decodes `body`; UTF-8 when no charset is declared.
fn decode_body(body: &[u8], charset: Option<&str>) -> Result<String, FetchError> {
    let encoding = match charset {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| FetchError::UnsupportedCharset(label.to_string()))?,
        None => UTF_8,
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or(FetchError::Undecodable {
            charset: encoding.name(),
        })
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> String {
        debug!(url, timeout_secs = timeout.as_secs(), "Fetching URL");

        let result = match Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "file" => Self::read_file(parsed).await,
            Ok(parsed) => self.get_text(parsed, timeout).await,
            Err(e) => Err(FetchError::InvalidUrl(e.to_string())),
        };

        match result {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to fetch {}: {}", url, e);
                String::new()
            }
        }
    }
}
