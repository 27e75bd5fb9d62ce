//! Source registry.
//!
//! Built-in sources live in [`SourceRegistry::with_defaults`]; more can be
//! declared in a TOML file:
//!
//! ```toml
//! [[sources]]
//! key = "climate_feed"
//! name = "Climate Startups"
//! url = "https://example.org/climate.jsonl"
//! format = "json_lines"
//! notes = "Public feed, refreshed nightly"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::harvest::formats::SourceFormat;
use crate::model::SourceDescriptor;
use crate::traits::SourceAdapter;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No valid sources specified (available: {available})")]
    NoValidSources { available: String },

    #[error("Failed to read sources file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid sources file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// A selectable source: registry key, descriptor and the adapter for its body.
#[derive(Clone)]
pub struct SourceConfig {
    pub key: String,
    pub descriptor: SourceDescriptor,
    pub adapter: Arc<dyn SourceAdapter>,
}

impl SourceConfig {
    pub fn new(
        key: impl Into<String>,
        descriptor: SourceDescriptor,
        adapter: Arc<dyn SourceAdapter>,
    ) -> Self {
        Self {
            key: key.into(),
            descriptor,
            adapter,
        }
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("key", &self.key)
            .field("descriptor", &self.descriptor)
            .field("format", &self.adapter.format_id())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct SourcesFile {
    #[serde(default)]
    sources: Vec<SourceEntry>,
}

#[derive(Debug, Deserialize)]
struct SourceEntry {
    key: String,
    name: String,
    url: String,
    notes: Option<String>,
    #[serde(default)]
    format: SourceFormat,
}

impl From<SourceEntry> for SourceConfig {
    fn from(entry: SourceEntry) -> Self {
        SourceConfig::new(
            entry.key,
            SourceDescriptor {
                name: entry.name,
                url: entry.url,
                notes: entry.notes,
            },
            entry.format.adapter(),
        )
    }
}

/// Named sources available to a run, in registration order.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<SourceConfig>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in sources.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SourceConfig::new(
            "sample_api",
            SourceDescriptor {
                name: "Sample Startup API".to_string(),
                url: "https://example.com/api/deals.json".to_string(),
                notes: Some(
                    "Replace this entry with the endpoint you want to harvest, or add \
                     sources through a sources file."
                        .to_string(),
                ),
            },
            SourceFormat::JsonArray.adapter(),
        ));
        registry
    }

    /// Adds a source, replacing any existing one with the same key.
    pub fn register(&mut self, source: SourceConfig) {
        match self.sources.iter_mut().find(|s| s.key == source.key) {
            Some(slot) => *slot = source,
            None => self.sources.push(source),
        }
    }

    /// Registers every source declared in a TOML document.
    pub fn extend_from_toml(&mut self, text: &str, path: &Path) -> Result<usize, ConfigError> {
        let file: SourcesFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let count = file.sources.len();
        for entry in file.sources {
            debug!(key = %entry.key, format = ?entry.format, "Registering source");
            self.register(entry.into());
        }
        Ok(count)
    }

    /// Reads and registers a sources file.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.extend_from_toml(&text, path)
    }

    pub fn get(&self, key: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.key == key)
    }

    /// Registered keys in registration order.
    pub fn ordered_keys(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.key.as_str()).collect()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.sources.iter().map(|s| s.key.as_str()).collect();
        keys.sort_unstable();
        keys
    }

    /// Resolves requested names in request order.
    ///
    /// Unknown names are logged and dropped. Fails only when nothing valid
    /// remains.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<SourceConfig>, ConfigError> {
        let available = self.keys().join(", ");
        let mut selected = Vec::new();
        for name in names {
            let name = name.as_ref();
            match self.get(name) {
                Some(source) => selected.push(source.clone()),
                None => error!("Unknown source '{}'. Available sources: {}", name, available),
            }
        }

        if selected.is_empty() {
            error!("No valid sources specified. Exiting without harvesting.");
            return Err(ConfigError::NoValidSources { available });
        }
        Ok(selected)
    }
}
