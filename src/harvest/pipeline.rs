//! Collection orchestrator.
//!
//! This module provides the [`HarvestPipeline`] coordinator that walks the
//! configured sources in order (Fetch → Parse → Normalize) and accumulates a
//! single ordered collection, then hands it to the configured sinks:
//! - Async execution via `tokio`, one source at a time
//! - Per-request timeout on every fetch
//! - Structured logging via `tracing`
//! - Partial-failure policy: a failed source is absent from the output,
//!   never an error

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::SourceConfig;
use crate::executor::{HarvesterExecutor, SourceOutcome};
use crate::fetch::Fetcher;
use crate::model::DealRecord;
use crate::sinks::{persist_to_google_sheet, persist_to_json, SheetTarget, SinkError};

// ============================================================================
// Pipeline Types
// ============================================================================

/// Complete harvest result with records and statistics.
#[derive(Debug)]
pub struct HarvestResult {
    /// Normalized records, sources in configuration order, each source in
    /// adapter yield order
    pub records: Vec<DealRecord>,

    /// Processing statistics
    pub stats: HarvestStats,
}

/// Statistics about a harvest run.
#[derive(Debug, Default, Clone)]
pub struct HarvestStats {
    /// Total time spent on the run (milliseconds)
    pub total_duration_ms: u64,

    /// Number of sources attempted
    pub sources_attempted: usize,

    /// Names of sources skipped because their fetch returned nothing
    pub sources_skipped: Vec<String>,

    /// Number of records collected across all sources
    pub records_collected: usize,
}

/// Where the collected records go once the run finishes.
#[derive(Debug, Clone, Default)]
pub struct SinkOptions {
    /// JSON file destination
    pub output: Option<PathBuf>,

    /// Skip every sink while still fetching and normalizing
    pub dry_run: bool,

    /// Spreadsheet document ID
    pub google_sheet_id: Option<String>,

    /// Worksheet gid inside the document
    pub worksheet_id: Option<i64>,

    /// Service account file for the spreadsheet sink
    pub google_credentials: Option<PathBuf>,
}

impl SinkOptions {
    /// Spreadsheet destination, when both identifiers are present.
    pub fn sheet_target(&self) -> Option<SheetTarget> {
        match (&self.google_sheet_id, self.worksheet_id) {
            (Some(sheet_id), Some(worksheet_id)) => Some(
                SheetTarget::new(sheet_id.clone(), worksheet_id)
                    .with_credentials(self.google_credentials.clone()),
            ),
            _ => None,
        }
    }
}

// ============================================================================
// Pipeline Errors
// ============================================================================

/// Errors that end a workflow run.
///
/// Fetch and parse failures are absorbed before they get here; only sink
/// failures remain.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// A configured sink could not persist the collection
    #[error("Sink '{sink}' failed: {source}")]
    Sink {
        sink: &'static str,
        #[source]
        source: SinkError,
    },
}

// ============================================================================
// Pipeline Executor
// ============================================================================

/// Sequential collection pipeline.
///
/// # Example
///
/// ```ignore
/// use dealflow_harvester::{HarvestPipeline, HttpFetcher, SourceRegistry};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let sources = SourceRegistry::with_defaults().select(&["sample_api"])?;
///     let pipeline = HarvestPipeline::new(Arc::new(HttpFetcher::new()))
///         .with_timeout(Duration::from_secs(10));
///
///     let result = pipeline.collect(&sources).await;
///     println!("Harvested {} deals", result.records.len());
///     Ok(())
/// }
/// ```
pub struct HarvestPipeline<F: ?Sized> {
    /// Transport shared by every source
    fetcher: Arc<F>,

    /// Timeout for each fetch (default: 10 seconds)
    timeout: Duration,
}

impl<F> HarvestPipeline<F>
where
    F: Fetcher + ?Sized,
{
    /// Creates a new pipeline with a 10 second fetch timeout.
    pub fn new(fetcher: Arc<F>) -> Self {
        Self {
            fetcher,
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the timeout for each fetch.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Harvests every source in order and accumulates the normalized records.
    ///
    /// Never fails: a source whose fetch yields nothing is logged and
    /// skipped, and decode failures yield no records for that source. No
    /// de-duplication is applied.
    pub async fn collect(&self, sources: &[SourceConfig]) -> HarvestResult {
        let start = Instant::now();
        let executor = HarvesterExecutor::new(Arc::clone(&self.fetcher), self.timeout);
        let mut stats = HarvestStats::default();
        let mut records = Vec::new();

        for source in sources {
            stats.sources_attempted += 1;
            match executor.execute(source).await {
                SourceOutcome::Harvested(mut batch) => records.append(&mut batch),
                SourceOutcome::Skipped => {
                    stats.sources_skipped.push(source.descriptor.name.clone())
                }
            }
        }

        stats.records_collected = records.len();
        stats.total_duration_ms = start.elapsed().as_millis() as u64;
        info!(
            sources = stats.sources_attempted,
            skipped = stats.sources_skipped.len(),
            records = stats.records_collected,
            duration_ms = stats.total_duration_ms,
            "Collection completed"
        );

        HarvestResult { records, stats }
    }
}

/// Collects every source, then persists the collection to the configured
/// sinks.
///
/// # Errors
///
/// Returns [`PipelineError::Sink`] if a configured sink fails (missing
/// credentials, unknown worksheet, I/O). Source failures never error.
pub async fn run_workflow<F>(
    sources: &[SourceConfig],
    fetcher: Arc<F>,
    timeout: Duration,
    options: &SinkOptions,
) -> Result<Vec<DealRecord>, PipelineError>
where
    F: Fetcher + ?Sized,
{
    let result = HarvestPipeline::new(fetcher)
        .with_timeout(timeout)
        .collect(sources)
        .await;
    let collected = result.records;

    match (&options.output, options.dry_run) {
        (Some(path), false) => persist_to_json(&collected, path).map_err(|source| {
            PipelineError::Sink {
                sink: "json_file",
                source,
            }
        })?,
        (_, true) => info!(
            "Dry run enabled; skipping persistence. {} deals collected.",
            collected.len()
        ),
        (None, false) => {}
    }

    match options.sheet_target() {
        Some(target) if !options.dry_run => persist_to_google_sheet(&collected, &target)
            .await
            .map_err(|source| PipelineError::Sink {
                sink: "google_sheets",
                source,
            })?,
        Some(_) => info!(
            "Dry run enabled; skipping Google Sheets upload. {} deals collected.",
            collected.len()
        ),
        None if options.google_sheet_id.is_some() || options.worksheet_id.is_some() => warn!(
            "Google Sheets upload requested but missing configuration. Provide both \
             --google-sheet-id and --worksheet-id."
        ),
        None => {}
    }

    Ok(collected)
}

// ============================================================================
// Tests
// ============================================================================
