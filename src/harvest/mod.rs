//! Harvest module - dealflow collection and normalization pipeline.
//!
//! This module provides the core of the dealflow harvester:
//! - **Normalize**: fixed output schema via [`normalise_deal`] and [`coerce_tags`]
//! - **Formats**: source adapters for the supported payload formats
//! - **Pipeline**: sequential orchestrator via [`pipeline::HarvestPipeline`]

pub mod formats;
pub mod normalize;
pub mod pipeline;

// Re-export commonly used types
pub use formats::{JsonArrayAdapter, JsonLinesAdapter, SourceFormat};
pub use normalize::{
    coerce_tags, normalise_deal, normalise_deal_at, FIELD_ALIASES, UNKNOWN_SOURCE,
};
pub use pipeline::{
    run_workflow, HarvestPipeline, HarvestResult, HarvestStats, PipelineError, SinkOptions,
};
