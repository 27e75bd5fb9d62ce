use crate::config::SourceConfig;
use crate::fetch::Fetcher;
use crate::harvest::normalize::normalise_deal;
use crate::model::DealRecord;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Result of harvesting a single source.
#[derive(Debug)]
pub enum SourceOutcome {
    /// The source answered; records are in adapter yield order (possibly empty).
    Harvested(Vec<DealRecord>),
    /// The fetch produced no body, so the source was skipped.
    Skipped,
}

/// Fetches, parses and normalizes one source at a time.
pub struct HarvesterExecutor<F: ?Sized> {
    fetcher: Arc<F>,
    timeout: Duration,
}

impl<F> HarvesterExecutor<F>
where
    F: Fetcher + ?Sized,
{
    pub fn new(fetcher: Arc<F>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    #[instrument(skip(self, source), fields(source = %source.key))]
    pub async fn execute(&self, source: &SourceConfig) -> SourceOutcome {
        let descriptor = &source.descriptor;
        info!("Harvesting {} ({})", descriptor.name, descriptor.url);

        let response_text = self.fetcher.fetch(&descriptor.url, self.timeout).await;
        if response_text.is_empty() {
            warn!("No response received from {}", descriptor.name);
            return SourceOutcome::Skipped;
        }

        let records: Vec<DealRecord> = source
            .adapter
            .parse(&response_text, descriptor)
            .iter()
            .map(normalise_deal)
            .collect();

        info!(
            records = records.len(),
            format = source.adapter.format_id(),
            "Finished harvest for {}",
            descriptor.name
        );
        SourceOutcome::Harvested(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::formats::SourceFormat;
    use crate::model::SourceDescriptor;
    use async_trait::async_trait;

    struct StaticFetcher(&'static str);

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _url: &str, _timeout: Duration) -> String {
            self.0.to_string()
        }
    }

    fn source() -> SourceConfig {
        SourceConfig::new(
            "static",
            SourceDescriptor {
                name: "Static".to_string(),
                url: "https://example.com".to_string(),
                notes: None,
            },
            SourceFormat::JsonArray.adapter(),
        )
    }

    #[tokio::test]
    async fn test_execute_normalizes_records() {
        let executor = HarvesterExecutor::new(
            Arc::new(StaticFetcher(r#"[{"name": " A "}, {"nombre": "B"}]"#)),
            Duration::from_secs(5),
        );

        match executor.execute(&source()).await {
            SourceOutcome::Harvested(records) => {
                let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
                assert_eq!(names, vec!["A", "B"]);
                assert!(records.iter().all(|r| r.data_source == "Static"));
            }
            SourceOutcome::Skipped => panic!("source should not be skipped"),
        }
    }

    #[tokio::test]
    async fn test_empty_body_skips_source() {
        let executor =
            HarvesterExecutor::new(Arc::new(StaticFetcher("")), Duration::from_secs(5));
        assert!(matches!(
            executor.execute(&source()).await,
            SourceOutcome::Skipped
        ));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_harvested_empty() {
        let executor =
            HarvesterExecutor::new(Arc::new(StaticFetcher("<html>")), Duration::from_secs(5));
        match executor.execute(&source()).await {
            SourceOutcome::Harvested(records) => assert!(records.is_empty()),
            SourceOutcome::Skipped => panic!("decode failures are not skips"),
        }
    }
}
