use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct MonitorEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> MonitorEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// One full check: fetch every page, read availability, alert once.
    ///
    /// The renderer is released right after extract whether or not extract succeeded.
    /// Only errors that stop the whole run are returned; per-query and send failures end
    /// up in the summary instead.
    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting availability check...");
        self.monitor.log_stats("Start");

        // Extract
        let extracted = self.pipeline.extract().await;
        if let Err(e) = self.pipeline.release().await {
            tracing::warn!("Failed to release page renderer: {}", e);
        }
        let pages = extracted?;
        tracing::info!("Fetched {} page(s)", pages.len());
        self.monitor.log_stats("Extract");

        // Transform
        let results = self.pipeline.transform(pages).await?;
        self.monitor.log_stats("Transform");

        // Load
        let dispatch = self.pipeline.load(&results).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        let summary = RunSummary {
            checked: results.len(),
            available: results
                .iter()
                .filter(|r| r.availability.is_available())
                .count(),
            unknown: results
                .iter()
                .filter(|r| r.availability.is_unknown())
                .count(),
            dispatch,
        };

        tracing::info!(
            "Checked {} queries: {} available, {} unknown",
            summary.checked,
            summary.available,
            summary.unknown
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AvailabilityResult, DispatchOutcome, PageSnapshot};
    use crate::utils::error::MonitorError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct FailingExtract {
        releases: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Pipeline for FailingExtract {
        async fn extract(&self) -> Result<Vec<PageSnapshot>> {
            Err(MonitorError::FetchError {
                url: "https://tickets.sar.com.sa/select-trip".to_string(),
                message: "planned failure".to_string(),
            })
        }

        async fn transform(&self, _pages: Vec<PageSnapshot>) -> Result<Vec<AvailabilityResult>> {
            Ok(vec![])
        }

        async fn load(&self, _results: &[AvailabilityResult]) -> Result<DispatchOutcome> {
            Ok(DispatchOutcome::NothingToReport)
        }

        async fn release(&self) -> Result<()> {
            self.releases.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_release_happens_even_when_extract_fails() {
        let releases = Arc::new(AtomicUsize::new(0));
        let engine = MonitorEngine::new(FailingExtract {
            releases: releases.clone(),
        });

        let result = engine.run().await;

        assert!(result.is_err());
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_run_summary() {
        struct Empty;

        #[async_trait]
        impl Pipeline for Empty {
            async fn extract(&self) -> Result<Vec<PageSnapshot>> {
                Ok(vec![])
            }

            async fn transform(&self, _pages: Vec<PageSnapshot>) -> Result<Vec<AvailabilityResult>> {
                Ok(vec![])
            }

            async fn load(&self, _results: &[AvailabilityResult]) -> Result<DispatchOutcome> {
                Ok(DispatchOutcome::NothingToReport)
            }
        }

        let summary = MonitorEngine::new_with_monitoring(Empty, false).run().await.unwrap();

        assert_eq!(summary.checked, 0);
        assert_eq!(summary.available, 0);
        assert_eq!(summary.dispatch, DispatchOutcome::NothingToReport);
    }
}
