use crate::core::detect::AvailabilityDetector;
use crate::core::query::plan_queries;
use crate::core::{
    Availability, AvailabilityResult, ConfigProvider, Delivery, DispatchOutcome, FetchOutcome,
    Notification, Notifier, PageRenderer, PageSnapshot, Pipeline, RouteQuery,
};
use crate::utils::error::Result;
use std::time::Duration;

/// Checks every planned (route, date) query one after another and alerts once.
pub struct MonitorPipeline<R: PageRenderer, N: Notifier> {
    renderer: R,
    notifier: N,
    detector: AvailabilityDetector,
    queries: Vec<RouteQuery>,
    between_queries: Duration,
}

impl<R: PageRenderer, N: Notifier> MonitorPipeline<R, N> {
    pub fn new<C: ConfigProvider>(renderer: R, notifier: N, config: &C) -> Result<Self> {
        Ok(Self {
            renderer,
            notifier,
            detector: AvailabilityDetector::new(config.detection())?,
            queries: plan_queries(config.routes(), config.site())?,
            between_queries: config.pacing().between_queries(),
        })
    }

}

#[async_trait::async_trait]
impl<R: PageRenderer, N: Notifier> Pipeline for MonitorPipeline<R, N> {
    async fn extract(&self) -> Result<Vec<PageSnapshot>> {
        let mut snapshots = Vec::with_capacity(self.queries.len());

        for (index, query) in self.queries.iter().enumerate() {
            // 每次查詢之間固定延遲，避免觸發網站的防爬機制
            if index > 0 && !self.between_queries.is_zero() {
                tokio::time::sleep(self.between_queries).await;
            }

            tracing::info!("Checking {} on {}...", query.route, query.date);
            let outcome = match self.renderer.render(&query.url).await {
                Ok(page) => FetchOutcome::Rendered(page),
                Err(e) => {
                    tracing::warn!("Error checking {} on {}: {}", query.route, query.date, e);
                    FetchOutcome::Failed(e.to_string())
                }
            };

            snapshots.push(PageSnapshot {
                query: query.clone(),
                outcome,
            });
        }

        Ok(snapshots)
    }

    async fn transform(&self, pages: Vec<PageSnapshot>) -> Result<Vec<AvailabilityResult>> {
        let mut results = Vec::with_capacity(pages.len());

        for snapshot in pages {
            let availability = match &snapshot.outcome {
                FetchOutcome::Rendered(page) => self.detector.detect(page),
                FetchOutcome::Failed(reason) => Availability::Unknown {
                    reason: reason.clone(),
                },
            };

            match &availability {
                Availability::Available { count, .. } => match count {
                    Some(count) => tracing::info!(
                        "✅ AVAILABLE: {} on {} ({} matches)",
                        snapshot.query.route,
                        snapshot.query.date,
                        count
                    ),
                    None => tracing::info!(
                        "✅ AVAILABLE: {} on {}",
                        snapshot.query.route,
                        snapshot.query.date
                    ),
                },
                Availability::Unavailable => tracing::info!(
                    "Not available: {} on {}",
                    snapshot.query.route,
                    snapshot.query.date
                ),
                Availability::Unknown { reason } => tracing::warn!(
                    "Availability unknown for {} on {}: {}",
                    snapshot.query.route,
                    snapshot.query.date,
                    reason
                ),
            }

            results.push(AvailabilityResult {
                query: snapshot.query,
                availability,
            });
        }

        Ok(results)
    }

    async fn load(&self, results: &[AvailabilityResult]) -> Result<DispatchOutcome> {
        let Some(notification) = Notification::from_results(results) else {
            tracing::info!("No tickets available at this time");
            return Ok(DispatchOutcome::NothingToReport);
        };

        let found = notification.results.len();
        tracing::info!("🎫 Found {} available trip(s)!", found);

        let outcome = match self.notifier.notify(&notification).await {
            Ok(Delivery::Emailed { recipient }) => {
                tracing::info!("📧 Email sent successfully to {}", recipient);
                DispatchOutcome::Sent {
                    recipient,
                    results: found,
                }
            }
            Ok(Delivery::Printed) => DispatchOutcome::Printed { results: found },
            Err(e) => {
                tracing::error!("❌ Failed to send notification: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                DispatchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        Ok(outcome)
    }

    async fn release(&self) -> Result<()> {
        self.renderer.release().await
    }
}
