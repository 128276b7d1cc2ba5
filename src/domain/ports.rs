use crate::config::settings::{DetectionSettings, PacingSettings, RouteConfig, SiteSettings};
use crate::domain::model::{
    AvailabilityResult, Delivery, DispatchOutcome, Notification, PageSnapshot, RenderedPage,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Turns a booking URL into rendered page content.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<RenderedPage>;

    /// Frees the underlying browser session. Safe to call more than once.
    async fn release(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<R: PageRenderer + ?Sized> PageRenderer for Box<R> {
    async fn render(&self, url: &str) -> Result<RenderedPage> {
        (**self).render(url).await
    }

    async fn release(&self) -> Result<()> {
        (**self).release().await
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<Delivery>;
}

#[async_trait]
impl<N: Notifier + ?Sized> Notifier for Box<N> {
    async fn notify(&self, notification: &Notification) -> Result<Delivery> {
        (**self).notify(notification).await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn routes(&self) -> &[RouteConfig];
    fn site(&self) -> &SiteSettings;
    fn pacing(&self) -> &PacingSettings;
    fn detection(&self) -> &DetectionSettings;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<PageSnapshot>>;
    async fn transform(&self, pages: Vec<PageSnapshot>) -> Result<Vec<AvailabilityResult>>;
    async fn load(&self, results: &[AvailabilityResult]) -> Result<DispatchOutcome>;

    async fn release(&self) -> Result<()> {
        Ok(())
    }
}
