use crate::config::settings::BrowserSettings;
use crate::core::detect::visible_text;
use crate::domain::model::RenderedPage;
use crate::domain::ports::PageRenderer;
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Fetches pages with a plain GET. Nothing runs client-side, so this only sees what the
/// server sends in the initial document.
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(settings: &BrowserSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.page_load_timeout())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        tracing::debug!("Booking page response status: {}", status);
        if !status.is_success() {
            return Err(MonitorError::FetchError {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let html = response.text().await?;
        let text = visible_text(&html);
        Ok(RenderedPage { html, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn renderer() -> HttpRenderer {
        HttpRenderer::new(&BrowserSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_render_returns_html_and_text() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/select-trip")
                .query_param("DepartureDateString", "2025-03-04");
            then.status(200)
                .header("Content-Type", "text/html")
                .body(r#"<html><body><div class="trip-card">08:00 Riyadh</div></body></html>"#);
        });

        let page = renderer()
            .render(&server.url("/select-trip?DepartureDateString=2025-03-04"))
            .await
            .unwrap();

        page_mock.assert();
        assert!(page.html.contains("trip-card"));
        assert_eq!(page.text, "08:00 Riyadh");
    }

    #[tokio::test]
    async fn test_render_sends_configured_user_agent() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/select-trip")
                .header("user-agent", BrowserSettings::default().user_agent);
            then.status(200).body("<html><body>ok</body></html>");
        });

        renderer().render(&server.url("/select-trip")).await.unwrap();
        page_mock.assert();
    }

    #[tokio::test]
    async fn test_render_error_status_is_fetch_error() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/select-trip");
            then.status(503);
        });

        let result = renderer().render(&server.url("/select-trip")).await;

        page_mock.assert();
        assert!(matches!(result, Err(MonitorError::FetchError { .. })));
    }
}
