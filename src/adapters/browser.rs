use crate::config::settings::{BrowserSettings, PacingSettings};
use crate::domain::model::RenderedPage;
use crate::domain::ports::PageRenderer;
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::prelude::*;
use tokio::sync::Mutex;

/// Headless Chrome over WebDriver. Needs a running chromedriver at `webdriver_url`.
///
/// The session is opened once by [`WebDriverRenderer::launch`] and reused for every
/// query; [`PageRenderer::release`] quits it.
pub struct WebDriverRenderer {
    driver: Mutex<Option<WebDriver>>,
    settle: Duration,
}

impl WebDriverRenderer {
    pub async fn launch(browser: &BrowserSettings, pacing: &PacingSettings) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if browser.headless {
            caps.add_arg("--headless=new")?;
        }
        caps.add_arg("--no-sandbox")?;
        caps.add_arg("--disable-setuid-sandbox")?;
        caps.add_arg("--disable-dev-shm-usage")?;
        caps.add_arg("--disable-gpu")?;
        caps.add_arg(&format!(
            "--window-size={},{}",
            browser.window_width, browser.window_height
        ))?;
        caps.add_arg(&format!("--user-agent={}", browser.user_agent))?;

        tracing::info!("🌐 Opening headless Chrome via {}", browser.webdriver_url);
        let driver = WebDriver::new(browser.webdriver_url.as_str(), caps).await?;

        if let Err(e) = driver.set_page_load_timeout(browser.page_load_timeout()).await {
            // 設定失敗時先關閉 session
            let _ = driver.quit().await;
            return Err(e.into());
        }

        Ok(Self {
            driver: Mutex::new(Some(driver)),
            settle: pacing.settle(),
        })
    }
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage> {
        let guard = self.driver.lock().await;
        let driver = guard.as_ref().ok_or_else(|| MonitorError::FetchError {
            url: url.to_string(),
            message: "browser session already released".to_string(),
        })?;

        driver.goto(url).await?;
        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }

        let html = driver.source().await?;
        let text = driver.find(By::Tag("body")).await?.text().await?;

        Ok(RenderedPage { html, text })
    }

    async fn release(&self) -> Result<()> {
        let driver = self.driver.lock().await.take();
        if let Some(driver) = driver {
            tracing::debug!("Closing browser session");
            driver.quit().await?;
        }
        Ok(())
    }
}
