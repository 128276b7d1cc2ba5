use crate::config::settings::RendererKind;
use crate::config::toml_config::MonitorConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "sar-monitor")]
#[command(about = "Check SAR train ticket availability and email when seats open up")]
pub struct CliConfig {
    /// Path to a TOML configuration file; built-in routes are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the page renderer from the configuration
    #[arg(long, value_enum)]
    pub renderer: Option<RendererKind>,

    /// Override the WebDriver endpoint (chromedriver)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit JSON log lines")]
    pub log_json: bool,

    #[arg(long, help = "Log process CPU and memory usage per phase")]
    pub monitor: bool,

    /// Print the planned queries and exit without fetching anything
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// 套用命令列覆蓋設定
    pub fn apply_overrides(&self, config: &mut MonitorConfig) {
        if let Some(renderer) = self.renderer {
            tracing::info!("🔧 Renderer overridden to: {:?}", renderer);
            config.browser.renderer = renderer;
        }
        if let Some(url) = &self.webdriver_url {
            tracing::info!("🔧 WebDriver URL overridden to: {}", url);
            config.browser.webdriver_url = url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let cli = CliConfig::parse_from([
            "sar-monitor",
            "--renderer",
            "http",
            "--webdriver-url",
            "http://chromedriver:4444",
            "--dry-run",
        ]);

        let mut config = MonitorConfig::default();
        cli.apply_overrides(&mut config);

        assert!(cli.dry_run);
        assert!(cli.config.is_none());
        assert_eq!(config.browser.renderer, RendererKind::Http);
        assert_eq!(config.browser.webdriver_url, "http://chromedriver:4444");
    }

    #[test]
    fn test_webdriver_renderer_name() {
        let cli = CliConfig::parse_from(["sar-monitor", "--renderer", "webdriver"]);
        assert_eq!(cli.renderer, Some(RendererKind::WebDriver));
    }
}
