use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub name: String,
    pub from_station: String,
    pub to_station: String,
    pub from_name: String,
    pub to_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_direction")]
    pub direction: String,
}

fn default_direction() -> String {
    "N".to_string()
}

impl RouteConfig {
    pub fn label(&self) -> String {
        format!("{} to {}", self.from_name, self.to_name)
    }
}

/// Routes checked when no configuration file is given.
pub fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig {
            name: "outbound".to_string(),
            from_station: "RIY".to_string(),
            to_station: "QUR".to_string(),
            from_name: "Riyadh".to_string(),
            to_name: "Qurayyat".to_string(),
            start_date: ymd(2025, 3, 3),
            end_date: ymd(2025, 3, 20),
            direction: default_direction(),
        },
        RouteConfig {
            name: "return".to_string(),
            from_station: "QUR".to_string(),
            to_station: "RIY".to_string(),
            from_name: "Qurayyat".to_string(),
            to_name: "Riyadh".to_string(),
            start_date: ymd(2025, 3, 23),
            end_date: ymd(2025, 4, 2),
            direction: default_direction(),
        },
    ]
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub base_url: String,
    pub language: String,
    pub service_type: String,
    pub adult_count: u32,
    pub child_count: u32,
    pub infant_count: u32,
    pub disabled_count: u32,
    pub carer_count: u32,
    pub with_car_cargo: bool,
}

impl SiteSettings {
    /// Total of all passenger categories, `None` on overflow.
    pub fn passengers_count(&self) -> Option<u32> {
        [self.child_count, self.infant_count, self.disabled_count, self.carer_count]
            .into_iter()
            .try_fold(self.adult_count, u32::checked_add)
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: "https://tickets.sar.com.sa/select-trip".to_string(),
            language: "en".to_string(),
            service_type: "1".to_string(),
            adult_count: 1,
            child_count: 0,
            infant_count: 0,
            disabled_count: 0,
            carer_count: 0,
            with_car_cargo: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Headless Chrome driven over WebDriver.
    #[cfg_attr(feature = "cli", value(name = "webdriver"))]
    WebDriver,
    /// Plain HTTP GET, no JavaScript.
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub renderer: RendererKind,
    pub webdriver_url: String,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub user_agent: String,
    pub page_load_timeout_secs: u64,
}

impl BrowserSettings {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            renderer: RendererKind::WebDriver,
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            window_width: 1280,
            window_height: 720,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            page_load_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingSettings {
    /// Wait between two page fetches.
    pub between_queries_ms: u64,
    /// Wait after navigation so client-side rendering can finish.
    pub settle_ms: u64,
}

impl PacingSettings {
    pub fn between_queries(&self) -> Duration {
        Duration::from_millis(self.between_queries_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            between_queries_ms: 2_000,
            settle_ms: 3_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    pub unavailable_indicators: Vec<String>,
    pub trip_selectors: Vec<String>,
    pub book_selector: String,
    pub book_label: String,
    pub price_selectors: Vec<String>,
    pub details_max_chars: usize,
    /// When set, a page with no sold-out text but no trip, Book or price element is
    /// reported as unavailable instead of available.
    pub require_structural_cue: bool,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            unavailable_indicators: strings(&[
                "no trips available",
                "no trains available",
                "no results",
                "sold out",
                "no seats available",
            ]),
            trip_selectors: strings(&[
                ".trip-card",
                ".journey-card",
                ".train-result",
                "[class*='trip']",
                "[class*='journey']",
                ".available-trip",
            ]),
            book_selector: "button, a".to_string(),
            book_label: "Book".to_string(),
            price_selectors: strings(&["[class*='price']", "[class*='fare']", ".sar-price"]),
            details_max_chars: 500,
            require_structural_cue: false,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Implicit TLS, port 465.
    Smtps,
    /// Plain connection upgraded with STARTTLS, port 587.
    Starttls,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub security: SmtpSecurity,
    pub port: Option<u16>,
}

impl EmailSettings {
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(match self.security {
            SmtpSecurity::Smtps => 465,
            SmtpSecurity::Starttls => 587,
        })
    }
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            security: SmtpSecurity::Smtps,
            port: None,
        }
    }
}
