use crate::config::settings::{
    default_routes, BrowserSettings, DetectionSettings, EmailSettings, PacingSettings,
    RouteConfig, SiteSettings,
};
use crate::core::detect::AvailabilityDetector;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MonitorError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full monitor configuration. Every section is optional in the file and falls back to
/// the built-in SAR defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub site: SiteSettings,
    pub browser: BrowserSettings,
    pub pacing: PacingSettings,
    pub detection: DetectionSettings,
    pub email: EmailSettings,
    pub routes: Vec<RouteConfig>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            site: SiteSettings::default(),
            browser: BrowserSettings::default(),
            pacing: PacingSettings::default(),
            detection: DetectionSettings::default(),
            email: EmailSettings::default(),
            routes: default_routes(),
        }
    }
}

impl MonitorConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MonitorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SENDER_EMAIL})，未定義的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| MonitorError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn total_queries(&self) -> usize {
        self.routes
            .iter()
            .map(|r| {
                (r.end_date - r.start_date)
                    .num_days()
                    .saturating_add(1)
                    .max(0) as usize
            })
            .sum()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.routes.is_empty() {
            return Err(MonitorError::MissingConfigError {
                field: "routes".to_string(),
            });
        }

        validation::validate_unique_names("routes.name", self.routes.iter().map(|r| r.name.as_str()))?;

        for route in &self.routes {
            let field = format!("routes.{}", route.name);
            validation::validate_non_empty_string("routes.name", &route.name)?;
            validation::validate_station_code(&format!("{}.from_station", field), &route.from_station)?;
            validation::validate_station_code(&format!("{}.to_station", field), &route.to_station)?;
            validation::validate_date_range(&field, route.start_date, route.end_date)?;
        }

        validation::validate_url("site.base_url", &self.site.base_url)?;
        validation::validate_url("browser.webdriver_url", &self.browser.webdriver_url)?;
        validation::validate_range(
            "browser.page_load_timeout_secs",
            self.browser.page_load_timeout_secs,
            1,
            300,
        )?;
        validation::validate_non_empty_string("email.smtp_host", &self.email.smtp_host)?;

        match self.site.passengers_count() {
            None => {
                return Err(MonitorError::InvalidConfigValueError {
                    field: "site".to_string(),
                    value: "passenger counts".to_string(),
                    reason: "Passenger total does not fit in u32".to_string(),
                });
            }
            Some(0) => {
                return Err(MonitorError::InvalidConfigValueError {
                    field: "site.adult_count".to_string(),
                    value: "0".to_string(),
                    reason: "At least one passenger is required".to_string(),
                });
            }
            Some(_) => {}
        }

        // 選擇器在開啟瀏覽器前就要能解析
        AvailabilityDetector::new(&self.detection)?;

        Ok(())
    }
}

impl ConfigProvider for MonitorConfig {
    fn routes(&self) -> &[RouteConfig] {
        &self.routes
    }

    fn site(&self) -> &SiteSettings {
        &self.site
    }

    fn pacing(&self) -> &PacingSettings {
        &self.pacing
    }

    fn detection(&self) -> &DetectionSettings {
        &self.detection
    }
}

impl Validate for MonitorConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
