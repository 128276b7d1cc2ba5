use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[cfg(feature = "browser")]
    #[error("Browser automation failed: {0}")]
    WebDriverError(#[from] thirtyfour::error::WebDriverError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Page fetch failed for {url}: {message}")]
    FetchError { url: String, message: String },

    #[error("Notification send failed: {message}")]
    SendError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Browser,
    Parsing,
    Notification,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MonitorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::FetchError { .. } => ErrorCategory::Network,
            #[cfg(feature = "browser")]
            Self::WebDriverError(_) => ErrorCategory::Browser,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::SerializationError(_) => ErrorCategory::Parsing,
            Self::SendError { .. } => ErrorCategory::Notification,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Notification => ErrorSeverity::Medium,
            ErrorCategory::Parsing => ErrorSeverity::Low,
            ErrorCategory::Configuration | ErrorCategory::Browser => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TOML configuration and route dates, then run again with --dry-run"
            }
            ErrorCategory::Network => {
                "The booking site may be slow or blocking requests; the next scheduled run will retry"
            }
            ErrorCategory::Browser => {
                "Make sure chromedriver is running and reachable at the configured webdriver_url"
            }
            ErrorCategory::Parsing => {
                "The booking page layout may have changed; review the detection selectors"
            }
            ErrorCategory::Notification => {
                "Verify SENDER_EMAIL / SENDER_PASSWORD and that the SMTP relay accepts app passwords"
            }
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not reach the booking site: {}", self),
            ErrorCategory::Browser => format!("Headless browser unavailable: {}", self),
            ErrorCategory::Parsing => format!("Could not read the booking page: {}", self),
            ErrorCategory::Notification => format!("Email notification failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    /// Exit code used by the binary when a run cannot start.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl From<lettre::error::Error> for MonitorError {
    fn from(err: lettre::error::Error) -> Self {
        Self::SendError {
            message: format!("could not build message: {}", err),
        }
    }
}

impl From<lettre::address::AddressError> for MonitorError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::SendError {
            message: format!("invalid email address: {}", err),
        }
    }
}

impl From<lettre::transport::smtp::Error> for MonitorError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        Self::SendError {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = MonitorError::MissingConfigError {
            field: "routes".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_fetch_and_send_errors_are_recoverable() {
        let fetch = MonitorError::FetchError {
            url: "https://tickets.sar.com.sa/select-trip".to_string(),
            message: "timeout".to_string(),
        };
        let send = MonitorError::SendError {
            message: "auth rejected".to_string(),
        };

        assert_eq!(fetch.severity(), ErrorSeverity::Medium);
        assert_eq!(send.category(), ErrorCategory::Notification);
        assert!(send.user_friendly_message().contains("auth rejected"));
    }
}
