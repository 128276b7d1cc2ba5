use crate::utils::error::{MonitorError, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(MonitorError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Station codes are short alphanumeric identifiers such as `RIY` or `QUR`.
pub fn validate_station_code(field_name: &str, code: &str) -> Result<()> {
    validate_non_empty_string(field_name, code)?;

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(MonitorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: code.to_string(),
            reason: "Station code must be alphanumeric".to_string(),
        });
    }
    Ok(())
}

pub fn validate_date_range(field_name: &str, start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(MonitorError::ConfigValidationError {
            field: field_name.to_string(),
            message: format!("start_date {} is after end_date {}", start, end),
        });
    }
    Ok(())
}

pub fn validate_unique_names<'a, I>(field_name: &str, names: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(MonitorError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: name.to_string(),
                reason: "Duplicate name".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("site.base_url", "https://tickets.sar.com.sa/select-trip").is_ok());
        assert!(validate_url("browser.webdriver_url", "http://localhost:9515").is_ok());
        assert!(validate_url("site.base_url", "").is_err());
        assert!(validate_url("site.base_url", "invalid-url").is_err());
        assert!(validate_url("site.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_station_code() {
        assert!(validate_station_code("from_station", "RIY").is_ok());
        assert!(validate_station_code("from_station", "  ").is_err());
        assert!(validate_station_code("from_station", "RI-Y").is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let march_3 = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let march_20 = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();

        assert!(validate_date_range("routes.outbound", march_3, march_20).is_ok());
        assert!(validate_date_range("routes.outbound", march_3, march_3).is_ok());
        assert!(validate_date_range("routes.outbound", march_20, march_3).is_err());
    }

    #[test]
    fn test_validate_unique_names() {
        assert!(validate_unique_names("routes", ["outbound", "return"]).is_ok());
        assert!(validate_unique_names("routes", ["outbound", "outbound"]).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("browser.page_load_timeout_secs", 30, 1, 300).is_ok());
        assert!(validate_range("browser.page_load_timeout_secs", 0, 1, 300).is_err());
    }
}
