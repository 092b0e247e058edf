use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Rows per table page.
    pub page_size: usize,
    /// Width of the page-number strip; must be odd.
    pub page_window: usize,
    pub top_agents_limit: usize,
    /// Most recent months kept in the priority trend.
    pub trend_months: usize,
    pub csv_delimiter: char,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            page_size: 10,
            page_window: 5,
            top_agents_limit: 10,
            trend_months: 6,
            csv_delimiter: ';',
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page_size == 0 {
            return Err(AppError::InvalidConfig("page_size must be at least 1".into()));
        }
        if self.page_window == 0 || self.page_window % 2 == 0 {
            return Err(AppError::InvalidConfig(format!(
                "page_window must be odd, got {}",
                self.page_window
            )));
        }
        if self.top_agents_limit == 0 {
            return Err(AppError::InvalidConfig("top_agents_limit must be at least 1".into()));
        }
        if self.trend_months == 0 {
            return Err(AppError::InvalidConfig("trend_months must be at least 1".into()));
        }
        if !self.csv_delimiter.is_ascii() || self.csv_delimiter.is_ascii_alphanumeric() {
            return Err(AppError::InvalidConfig(format!(
                "csv_delimiter must be an ASCII symbol, got {:?}",
                self.csv_delimiter
            )));
        }
        Ok(())
    }

    /// Delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        if self.csv_delimiter.is_ascii() {
            self.csv_delimiter as u8
        } else {
            b';'
        }
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds a configuration from a flat JSON object of `key: value` overrides.
///
/// Values may be strings or numbers. A value that does not parse keeps the
/// default; unknown keys are logged and ignored. The result is validated.
pub fn get_config_from_json(json: &str) -> Result<AppConfig, AppError> {
    let pairs: Map<String, Value> = serde_json::from_str(json)?;
    let defaults = AppConfig::default();
    let mut config = defaults.clone();

    for (key, value) in pairs {
        let value = as_text(&value);
        match key.as_str() {
            "page_size" => config.page_size = value.parse().unwrap_or(defaults.page_size),
            "page_window" => config.page_window = value.parse().unwrap_or(defaults.page_window),
            "top_agents_limit" => {
                config.top_agents_limit = value.parse().unwrap_or(defaults.top_agents_limit)
            }
            "trend_months" => {
                config.trend_months = value.parse().unwrap_or(defaults.trend_months)
            }
            "csv_delimiter" => {
                let mut chars = value.chars();
                config.csv_delimiter = match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => defaults.csv_delimiter,
                }
            }
            _ => log::warn!("Ignoring unknown configuration key {:?}", key),
        }
    }

    config.validate()?;
    Ok(config)
}

/// Reads overrides from a JSON file. A missing file yields the defaults.
pub fn get_config_from_file(path: impl AsRef<Path>) -> Result<AppConfig, AppError> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("No configuration at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(path)?;
    get_config_from_json(&content)
}

/// Flat key/value document accepted back by [`get_config_from_json`].
pub fn config_to_json(config: &AppConfig) -> Value {
    let pairs: Vec<(&str, String)> = vec![
        ("page_size", config.page_size.to_string()),
        ("page_window", config.page_window.to_string()),
        ("top_agents_limit", config.top_agents_limit.to_string()),
        ("trend_months", config.trend_months.to_string()),
        ("csv_delimiter", config.csv_delimiter.to_string()),
    ];

    Value::Object(
        pairs
            .into_iter()
            .map(|(key, value)| (key.to_string(), Value::String(value)))
            .collect(),
    )
}
