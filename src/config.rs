use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Thresholds and status vocabularies used by both dashboards.
///
/// Every key is optional in the TOML file; absent keys keep the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sla_fnb_hours: f64,
    pub sla_grocery_hours: f64,
    pub sla_default_hours: f64,
    pub progress_mapping: BTreeMap<String, u8>,
    pub completed_status: String,
    pub active_statuses: Vec<String>,
    pub open_ticket_status: String,
    pub waiting_ticket_status: String,
    pub top_domains: usize,
    pub csv_delimiter: char,
    pub currency_symbol: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let progress_mapping = [("Completed", 100), ("In-progress", 75), ("Accepted", 25)]
            .into_iter()
            .map(|(status, pct)| (status.to_string(), pct))
            .collect();

        AppConfig {
            sla_fnb_hours: 1.0,
            sla_grocery_hours: 3.0,
            sla_default_hours: 5.0 * 24.0,
            progress_mapping,
            completed_status: "Completed".into(),
            active_statuses: vec!["In-progress".into(), "Accepted".into()],
            open_ticket_status: "Open".into(),
            waiting_ticket_status: "Waiting on Third Party".into(),
            top_domains: 10,
            csv_delimiter: ',',
            currency_symbol: "₹".into(),
        }
    }
}

impl AppConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, AppError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds and delimiters the loaders cannot work with.
    pub fn validate(&self) -> Result<(), AppError> {
        let thresholds = [
            ("sla_fnb_hours", self.sla_fnb_hours),
            ("sla_grocery_hours", self.sla_grocery_hours),
            ("sla_default_hours", self.sla_default_hours),
        ];
        for (key, value) in thresholds {
            if !value.is_finite() || value <= 0.0 {
                return Err(AppError::Custom(format!(
                    "{key} must be a positive number of hours, got {value}"
                )));
            }
        }
        if !self.csv_delimiter.is_ascii() {
            return Err(AppError::Custom(format!(
                "csv_delimiter must be a single ASCII character, got {:?}",
                self.csv_delimiter
            )));
        }
        if self.top_domains == 0 {
            return Err(AppError::Custom("top_domains must be at least 1".into()));
        }
        Ok(())
    }

    /// CSV delimiter as the byte the `csv` reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.csv_delimiter as u8
    }
}

/// Load the configuration from `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, AppError> {
    match path {
        Some(p) => {
            let content = std::fs::read_to_string(p)?;
            let config = AppConfig::from_toml_str(&content)?;
            log::info!("Configuration loaded from {}", p.display());
            Ok(config)
        }
        None => Ok(AppConfig::default()),
    }
}
