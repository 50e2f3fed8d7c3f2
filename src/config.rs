//! Configuration
//!
//! Values come from defaults, then an optional JSON file, then CLI flags.

use crate::error::{CliniPickError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tuning for a searchable select control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PickerConfig {
    /// Input must be stationary this long before a query settles
    pub quiet_period_ms: u64,
    /// Queries shorter than this never reach the collaborator
    pub min_query_len: usize,
    /// Upper bound on records requested per fetch
    pub fetch_limit: usize,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: 300,
            min_query_len: 2,
            fetch_limit: 100,
        }
    }
}

impl PickerConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Clinic used as the scope key for every request
    pub clinic: String,
    /// Rows per page in list views
    pub page_size: usize,
    /// Picker tuning shared by all pickers
    pub picker: PickerConfig,
    /// Artificial delay added by the in-memory collaborator
    pub simulated_latency_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            clinic: "Downtown".to_string(),
            page_size: 10,
            picker: PickerConfig::default(),
            simulated_latency_ms: 0,
        }
    }
}

impl AppConfig {
    /// Load from a JSON file; absent fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&text)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.clinic.trim().is_empty() {
            return Err(CliniPickError::InvalidConfig("clinic must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(CliniPickError::InvalidPageSize(0));
        }
        if self.picker.fetch_limit == 0 {
            return Err(CliniPickError::InvalidConfig(
                "fetchLimit must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}
