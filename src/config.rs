//! Dashboard configuration
//!
//! Settings are plain serde data so they can be loaded from a JSON file and
//! overridden field by field from the CLI.

use crate::error::RoiError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Days of history shown on the dashboard
pub const DEFAULT_WINDOW_DAYS: usize = 30;

/// Trailing window for current-metric averages
pub const DEFAULT_ROLLING_WINDOW: usize = 7;

/// Health score before any investments began
pub const DEFAULT_REFERENCE_SCORE: i64 = 65;

/// How scores and radar values outside their nominal range are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Clamp sub-scores to [0, 25] and radar values to [0, 100]
    #[default]
    Saturate,
    /// Leave values unclamped
    Passthrough,
}

impl RangePolicy {
    pub fn apply(&self, value: f64, min: f64, max: f64) -> f64 {
        match self {
            RangePolicy::Saturate => value.clamp(min, max),
            RangePolicy::Passthrough => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub window_days: usize,
    pub rolling_window: usize,
    pub reference_score: i64,
    pub range_policy: RangePolicy,
    /// Seed for the synthetic sample source
    pub seed: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            rolling_window: DEFAULT_ROLLING_WINDOW,
            reference_score: DEFAULT_REFERENCE_SCORE,
            range_policy: RangePolicy::default(),
            seed: None,
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), RoiError> {
        if self.rolling_window == 0 {
            return Err(RoiError::InvalidConfig(
                "rolling_window must be at least 1".to_string(),
            ));
        }
        if self.window_days < self.rolling_window {
            return Err(RoiError::InvalidConfig(format!(
                "window_days ({}) is shorter than rolling_window ({})",
                self.window_days, self.rolling_window
            )));
        }
        Ok(())
    }

    /// Load configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, RoiError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, RoiError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            RoiError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, RoiError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
