//! Recorded sample fixtures
//!
//! Loads daily samples from a JSON array or NDJSON and serves the trailing
//! window on request.

use super::{validate_samples, HealthSampleSource};
use crate::error::RoiError;
use crate::types::HealthSample;
use tracing::debug;

/// Source backed by a validated, in-memory sample series
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureSource {
    samples: Vec<HealthSample>,
}

impl FixtureSource {
    /// Wrap an existing series after validating it
    pub fn new(samples: Vec<HealthSample>) -> Result<Self, RoiError> {
        validate_samples(&samples)?;
        Ok(Self { samples })
    }

    /// Parse a JSON string containing an array of samples
    pub fn parse_array(json: &str) -> Result<Self, RoiError> {
        let samples: Vec<HealthSample> = serde_json::from_str(json)?;
        Self::new(samples)
    }

    /// Parse NDJSON (one sample per line)
    pub fn parse_ndjson(ndjson: &str) -> Result<Self, RoiError> {
        Self::new(parse_ndjson_lines(ndjson)?)
    }

    pub fn samples(&self) -> &[HealthSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl HealthSampleSource for FixtureSource {
    fn fetch_window(&self, days: usize) -> Result<Vec<HealthSample>, RoiError> {
        if self.samples.len() < days {
            return Err(RoiError::InsufficientHistory {
                required: days,
                available: self.samples.len(),
            });
        }

        let window = self.samples[self.samples.len() - days..].to_vec();
        debug!(days, total = self.samples.len(), "serving fixture window");
        Ok(window)
    }
}

/// Parse NDJSON samples without validating them
pub fn parse_ndjson_lines(ndjson: &str) -> Result<Vec<HealthSample>, RoiError> {
    let mut samples = Vec::new();
    for (line_num, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<HealthSample>(trimmed) {
            Ok(sample) => samples.push(sample),
            Err(e) => {
                return Err(RoiError::ParseError(format!(
                    "Failed to parse line {}: {}",
                    line_num + 1,
                    e
                )));
            }
        }
    }
    Ok(samples)
}
