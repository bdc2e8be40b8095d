//! Health sample sources
//!
//! A source supplies the ordered window of daily samples the dashboard
//! aggregates. The synthetic source stands in for a wearable feed; the
//! fixture source replays recorded samples from JSON.

mod fixture;
mod synthetic;

pub use fixture::{parse_ndjson_lines, FixtureSource};
pub use synthetic::{generate, SyntheticSource};

use crate::error::RoiError;
use crate::types::{HealthSample, SampleField};

/// Trait for daily health sample sources
pub trait HealthSampleSource {
    /// Return exactly `days` samples ordered by day ascending
    fn fetch_window(&self, days: usize) -> Result<Vec<HealthSample>, RoiError>;
}

/// Check the invariants every sample window must hold: sequential day
/// indices and values within their physical ranges.
pub fn validate_samples(samples: &[HealthSample]) -> Result<(), RoiError> {
    let mut previous: Option<u32> = None;

    for sample in samples {
        if sample.day == 0 {
            return Err(invalid(sample.day, "day index must be positive"));
        }
        if let Some(prev) = previous {
            match prev.checked_add(1) {
                Some(expected) if sample.day == expected => {}
                Some(expected) => {
                    return Err(invalid(
                        sample.day,
                        &format!("expected day {expected} to follow day {prev}"),
                    ));
                }
                None => {
                    return Err(invalid(
                        sample.day,
                        &format!("no day can follow day {prev}"),
                    ));
                }
            }
        }
        previous = Some(sample.day);

        for field in SampleField::ALL {
            check_range(sample.day, field, sample.value(field))?;
        }
    }

    Ok(())
}

fn check_range(day: u32, field: SampleField, value: f64) -> Result<(), RoiError> {
    let (min, max) = field.range();
    if !value.is_finite() || value < min || value > max {
        return Err(invalid(
            day,
            &format!("{} {value} outside [{min}, {max}]", field.as_str()),
        ));
    }
    Ok(())
}

fn invalid(day: u32, reason: &str) -> RoiError {
    RoiError::InvalidSample {
        day,
        reason: reason.to_string(),
    }
}
