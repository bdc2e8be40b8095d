//! Core types for the Synheart ROI dashboard
//!
//! This module defines the data that flows between the sample sources, the
//! metrics aggregator, the investment ledger and the view projections.

use serde::{Deserialize, Serialize};

/// Baseline sleep before any investments (hours)
pub const SLEEP_BASELINE_HOURS: f64 = 6.5;
/// Baseline daily activity (steps)
pub const ACTIVITY_BASELINE_STEPS: f64 = 5000.0;
/// Baseline heart rate variability (ms)
pub const HRV_BASELINE_MS: f64 = 50.0;
/// Baseline stress level (0-10)
pub const STRESS_BASELINE: f64 = 7.0;

/// Target ceilings used for normalization
pub const SLEEP_CEILING_HOURS: f64 = 8.0;
pub const ACTIVITY_CEILING_STEPS: f64 = 10_000.0;
pub const HRV_CEILING_MS: f64 = 70.0;
pub const SCALE_CEILING: f64 = 10.0;

/// One day of health data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    /// Day index (1-based, sequential)
    pub day: u32,
    /// Sleep duration (hours)
    pub sleep_hours: f64,
    /// Step count
    pub steps: f64,
    /// Heart rate variability (ms)
    pub hrv_ms: f64,
    /// Stress level (0-10, lower is better)
    pub stress: f64,
    /// Energy level (0-10)
    pub energy: f64,
}

impl HealthSample {
    /// Read a single field of the sample
    pub fn value(&self, field: SampleField) -> f64 {
        match field {
            SampleField::Sleep => self.sleep_hours,
            SampleField::Steps => self.steps,
            SampleField::Hrv => self.hrv_ms,
            SampleField::Stress => self.stress,
            SampleField::Energy => self.energy,
        }
    }
}

/// Numeric fields of a [`HealthSample`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleField {
    Sleep,
    Steps,
    Hrv,
    Stress,
    Energy,
}

impl SampleField {
    pub const ALL: [SampleField; 5] = [
        SampleField::Sleep,
        SampleField::Steps,
        SampleField::Hrv,
        SampleField::Stress,
        SampleField::Energy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SampleField::Sleep => "sleep",
            SampleField::Steps => "steps",
            SampleField::Hrv => "hrv",
            SampleField::Stress => "stress",
            SampleField::Energy => "energy",
        }
    }

    /// Inclusive physical range a recorded value must fall within
    pub fn range(&self) -> (f64, f64) {
        match self {
            SampleField::Sleep => (0.0, 24.0),
            SampleField::Steps | SampleField::Hrv => (0.0, f64::INFINITY),
            SampleField::Stress | SampleField::Energy => (0.0, 10.0),
        }
    }
}

/// Metrics tracked against a baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Sleep,
    Activity,
    Hrv,
    Stress,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Sleep,
        MetricKind::Activity,
        MetricKind::Hrv,
        MetricKind::Stress,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Sleep => "Sleep Quality",
            MetricKind::Activity => "Daily Activity",
            MetricKind::Hrv => "Heart Rate Variability",
            MetricKind::Stress => "Stress Level",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Sleep => "hrs",
            MetricKind::Activity => "steps",
            MetricKind::Hrv => "ms",
            MetricKind::Stress => "/10",
        }
    }

    pub fn baseline(&self) -> f64 {
        match self {
            MetricKind::Sleep => SLEEP_BASELINE_HOURS,
            MetricKind::Activity => ACTIVITY_BASELINE_STEPS,
            MetricKind::Hrv => HRV_BASELINE_MS,
            MetricKind::Stress => STRESS_BASELINE,
        }
    }

    /// Stress improves as it goes down
    pub fn lower_is_better(&self) -> bool {
        matches!(self, MetricKind::Stress)
    }

    pub fn field(&self) -> SampleField {
        match self {
            MetricKind::Sleep => SampleField::Sleep,
            MetricKind::Activity => SampleField::Steps,
            MetricKind::Hrv => SampleField::Hrv,
            MetricKind::Stress => SampleField::Stress,
        }
    }
}

/// Averages of every sample field over the trailing window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowAverages {
    pub sleep_hours: f64,
    pub steps: f64,
    pub hrv_ms: f64,
    pub stress: f64,
    pub energy: f64,
    /// Number of days averaged
    pub window: usize,
}

impl WindowAverages {
    pub fn get(&self, field: SampleField) -> f64 {
        match field {
            SampleField::Sleep => self.sleep_hours,
            SampleField::Steps => self.steps,
            SampleField::Hrv => self.hrv_ms,
            SampleField::Stress => self.stress,
            SampleField::Energy => self.energy,
        }
    }

    /// Averages at the precision they are displayed with: sleep and stress to
    /// one decimal, steps and HRV to whole numbers.
    pub fn rounded(&self) -> Self {
        Self {
            sleep_hours: round_to(self.sleep_hours, 1),
            steps: round_half_up(self.steps),
            hrv_ms: round_half_up(self.hrv_ms),
            stress: round_to(self.stress, 1),
            energy: self.energy,
            window: self.window,
        }
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Round to the nearest integer with halves going toward positive infinity,
/// so -2.5 becomes -2 and 2.5 becomes 3.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// A recurring health investment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: u64,
    pub name: String,
    /// Monthly cost (currency units)
    pub monthly_cost: f64,
    /// Weekly time commitment (hours)
    pub weekly_time_hours: f64,
    pub category: String,
    pub active: bool,
}

/// Payload of the add-investment form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvestment {
    pub name: String,
    pub monthly_cost: f64,
    pub weekly_time_hours: f64,
    pub category: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl NewInvestment {
    pub fn new(name: &str, monthly_cost: f64, weekly_time_hours: f64, category: &str) -> Self {
        Self {
            name: name.to_string(),
            monthly_cost,
            weekly_time_hours,
            category: category.to_string(),
            active: true,
        }
    }

    /// Mark the investment as paused
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub(crate) fn into_investment(self, id: u64) -> Investment {
        Investment {
            id,
            name: self.name,
            monthly_cost: self.monthly_cost,
            weekly_time_hours: self.weekly_time_hours,
            category: self.category,
            active: self.active,
        }
    }
}

/// Baseline-vs-current comparison for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetric {
    pub metric: MetricKind,
    pub label: String,
    pub baseline: f64,
    pub current: f64,
    pub unit: String,
    /// Improvement relative to baseline (percentage, unrounded)
    pub improvement_percent: f64,
}

impl DerivedMetric {
    /// Improvement rounded to whole percent for display
    pub fn rounded_improvement(&self) -> i64 {
        round_half_up(self.improvement_percent) as i64
    }

    pub fn is_improving(&self) -> bool {
        self.rounded_improvement() > 0
    }
}

/// Radar chart axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadarCategory {
    Sleep,
    Activity,
    Recovery,
    Energy,
    MentalHealth,
}

impl RadarCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RadarCategory::Sleep => "Sleep",
            RadarCategory::Activity => "Activity",
            RadarCategory::Recovery => "Recovery",
            RadarCategory::Energy => "Energy",
            RadarCategory::MentalHealth => "Mental Health",
        }
    }
}

/// One radar chart value (percentage of target)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarPoint {
    pub category: RadarCategory,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_averages_use_display_precision() {
        let averages = WindowAverages {
            sleep_hours: 7.349,
            steps: 6123.6,
            hrv_ms: 55.5,
            stress: 5.66,
            energy: 6.123,
            window: 7,
        };

        let rounded = averages.rounded();
        assert_eq!(rounded.sleep_hours, 7.3);
        assert_eq!(rounded.steps, 6124.0);
        assert_eq!(rounded.hrv_ms, 56.0);
        assert_eq!(rounded.stress, 5.7);
        assert_eq!(rounded.energy, 6.123);
    }

    #[test]
    fn test_new_investment_defaults_active() {
        let parsed: NewInvestment = serde_json::from_str(
            r#"{"name":"Yoga","monthly_cost":30,"weekly_time_hours":2,"category":"Exercise"}"#,
        )
        .unwrap();
        assert!(parsed.active);
        assert!(!parsed.inactive().active);
    }

    #[test]
    fn test_metric_directions() {
        assert!(MetricKind::Stress.lower_is_better());
        assert!(!MetricKind::Sleep.lower_is_better());
        assert_eq!(MetricKind::Activity.field(), SampleField::Steps);
    }

    #[test]
    fn test_half_percent_rounds_up() {
        let metric = |improvement_percent: f64| DerivedMetric {
            metric: MetricKind::Stress,
            label: "Stress Level".to_string(),
            baseline: 7.0,
            current: 7.0,
            unit: "/10".to_string(),
            improvement_percent,
        };

        assert_eq!(metric(-2.5).rounded_improvement(), -2);
        assert_eq!(metric(2.5).rounded_improvement(), 3);
        assert_eq!(metric(-2.6).rounded_improvement(), -3);
        assert_eq!(round_half_up(6123.5), 6124.0);
        assert_eq!(round_half_up(-0.5), 0.0);
    }

    #[test]
    fn test_sample_field_ranges() {
        assert_eq!(SampleField::Sleep.range(), (0.0, 24.0));
        assert_eq!(SampleField::Energy.range(), (0.0, 10.0));
        assert!(SampleField::Steps.range().1.is_infinite());
    }
}
