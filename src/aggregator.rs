//! Metrics aggregation
//!
//! This module turns a window of daily samples into the figures shown on the
//! dashboard:
//! - Trailing rolling averages
//! - Composite health score
//! - Baseline-vs-current improvement percentages
//! - Radar profile

use crate::config::RangePolicy;
use crate::error::RoiError;
use crate::types::{
    round_half_up, DerivedMetric, HealthSample, MetricKind, RadarCategory, RadarPoint,
    SampleField, WindowAverages, ACTIVITY_CEILING_STEPS, HRV_CEILING_MS, SCALE_CEILING, SLEEP_CEILING_HOURS,
};

/// Maximum contribution of one sub-metric to the health score
pub const SUB_SCORE_MAX: f64 = 25.0;

/// Mean of `field` over the last `window` samples.
pub fn rolling_average(
    samples: &[HealthSample],
    window: usize,
    field: SampleField,
) -> Result<f64, RoiError> {
    if window == 0 || samples.len() < window {
        return Err(RoiError::InsufficientHistory {
            required: window.max(1),
            available: samples.len(),
        });
    }

    let recent = &samples[samples.len() - window..];
    let sum: f64 = recent.iter().map(|s| s.value(field)).sum();
    Ok(sum / window as f64)
}

/// Averages for every field over the trailing window
pub fn window_averages(
    samples: &[HealthSample],
    window: usize,
) -> Result<WindowAverages, RoiError> {
    Ok(WindowAverages {
        sleep_hours: rolling_average(samples, window, SampleField::Sleep)?,
        steps: rolling_average(samples, window, SampleField::Steps)?,
        hrv_ms: rolling_average(samples, window, SampleField::Hrv)?,
        stress: rolling_average(samples, window, SampleField::Stress)?,
        energy: rolling_average(samples, window, SampleField::Energy)?,
        window,
    })
}

/// Composite 0-100 health score.
///
/// Each of sleep, activity, HRV and inverted stress contributes up to 25
/// points relative to its target ceiling.
pub fn health_score(
    avg_sleep: f64,
    avg_steps: f64,
    avg_hrv: f64,
    avg_stress: f64,
    policy: RangePolicy,
) -> i64 {
    let sub_scores = [
        avg_sleep / SLEEP_CEILING_HOURS,
        avg_steps / ACTIVITY_CEILING_STEPS,
        avg_hrv / HRV_CEILING_MS,
        (SCALE_CEILING - avg_stress) / SCALE_CEILING,
    ];

    let total: f64 = sub_scores
        .iter()
        .map(|ratio| policy.apply(ratio * SUB_SCORE_MAX, 0.0, SUB_SCORE_MAX))
        .sum();

    round_half_up(total) as i64
}

/// Health score from a set of window averages
pub fn score_from_averages(averages: &WindowAverages, policy: RangePolicy) -> i64 {
    health_score(
        averages.sleep_hours,
        averages.steps,
        averages.hrv_ms,
        averages.stress,
        policy,
    )
}

/// Points gained relative to the reference score
pub fn score_gain(score: i64, reference: i64) -> i64 {
    score - reference
}

/// Percentage change from `baseline` to `current`.
pub fn improvement_percent(baseline: f64, current: f64) -> Result<f64, RoiError> {
    if baseline == 0.0 || !baseline.is_finite() {
        return Err(RoiError::DivisionByZero(format!("{baseline}")));
    }
    Ok((current - baseline) / baseline * 100.0)
}

/// Improvement for a tracked metric, inverted where lower is better
pub fn metric_improvement(kind: MetricKind, current: f64) -> Result<f64, RoiError> {
    let change = improvement_percent(kind.baseline(), current)
        .map_err(|_| RoiError::DivisionByZero(kind.label().to_string()))?;
    if kind.lower_is_better() {
        Ok(-change)
    } else {
        Ok(change)
    }
}

/// Five normalized percentages for the radar chart
pub fn radar_profile(
    avg_sleep: f64,
    avg_steps: f64,
    avg_hrv: f64,
    avg_energy: f64,
    avg_stress: f64,
    policy: RangePolicy,
) -> Vec<RadarPoint> {
    [
        (RadarCategory::Sleep, avg_sleep / SLEEP_CEILING_HOURS),
        (RadarCategory::Activity, avg_steps / ACTIVITY_CEILING_STEPS),
        (RadarCategory::Recovery, avg_hrv / HRV_CEILING_MS),
        (RadarCategory::Energy, avg_energy / SCALE_CEILING),
        (
            RadarCategory::MentalHealth,
            (SCALE_CEILING - avg_stress) / SCALE_CEILING,
        ),
    ]
    .into_iter()
    .map(|(category, ratio)| RadarPoint {
        category,
        value: policy.apply(ratio * 100.0, 0.0, 100.0),
    })
    .collect()
}

/// Radar profile from a set of window averages
pub fn radar_from_averages(averages: &WindowAverages, policy: RangePolicy) -> Vec<RadarPoint> {
    radar_profile(
        averages.sleep_hours,
        averages.steps,
        averages.hrv_ms,
        averages.energy,
        averages.stress,
        policy,
    )
}

/// Baseline comparison for each tracked metric
pub fn roi_metrics(averages: &WindowAverages) -> Result<Vec<DerivedMetric>, RoiError> {
    MetricKind::ALL
        .iter()
        .map(|&kind| -> Result<DerivedMetric, RoiError> {
            let current = averages.get(kind.field());
            Ok(DerivedMetric {
                metric: kind,
                label: kind.label().to_string(),
                baseline: kind.baseline(),
                current,
                unit: kind.unit().to_string(),
                improvement_percent: metric_improvement(kind, current)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_samples(count: u32) -> Vec<HealthSample> {
        (1..=count)
            .map(|day| HealthSample {
                day,
                sleep_hours: 6.0 + day as f64 * 0.1,
                steps: 4000.0 + day as f64 * 100.0,
                hrv_ms: 40.0 + day as f64,
                stress: 8.0 - day as f64 * 0.1,
                energy: 5.0 + day as f64 * 0.05,
            })
            .collect()
    }

    #[test]
    fn test_rolling_average_uses_exactly_trailing_window() {
        let samples = make_samples(30);
        let avg = rolling_average(&samples, 7, SampleField::Hrv).unwrap();

        // Days 24..=30 -> HRV 64..=70, mean 67
        assert!((avg - 67.0).abs() < 1e-9);

        let six: f64 = samples[24..].iter().map(|s| s.hrv_ms).sum::<f64>() / 6.0;
        let eight: f64 = samples[22..].iter().map(|s| s.hrv_ms).sum::<f64>() / 8.0;
        assert!((avg - six).abs() > 1e-6);
        assert!((avg - eight).abs() > 1e-6);
    }

    #[test]
    fn test_rolling_average_insufficient_history() {
        let samples = make_samples(6);
        let result = rolling_average(&samples, 7, SampleField::Sleep);

        match result {
            Err(RoiError::InsufficientHistory {
                required,
                available,
            }) => {
                assert_eq!(required, 7);
                assert_eq!(available, 6);
            }
            other => panic!("expected InsufficientHistory, got {other:?}"),
        }

        assert!(rolling_average(&samples, 0, SampleField::Sleep).is_err());
    }

    #[test]
    fn test_health_score_formula() {
        // 25*(7.2/8) + 25*(7500/10000) + 25*(56/70) + 25*(5/10) = 22.5 + 18.75 + 20 + 12.5 = 73.75
        let score = health_score(7.2, 7500.0, 56.0, 5.0, RangePolicy::Saturate);
        assert_eq!(score, 74);

        // Perfect inputs hit 100
        assert_eq!(health_score(8.0, 10000.0, 70.0, 0.0, RangePolicy::Saturate), 100);
    }

    #[test]
    fn test_health_score_monotonic_in_each_input() {
        let policies = [RangePolicy::Saturate, RangePolicy::Passthrough];
        for policy in policies {
            let base = health_score(7.0, 6000.0, 55.0, 5.0, policy);

            for step in 1..20 {
                let d = step as f64;
                assert!(health_score(7.0 + d * 0.2, 6000.0, 55.0, 5.0, policy) >= base);
                assert!(health_score(7.0, 6000.0 + d * 300.0, 55.0, 5.0, policy) >= base);
                assert!(health_score(7.0, 6000.0, 55.0 + d * 2.0, 5.0, policy) >= base);
                // Lower stress never lowers the score
                assert!(health_score(7.0, 6000.0, 55.0, 5.0 - d * 0.25, policy) >= base);
            }
        }
    }

    #[test]
    fn test_health_score_saturates_out_of_range() {
        // 12h of sleep and 20k steps cannot push a sub-score past 25
        let saturated = health_score(12.0, 20000.0, 70.0, 0.0, RangePolicy::Saturate);
        assert_eq!(saturated, 100);

        let passthrough = health_score(12.0, 20000.0, 70.0, 0.0, RangePolicy::Passthrough);
        assert_eq!(passthrough, 138);

        // Stress above 10 cannot go negative when saturated
        assert_eq!(health_score(0.0, 0.0, 0.0, 12.0, RangePolicy::Saturate), 0);
        assert_eq!(health_score(0.0, 0.0, 0.0, 12.0, RangePolicy::Passthrough), -5);
    }

    #[test]
    fn test_improvement_percent() {
        assert_eq!(improvement_percent(6.5, 6.5).unwrap(), 0.0);
        assert_eq!(improvement_percent(5000.0, 5500.0).unwrap().round(), 10.0);
        assert!((improvement_percent(50.0, 40.0).unwrap() + 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_improvement_percent_zero_baseline() {
        assert!(matches!(
            improvement_percent(0.0, 5.0),
            Err(RoiError::DivisionByZero(_))
        ));
        assert!(improvement_percent(f64::NAN, 5.0).is_err());
    }

    #[test]
    fn test_stress_improvement_is_inverted() {
        // Stress 5.6 vs baseline 7 is a 20% improvement
        let improvement = metric_improvement(MetricKind::Stress, 5.6).unwrap();
        assert!((improvement - 20.0).abs() < 1e-9);

        let improvement = metric_improvement(MetricKind::Sleep, 7.8).unwrap();
        assert!((improvement - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_radar_at_ceiling_is_100() {
        let radar = radar_profile(8.0, 10000.0, 70.0, 10.0, 0.0, RangePolicy::Saturate);

        assert_eq!(radar.len(), 5);
        for point in &radar {
            assert!((point.value - 100.0).abs() < 1e-9, "{:?}", point);
        }
        assert_eq!(radar[1].category, RadarCategory::Activity);
        assert_eq!(radar[4].category, RadarCategory::MentalHealth);
    }

    #[test]
    fn test_radar_policy() {
        let saturated = radar_profile(9.0, 12000.0, 35.0, 5.0, 11.0, RangePolicy::Saturate);
        assert_eq!(saturated[0].value, 100.0);
        assert_eq!(saturated[1].value, 100.0);
        assert!((saturated[2].value - 50.0).abs() < 1e-9);
        assert_eq!(saturated[4].value, 0.0);

        let raw = radar_profile(9.0, 12000.0, 35.0, 5.0, 11.0, RangePolicy::Passthrough);
        assert!((raw[1].value - 120.0).abs() < 1e-9);
        assert!(raw[4].value < 0.0);
    }

    #[test]
    fn test_roi_metrics() {
        let averages = WindowAverages {
            sleep_hours: 7.8,
            steps: 6000.0,
            hrv_ms: 60.0,
            stress: 5.6,
            energy: 7.0,
            window: 7,
        };

        let metrics = roi_metrics(&averages).unwrap();
        assert_eq!(metrics.len(), 4);

        let rounded: Vec<i64> = metrics.iter().map(|m| m.rounded_improvement()).collect();
        assert_eq!(rounded, vec![20, 20, 20, 20]);
        assert_eq!(metrics[3].label, "Stress Level");
        assert_eq!(metrics[3].unit, "/10");
        assert_eq!(metrics[3].baseline, 7.0);
    }

    #[test]
    fn test_window_averages() {
        let samples = make_samples(30);
        let averages = window_averages(&samples, 7).unwrap();

        assert_eq!(averages.window, 7);
        assert!((averages.hrv_ms - 67.0).abs() < 1e-9);
        assert!((averages.steps - 6700.0).abs() < 1e-9);
        assert_eq!(score_gain(75, 65), 10);
    }
}
