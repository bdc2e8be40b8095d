//! Key insights
//!
//! Short plain-language messages summarizing how the tracked metrics moved
//! against their baselines.

use crate::types::{DerivedMetric, MetricKind};
use serde::{Deserialize, Serialize};

/// Whether an insight reports progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightTone {
    Positive,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub metric: MetricKind,
    pub tone: InsightTone,
    pub headline: String,
    pub message: String,
}

/// Build insights for sleep, activity and HRV from the derived metrics
pub fn key_insights(metrics: &[DerivedMetric]) -> Vec<Insight> {
    metrics
        .iter()
        .filter_map(|metric| match metric.metric {
            MetricKind::Sleep => Some(sleep_insight(metric)),
            MetricKind::Activity => Some(activity_insight(metric)),
            MetricKind::Hrv => Some(recovery_insight(metric)),
            MetricKind::Stress => None,
        })
        .collect()
}

fn sleep_insight(metric: &DerivedMetric) -> Insight {
    let pct = metric.rounded_improvement();
    if metric.is_improving() {
        Insight {
            metric: metric.metric,
            tone: InsightTone::Positive,
            headline: "Great progress!".to_string(),
            message: format!(
                "Your sleep quality has improved by {pct}% since starting your health investments."
            ),
        }
    } else {
        Insight {
            metric: metric.metric,
            tone: InsightTone::Neutral,
            headline: "Sleep holding steady:".to_string(),
            message: format!(
                "Your sleep has changed by {}% against the {} {} baseline.",
                pct, metric.baseline, metric.unit
            ),
        }
    }
}

fn activity_insight(metric: &DerivedMetric) -> Insight {
    let steps = format_thousands(metric.current);
    let baseline = format_thousands(metric.baseline);
    if metric.current > metric.baseline {
        Insight {
            metric: metric.metric,
            tone: InsightTone::Positive,
            headline: "Activity trending up:".to_string(),
            message: format!(
                "You're averaging {steps} steps per day, which is above the baseline of {baseline} steps."
            ),
        }
    } else {
        Insight {
            metric: metric.metric,
            tone: InsightTone::Neutral,
            headline: "Activity below baseline:".to_string(),
            message: format!(
                "You're averaging {steps} steps per day, which is not above the baseline of {baseline} steps."
            ),
        }
    }
}

fn recovery_insight(metric: &DerivedMetric) -> Insight {
    let pct = metric.rounded_improvement();
    if metric.is_improving() {
        Insight {
            metric: metric.metric,
            tone: InsightTone::Positive,
            headline: "Recovery improving:".to_string(),
            message: format!(
                "Your HRV has increased by {pct}%, indicating better stress management and recovery."
            ),
        }
    } else {
        Insight {
            metric: metric.metric,
            tone: InsightTone::Neutral,
            headline: "Recovery needs attention:".to_string(),
            message: format!(
                "Your HRV has changed by {pct}% against baseline; prioritize rest and recovery."
            ),
        }
    }
}

/// Whole number with comma thousands separators (6,432)
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if rounded < 0 {
        format!("-{out}")
    } else {
        out
    }
}
