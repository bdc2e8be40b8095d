//! Dashboard state and view projections
//!
//! `DashboardState` owns the sample window and the investment ledger. All
//! mutation goes through [`DashboardState::dispatch`]; every view is a pure
//! projection recomputed from state on each call.

use crate::aggregator::{
    radar_from_averages, roi_metrics, score_from_averages, score_gain, window_averages,
};
use crate::config::DashboardConfig;
use crate::error::RoiError;
use crate::insights::{key_insights, Insight};
use crate::ledger::InvestmentLedger;
use crate::source::{validate_samples, HealthSampleSource};
use crate::types::{
    DerivedMetric, HealthSample, Investment, MetricKind, NewInvestment, RadarPoint, SampleField,
    WindowAverages,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Which tab of the dashboard is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Dashboard,
    Investments,
    Trends,
    Insights,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Dashboard,
        ViewMode::Investments,
        ViewMode::Trends,
        ViewMode::Insights,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Dashboard => "dashboard",
            ViewMode::Investments => "investments",
            ViewMode::Trends => "trends",
            ViewMode::Insights => "insights",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RoiError::ParseError(format!("unknown view mode: {s}")))
    }
}

/// State mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    SelectView(ViewMode),
    ToggleAddForm,
    AddInvestment(NewInvestment),
    RemoveInvestment(u64),
}

/// One metric card on the main dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    pub metric: MetricKind,
    pub title: String,
    pub value: f64,
    pub unit: String,
    pub subtitle: String,
    /// Rounded improvement against baseline (percent)
    pub trend_percent: i64,
}

/// A single-metric series across the sample window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub field: SampleField,
    pub label: String,
    pub points: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub day: u32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub cards: Vec<MetricCard>,
    pub radar: Vec<RadarPoint>,
    pub trends: Vec<TrendSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentsView {
    pub total_monthly_cost: f64,
    pub total_weekly_time: f64,
    pub score_gain: i64,
    pub investments: Vec<Investment>,
    pub add_form_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendsView {
    pub activity: TrendSeries,
    pub recovery: TrendSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsView {
    pub monthly_investment: f64,
    pub score_gain: i64,
    pub metrics: Vec<DerivedMetric>,
    pub insights: Vec<Insight>,
}

/// Content of the currently selected view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ViewContent {
    Dashboard(DashboardView),
    Investments(InvestmentsView),
    Trends(TrendsView),
    Insights(InsightsView),
}

/// Header plus the selected view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewProjection {
    pub health_score: i64,
    pub averages: WindowAverages,
    pub content: ViewContent,
}

/// Dashboard state for one session
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    samples: Vec<HealthSample>,
    ledger: InvestmentLedger,
    view: ViewMode,
    add_form_visible: bool,
    config: DashboardConfig,
}

impl DashboardState {
    /// Fetch the sample window from `source` and start with the starter
    /// investments on the main dashboard.
    pub fn new(source: &dyn HealthSampleSource, config: DashboardConfig) -> Result<Self, RoiError> {
        let samples = source.fetch_window(config.window_days)?;
        Self::from_parts(samples, InvestmentLedger::with_starter_set(), config)
    }

    pub fn from_parts(
        samples: Vec<HealthSample>,
        ledger: InvestmentLedger,
        config: DashboardConfig,
    ) -> Result<Self, RoiError> {
        config.validate()?;
        validate_samples(&samples)?;
        if samples.len() < config.rolling_window {
            return Err(RoiError::InsufficientHistory {
                required: config.rolling_window,
                available: samples.len(),
            });
        }

        Ok(Self {
            samples,
            ledger,
            view: ViewMode::default(),
            add_form_visible: false,
            config,
        })
    }

    /// Replace the investment ledger
    pub fn with_ledger(mut self, ledger: InvestmentLedger) -> Self {
        self.ledger = ledger;
        self
    }

    /// Apply a mutation
    pub fn dispatch(&mut self, action: Action) -> Result<(), RoiError> {
        match action {
            Action::SelectView(view) => {
                debug!(from = %self.view, to = %view, "select view");
                self.view = view;
            }
            Action::ToggleAddForm => {
                self.add_form_visible = !self.add_form_visible;
            }
            Action::AddInvestment(record) => {
                self.ledger.add(record)?;
                self.add_form_visible = false;
            }
            Action::RemoveInvestment(id) => {
                self.ledger.remove(id)?;
            }
        }
        Ok(())
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn add_form_visible(&self) -> bool {
        self.add_form_visible
    }

    pub fn samples(&self) -> &[HealthSample] {
        &self.samples
    }

    pub fn ledger(&self) -> &InvestmentLedger {
        &self.ledger
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Trailing averages at display precision
    pub fn averages(&self) -> Result<WindowAverages, RoiError> {
        Ok(window_averages(&self.samples, self.config.rolling_window)?.rounded())
    }

    pub fn health_score(&self) -> Result<i64, RoiError> {
        Ok(score_from_averages(
            &self.averages()?,
            self.config.range_policy,
        ))
    }

    /// Project the current view
    pub fn project(&self) -> Result<ViewProjection, RoiError> {
        self.project_view(self.view)
    }

    /// Project any view without changing the selection
    pub fn project_view(&self, view: ViewMode) -> Result<ViewProjection, RoiError> {
        let averages = self.averages()?;
        let health_score = score_from_averages(&averages, self.config.range_policy);
        let gain = score_gain(health_score, self.config.reference_score);

        let content = match view {
            ViewMode::Dashboard => ViewContent::Dashboard(DashboardView {
                cards: metric_cards(&roi_metrics(&averages)?),
                radar: radar_from_averages(&averages, self.config.range_policy),
                trends: vec![
                    self.series(SampleField::Sleep, "Sleep (hrs)"),
                    self.series(SampleField::Energy, "Energy (/10)"),
                    self.series(SampleField::Stress, "Stress (/10)"),
                ],
            }),
            ViewMode::Investments => ViewContent::Investments(InvestmentsView {
                total_monthly_cost: self.ledger.total_monthly_cost(),
                total_weekly_time: self.ledger.total_weekly_time(),
                score_gain: gain,
                investments: self.ledger.as_slice().to_vec(),
                add_form_visible: self.add_form_visible,
            }),
            ViewMode::Trends => ViewContent::Trends(TrendsView {
                activity: self.series(SampleField::Steps, "Steps"),
                recovery: self.series(SampleField::Hrv, "HRV (ms)"),
            }),
            ViewMode::Insights => {
                let metrics = roi_metrics(&averages)?;
                let insights = key_insights(&metrics);
                ViewContent::Insights(InsightsView {
                    monthly_investment: self.ledger.total_monthly_cost(),
                    score_gain: gain,
                    metrics,
                    insights,
                })
            }
        };

        Ok(ViewProjection {
            health_score,
            averages,
            content,
        })
    }

    fn series(&self, field: SampleField, label: &str) -> TrendSeries {
        TrendSeries {
            field,
            label: label.to_string(),
            points: self
                .samples
                .iter()
                .map(|s| TrendPoint {
                    day: s.day,
                    value: s.value(field),
                })
                .collect(),
        }
    }
}

fn metric_cards(metrics: &[DerivedMetric]) -> Vec<MetricCard> {
    metrics
        .iter()
        .map(|metric| {
            let (title, unit, subtitle) = match metric.metric {
                MetricKind::Sleep => ("Avg Sleep", "hrs", "Last 7 days"),
                MetricKind::Activity => ("Daily Steps", "steps", "7-day average"),
                MetricKind::Hrv => ("HRV", "ms", "Recovery metric"),
                MetricKind::Stress => ("Stress Level", "/10", "Lower is better"),
            };
            MetricCard {
                metric: metric.metric,
                title: title.to_string(),
                value: metric.current,
                unit: unit.to_string(),
                subtitle: subtitle.to_string(),
                trend_percent: metric.rounded_improvement(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RangePolicy;
    use crate::source::SyntheticSource;
    use pretty_assertions::assert_eq;

    fn make_state() -> DashboardState {
        DashboardState::new(&SyntheticSource::new(42), DashboardConfig::default()).unwrap()
    }

    fn flat_samples(days: u32) -> Vec<HealthSample> {
        (1..=days)
            .map(|day| HealthSample {
                day,
                sleep_hours: 7.8,
                steps: 6000.0,
                hrv_ms: 60.0,
                stress: 5.6,
                energy: 7.0,
            })
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let state = make_state();

        assert_eq!(state.view(), ViewMode::Dashboard);
        assert!(!state.add_form_visible());
        assert_eq!(state.samples().len(), 30);
        assert_eq!(state.ledger().len(), 3);
    }

    #[test]
    fn test_select_view_does_not_mutate_data() {
        let mut state = make_state();
        let samples = state.samples().to_vec();
        let ledger = state.ledger().clone();

        for mode in ViewMode::ALL {
            state.dispatch(Action::SelectView(mode)).unwrap();
            assert_eq!(state.view(), mode);
            state.project().unwrap();

            assert_eq!(state.samples(), samples.as_slice());
            assert_eq!(state.ledger(), &ledger);
        }
    }

    #[test]
    fn test_add_hides_form_and_remove_restores() {
        let mut state = make_state();
        let before = state.ledger().as_slice().to_vec();

        state.dispatch(Action::ToggleAddForm).unwrap();
        assert!(state.add_form_visible());

        state
            .dispatch(Action::AddInvestment(NewInvestment::new(
                "Sleep Tracker",
                10.0,
                0.5,
                "Sleep",
            )))
            .unwrap();
        assert!(!state.add_form_visible());
        assert_eq!(state.ledger().len(), 4);

        let id = state.ledger().iter().last().map(|i| i.id).unwrap();
        state.dispatch(Action::RemoveInvestment(id)).unwrap();
        assert_eq!(state.ledger().as_slice(), before.as_slice());
    }

    #[test]
    fn test_failed_add_keeps_form_open() {
        let mut state = make_state();
        state.dispatch(Action::ToggleAddForm).unwrap();

        let result = state.dispatch(Action::AddInvestment(NewInvestment::new(
            "Gym", -10.0, 1.0, "Exercise",
        )));
        assert!(matches!(result, Err(RoiError::InvalidInvestment(_))));
        assert!(state.add_form_visible());
        assert_eq!(state.ledger().len(), 3);
    }

    #[test]
    fn test_remove_unknown_investment() {
        let mut state = make_state();
        let result = state.dispatch(Action::RemoveInvestment(404));
        assert!(matches!(result, Err(RoiError::InvestmentNotFound(404))));
    }

    #[test]
    fn test_dashboard_projection() {
        let state = DashboardState::from_parts(
            flat_samples(30),
            InvestmentLedger::with_starter_set(),
            DashboardConfig::default(),
        )
        .unwrap();

        let projection = state.project().unwrap();
        // 25*(7.8/8) + 25*(6000/10000) + 25*(60/70) + 25*(4.4/10) = 24.375 + 15 + 21.43 + 11 = 71.8
        assert_eq!(projection.health_score, 72);

        match projection.content {
            ViewContent::Dashboard(view) => {
                let trends: Vec<i64> = view.cards.iter().map(|c| c.trend_percent).collect();
                assert_eq!(trends, vec![20, 20, 20, 20]);
                assert_eq!(view.cards[0].title, "Avg Sleep");
                assert_eq!(view.radar.len(), 5);
                assert_eq!(view.trends.len(), 3);
                assert_eq!(view.trends[0].points.len(), 30);
            }
            other => panic!("expected dashboard view, got {other:?}"),
        }
    }

    #[test]
    fn test_investments_projection() {
        let mut state = make_state();
        state
            .dispatch(Action::SelectView(ViewMode::Investments))
            .unwrap();

        let projection = state.project().unwrap();
        let score = projection.health_score;
        match projection.content {
            ViewContent::Investments(view) => {
                assert_eq!(view.total_monthly_cost, 250.0);
                assert_eq!(view.total_weekly_time, 5.0);
                assert_eq!(view.score_gain, score - 65);
                assert_eq!(view.investments.len(), 3);
            }
            other => panic!("expected investments view, got {other:?}"),
        }
    }

    #[test]
    fn test_trends_and_insights_projection() {
        let state = make_state();

        match state.project_view(ViewMode::Trends).unwrap().content {
            ViewContent::Trends(view) => {
                assert_eq!(view.activity.field, SampleField::Steps);
                assert_eq!(view.recovery.points.len(), 30);
                assert_eq!(view.recovery.points[29].day, 30);
            }
            other => panic!("expected trends view, got {other:?}"),
        }

        match state.project_view(ViewMode::Insights).unwrap().content {
            ViewContent::Insights(view) => {
                assert_eq!(view.monthly_investment, 250.0);
                assert_eq!(view.metrics.len(), 4);
                assert_eq!(view.insights.len(), 3);
            }
            other => panic!("expected insights view, got {other:?}"),
        }

        // Projecting another view does not change the selection
        assert_eq!(state.view(), ViewMode::Dashboard);
    }

    #[test]
    fn test_long_synthetic_windows() {
        for window_days in [60, 90, 365] {
            let config = DashboardConfig {
                window_days,
                ..Default::default()
            };
            for seed in 0..5 {
                let state = DashboardState::new(&SyntheticSource::new(seed), config.clone())
                    .unwrap_or_else(|e| panic!("seed {seed}, {window_days} days: {e}"));

                assert_eq!(state.samples().len(), window_days);
                match state.project().unwrap().content {
                    ViewContent::Dashboard(view) => {
                        assert_eq!(view.trends[0].points.len(), window_days);
                    }
                    other => panic!("expected dashboard view, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_rejects_short_history() {
        let result = DashboardState::from_parts(
            flat_samples(5),
            InvestmentLedger::new(),
            DashboardConfig {
                window_days: 5,
                rolling_window: 5,
                ..Default::default()
            },
        );
        assert!(result.is_ok());

        let result = DashboardState::from_parts(
            flat_samples(5),
            InvestmentLedger::new(),
            DashboardConfig::default(),
        );
        assert!(matches!(
            result,
            Err(RoiError::InsufficientHistory {
                required: 7,
                available: 5
            })
        ));
    }

    #[test]
    fn test_passthrough_policy_in_projection() {
        let samples: Vec<HealthSample> = (1..=30)
            .map(|day| HealthSample {
                day,
                sleep_hours: 10.0,
                steps: 15000.0,
                hrv_ms: 70.0,
                stress: 0.0,
                energy: 10.0,
            })
            .collect();

        let saturated = DashboardState::from_parts(
            samples.clone(),
            InvestmentLedger::new(),
            DashboardConfig::default(),
        )
        .unwrap();
        assert_eq!(saturated.health_score().unwrap(), 100);

        let passthrough = DashboardState::from_parts(
            samples,
            InvestmentLedger::new(),
            DashboardConfig {
                range_policy: RangePolicy::Passthrough,
                ..Default::default()
            },
        )
        .unwrap();
        // 31.25 + 37.5 + 25 + 25
        assert_eq!(passthrough.health_score().unwrap(), 119);
    }

    #[test]
    fn test_view_mode_parse() {
        assert_eq!("Trends".parse::<ViewMode>().unwrap(), ViewMode::Trends);
        assert_eq!(" insights ".parse::<ViewMode>().unwrap(), ViewMode::Insights);
        assert!("settings".parse::<ViewMode>().is_err());
    }

    #[test]
    fn test_action_json() {
        let action: Action = serde_json::from_str(
            r#"{"type":"add_investment","payload":{"name":"Yoga","monthly_cost":30,"weekly_time_hours":2,"category":"Exercise"}}"#,
        )
        .unwrap();
        assert!(matches!(action, Action::AddInvestment(ref inv) if inv.name == "Yoga"));

        let action: Action =
            serde_json::from_str(r#"{"type":"select_view","payload":"trends"}"#).unwrap();
        assert_eq!(action, Action::SelectView(ViewMode::Trends));

        let action: Action = serde_json::from_str(r#"{"type":"toggle_add_form"}"#).unwrap();
        assert_eq!(action, Action::ToggleAddForm);
    }
}
