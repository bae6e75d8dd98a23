//! Analysis view: run state and its render model.
//!
//! [`AnalysisView`] owns the [`ViewState`] and is the only place it changes.
//! Front ends (TUI, headless report) draw from [`ViewModel`], which is a pure
//! function of the state.

use tracing::{debug, warn};

use crate::analysis::{AnalysisResult, format_metric, format_with_unit};
use crate::client::RunError;

/// Header title, shown in every state.
pub const TITLE: &str = "OpenOA Monte Carlo AEP Demo";
/// Header subtitle lines.
pub const SUBTITLE: [&str; 2] = [
    "Estimate long-term Annual Energy Production (AEP) using the Monte Carlo method.",
    "Demonstration using the \"La Haute Borne\" wind plant dataset.",
];
/// Badge shown until a run succeeds.
pub const DEMO_BADGE: &str = "OpenOA Demo Mode";
/// Trigger label when a run can be started.
pub const RUN_LABEL: &str = "Run Demo Analysis";
/// Trigger label while a request is in flight.
pub const BUSY_LABEL: &str = "Processing...";
/// Error panel heading.
pub const ERROR_HEADING: &str = "Analysis Failed";
/// Loading panel text.
pub const LOADING_TEXT: &str = "Running simulations...";
/// Loading panel hint.
pub const LOADING_HINT: &str =
    "Processing ~13 months of SCADA data (Optimized for Demo Stability).";
/// Histogram title.
pub const CHART_TITLE: &str = "AEP Distribution (GWh)";
/// Value-axis label of the histogram.
pub const CHART_VALUE_AXIS: &str = "Frequency";
/// Explanation section heading.
pub const EXPLANATION_HEADING: &str = "Understanding the Metrics";
/// Metric explanations as `(heading, text)`.
pub const EXPLANATIONS: [(&str, &str); 4] = [
    (
        "Mean AEP (GWh)",
        "Average annual energy production across all Monte Carlo simulations.",
    ),
    (
        "P50 AEP",
        "Median expected annual production. There is a 50% probability actual production will exceed this value.",
    ),
    (
        "P90 AEP",
        "Conservative estimate. There is a 90% probability actual production will exceed this value.",
    ),
    (
        "Uncertainty (%)",
        "Relative variability of results, calculated as (standard deviation / mean x 100).",
    ),
];
/// Footer lines.
pub const FOOTER: [&str; 2] = [
    "Powered by OpenOA (NREL)",
    "Demo Dataset: La Haute Borne, France (2014-2015)",
];

/// Run lifecycle of the view.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    /// No run has been started.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last run returned a result.
    Succeeded(AnalysisResult),
    /// The last run failed with this message.
    Failed(String),
}

/// Owner of the view state and its transitions.
#[derive(Debug, Default)]
pub struct AnalysisView {
    state: ViewState,
    runs_started: u64,
}

impl AnalysisView {
    /// Creates an idle view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Number of runs started so far.
    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    /// Whether the trigger control is enabled.
    pub fn can_trigger(&self) -> bool {
        !self.is_loading()
    }

    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    /// Successful result, if the last run succeeded.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            ViewState::Succeeded(r) => Some(r),
            _ => None,
        }
    }

    /// Enters `Loading`, discarding any previous result or error.
    ///
    /// Returns `false` without changing anything while a run is already in
    /// flight; the caller must then not issue a request.
    pub fn begin_run(&mut self) -> bool {
        if self.is_loading() {
            debug!("run already in flight, trigger ignored");
            return false;
        }
        self.state = ViewState::Loading;
        self.runs_started += 1;
        debug!(run = self.runs_started, "run started");
        true
    }

    /// Moves from `Loading` to the terminal state for `outcome`.
    ///
    /// Outcomes arriving when no run is in flight are dropped.
    pub fn complete(&mut self, outcome: Result<AnalysisResult, RunError>) {
        if !self.is_loading() {
            warn!("run outcome received with no run in flight, ignored");
            return;
        }
        self.state = match outcome {
            Ok(result) => ViewState::Succeeded(result),
            Err(err) => ViewState::Failed(err.to_string()),
        };
    }

    /// Render model of the current state.
    pub fn model(&self) -> ViewModel {
        ViewModel::from(&self.state)
    }
}

/// One metric card.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    /// Card heading, e.g. `"Mean AEP"`.
    pub title: &'static str,
    /// Two-decimal value, empty when absent.
    pub value: String,
    /// Unit suffix.
    pub unit: &'static str,
}

impl MetricCard {
    fn new(title: &'static str, value: Option<f64>, unit: &'static str) -> Self {
        Self {
            title,
            value: format_metric(value),
            unit,
        }
    }

    /// Value and unit as displayed, e.g. `"12.35 GWh"`.
    pub fn display(&self) -> String {
        if self.value.is_empty() {
            self.unit.to_string()
        } else {
            format!("{} {}", self.value, self.unit)
        }
    }
}

/// Results region of a succeeded run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsModel {
    /// Mean, P50, P90 and uncertainty cards, in display order.
    pub cards: [MetricCard; 4],
    /// Bar heights, one per iteration, indexed by position.
    pub bars: Vec<f64>,
    /// Caption under the histogram.
    pub caption: String,
    /// Additional statistics and the run status reported by the service, as `(label, display)`.
    pub extras: Vec<(&'static str, String)>,
}

impl ResultsModel {
    fn from_result(result: &AnalysisResult) -> Self {
        let mut extras = Vec::new();
        if result.aep_gwh_p10.is_some() {
            extras.push(("P10 AEP", format_with_unit(result.aep_gwh_p10, "GWh")));
        }
        if result.std_dev.is_some() {
            extras.push(("Std dev", format_with_unit(result.std_dev, "GWh")));
        }
        if let Some(status) = &result.status {
            extras.push(("Status", status.clone()));
        }

        Self {
            cards: [
                MetricCard::new("Mean AEP", result.aep_gwh_mean, "GWh"),
                MetricCard::new("P50 AEP", result.aep_gwh_p50, "GWh"),
                MetricCard::new("P90 AEP", result.aep_gwh_p90, "GWh"),
                MetricCard::new("Uncertainty", result.uncertainty_pct, "%"),
            ],
            bars: result.distribution().to_vec(),
            caption: format!(
                "Distribution of AEP values across {} Monte Carlo simulations (Demo Mode).",
                result.iteration_count()
            ),
            extras,
        }
    }
}

/// Everything a front end needs to draw the view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    /// Header badge text.
    pub badge: String,
    /// Trigger control label.
    pub trigger_label: &'static str,
    /// Whether the trigger control accepts input.
    pub trigger_enabled: bool,
    /// Error panel `(heading, message)`.
    pub error: Option<(&'static str, String)>,
    /// Loading panel `(text, hint)`.
    pub loading: Option<(&'static str, &'static str)>,
    /// Results region.
    pub results: Option<ResultsModel>,
}

impl From<&ViewState> for ViewModel {
    fn from(state: &ViewState) -> Self {
        let mut model = Self {
            badge: DEMO_BADGE.to_string(),
            trigger_label: RUN_LABEL,
            trigger_enabled: true,
            error: None,
            loading: None,
            results: None,
        };
        match state {
            ViewState::Idle => {}
            ViewState::Loading => {
                model.trigger_label = BUSY_LABEL;
                model.trigger_enabled = false;
                model.loading = Some((LOADING_TEXT, LOADING_HINT));
            }
            ViewState::Failed(message) => {
                model.error = Some((ERROR_HEADING, message.clone()));
            }
            ViewState::Succeeded(result) => {
                model.badge = format!(
                    "Monte Carlo Iterations: {} (Optimized for demo stability)",
                    result.iteration_count()
                );
                model.results = Some(ResultsModel::from_result(result));
            }
        }
        model
    }
}
