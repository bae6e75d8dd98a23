//! Plain-text rendering of the view for headless runs.

use std::fmt::{self, Write};

use crate::view::{
    CHART_TITLE, EXPLANATION_HEADING, EXPLANATIONS, FOOTER, ResultsModel, SUBTITLE, TITLE,
    ViewModel,
};

/// Renders the view model as a text report.
pub fn render_report(model: &ViewModel) -> String {
    let mut out = String::new();
    // Formatting into a `String` cannot fail.
    if write_report(&mut out, model).is_err() {
        out.clear();
    }
    out
}

fn write_report(out: &mut impl Write, model: &ViewModel) -> fmt::Result {
    writeln!(out, "[{}]", model.badge)?;
    writeln!(out, "{TITLE}")?;
    for line in SUBTITLE {
        writeln!(out, "{line}")?;
    }

    if let Some((heading, message)) = &model.error {
        writeln!(out, "\n{heading}\n{message}")?;
    }

    if let Some((text, hint)) = model.loading {
        writeln!(out, "\n{text}\n{hint}")?;
    }

    if let Some(results) = &model.results {
        write_results(out, results)?;
    }

    writeln!(out)?;
    for line in FOOTER {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn write_results(out: &mut impl Write, results: &ResultsModel) -> fmt::Result {
    writeln!(out, "\n--- Results ---")?;
    for card in &results.cards {
        writeln!(out, "{:<12} {}", card.title, card.display())?;
    }
    for (label, value) in &results.extras {
        writeln!(out, "{label:<12} {value}")?;
    }

    writeln!(out, "\n{CHART_TITLE}")?;
    writeln!(out, "bars: {}", results.bars.len())?;
    let min = results.bars.iter().copied().fold(f64::INFINITY, f64::min);
    let max = results.bars.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min.is_finite() && max.is_finite() {
        writeln!(out, "range: {min:.2} .. {max:.2}")?;
    }
    writeln!(out, "{}", results.caption)?;

    writeln!(out, "\n{EXPLANATION_HEADING}")?;
    for (heading, text) in EXPLANATIONS {
        writeln!(out, "  {heading}: {text}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::view::{DEMO_BADGE, ERROR_HEADING, ViewState};

    #[test]
    fn success_report_lists_cards_and_histogram() {
        let state = ViewState::Succeeded(AnalysisResult {
            aep_gwh_mean: Some(12.345),
            aep_gwh_p50: Some(12.1),
            aep_gwh_p90: Some(10.8),
            uncertainty_pct: Some(4.567),
            std_dev: Some(0.4),
            status: Some("success".to_string()),
            distribution: Some(vec![1.0, 5.0, 9.0, 5.0, 1.0]),
            ..AnalysisResult::default()
        });
        let report = render_report(&ViewModel::from(&state));

        assert!(report.contains("Monte Carlo Iterations: 5"));
        assert!(report.contains("Mean AEP     12.35 GWh"));
        assert!(report.contains("Uncertainty  4.57 %"));
        assert!(report.contains("Std dev      0.40 GWh"));
        assert!(report.contains("Status       success"));
        assert!(report.contains("bars: 5"));
        assert!(report.contains("range: 1.00 .. 9.00"));
        assert!(report.contains(EXPLANATION_HEADING));
    }

    #[test]
    fn empty_distribution_has_no_range() {
        let state = ViewState::Succeeded(AnalysisResult::default());
        let report = render_report(&ViewModel::from(&state));
        assert!(report.contains("bars: 0"));
        assert!(!report.contains("range:"));
    }

    #[test]
    fn failure_report_has_no_results() {
        let state = ViewState::Failed("Error: Internal Server Error".to_string());
        let report = render_report(&ViewModel::from(&state));
        assert!(report.contains(DEMO_BADGE));
        assert!(report.contains(ERROR_HEADING));
        assert!(report.contains("Error: Internal Server Error"));
        assert!(!report.contains("--- Results ---"));
    }
}
