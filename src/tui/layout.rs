//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap};

use super::runtime::App;
use super::style;
use crate::client::AepBackend;
use crate::view::{
    CHART_TITLE, CHART_VALUE_AXIS, EXPLANATION_HEADING, EXPLANATIONS, FOOTER, ResultsModel,
    SUBTITLE, TITLE, ViewModel,
};

/// Renders the full TUI frame.
pub fn render<B: AepBackend>(frame: &mut Frame, app: &App<B>) {
    render_view(
        frame,
        &app.view.model(),
        app.spinner(),
        app.notice.as_deref(),
    );
}

/// Renders a view model; `spinner` decorates the busy trigger.
pub fn render_view(frame: &mut Frame, model: &ViewModel, spinner: &str, notice: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Length(3), // trigger
            Constraint::Min(8),    // body
            Constraint::Length(2), // footer
        ])
        .split(frame.area());

    render_header(frame, model, chunks[0]);
    render_trigger(frame, model, spinner, chunks[1]);
    render_body(frame, model, chunks[2]);
    render_footer(frame, notice, chunks[3]);
}

/// Badge, title and subtitle.
fn render_header(frame: &mut Frame, model: &ViewModel, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {} ", model.badge),
            Style::default().fg(style::HEADER_FG).bg(style::HEADER_BG),
        )),
        Line::from(Span::styled(
            TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    lines.extend(
        SUBTITLE
            .iter()
            .map(|s| Line::from(Span::styled(*s, Style::default().fg(style::MUTED)))),
    );
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_trigger(frame: &mut Frame, model: &ViewModel, spinner: &str, area: Rect) {
    let (label, button_style) = if model.trigger_enabled {
        (
            format!(" {}  (Enter) ", model.trigger_label),
            Style::default().fg(style::ACCENT).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            format!(" {spinner} {} ", model.trigger_label),
            Style::default().fg(style::DISABLED),
        )
    };
    let width = u16::try_from(label.chars().count() + 2)
        .unwrap_or(area.width)
        .min(area.width);
    let button_area = Rect { width, ..area };
    let button = Paragraph::new(Line::from(Span::styled(label, button_style)))
        .block(Block::default().borders(Borders::ALL).border_style(button_style));
    frame.render_widget(button, button_area);
}

/// Error panel, loading panel, or results; whichever the state calls for.
fn render_body(frame: &mut Frame, model: &ViewModel, area: Rect) {
    if let Some((heading, message)) = &model.error {
        let panel = Paragraph::new(vec![
            Line::from(Span::styled(
                *heading,
                Style::default().fg(style::ERROR).add_modifier(Modifier::BOLD),
            )),
            Line::from(message.as_str()),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(style::ERROR)),
        );
        frame.render_widget(panel, Rect { height: area.height.min(5), ..area });
        return;
    }

    if let Some((text, hint)) = model.loading {
        let panel = Paragraph::new(vec![
            Line::from(text),
            Line::from(Span::styled(hint, Style::default().fg(style::MUTED))),
        ])
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(panel, Rect { height: area.height.min(4), ..area });
        return;
    }

    if let Some(results) = &model.results {
        render_results(frame, results, area);
    }
}

fn render_results(frame: &mut Frame, results: &ResultsModel, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // cards
            Constraint::Min(6),    // histogram
            Constraint::Length(1), // caption
            Constraint::Length(8), // explanation
        ])
        .split(area);

    render_cards(frame, results, chunks[0]);
    render_histogram(frame, results, chunks[1]);

    let mut caption = vec![Span::styled(
        results.caption.as_str(),
        Style::default().fg(style::MUTED),
    )];
    for (label, value) in &results.extras {
        caption.push(Span::raw(format!("  {label}: {value}")));
    }
    frame.render_widget(Paragraph::new(Line::from(caption)), chunks[2]);

    let explanation: Vec<Line> = EXPLANATIONS
        .iter()
        .map(|(heading, text)| {
            Line::from(vec![
                Span::styled(
                    format!("{heading}: "),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(*text),
            ])
        })
        .collect();
    let explanation = Paragraph::new(explanation).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(format!(" {EXPLANATION_HEADING} "))
            .borders(Borders::ALL),
    );
    frame.render_widget(explanation, chunks[3]);
}

/// Mean, P50, P90 and uncertainty cards side by side.
fn render_cards(frame: &mut Frame, results: &ResultsModel, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (card, chunk) in results.cards.iter().zip(chunks.iter()) {
        let widget = Paragraph::new(Line::from(Span::styled(
            card.display(),
            Style::default().fg(style::VALUE).add_modifier(Modifier::BOLD),
        )))
        .block(
            Block::default()
                .title(format!(" {} ", card.title))
                .borders(Borders::ALL),
        );
        frame.render_widget(widget, *chunk);
    }
}

/// One unlabeled bar per iteration, heights proportional to the values.
///
/// When there are more iterations than columns, consecutive iterations are
/// averaged into one bar each and the chart says so in its bottom border.
fn render_histogram(frame: &mut Frame, results: &ResultsModel, area: Rect) {
    let inner_width = area.width.saturating_sub(2);
    let shown = style::bin_bars(&results.bars, usize::from(inner_width));
    let heights = style::scale_bars(&shown);
    let bars: Vec<Bar> = heights
        .iter()
        .zip(&shown)
        .map(|(&h, &v)| Bar::default().value(h).text_value(format!("{v:.1}")))
        .collect();
    let geometry = style::bar_layout(inner_width, bars.len());

    let mut block = Block::default()
        .title(format!(" {CHART_TITLE} "))
        .title_top(Line::from(format!(" {CHART_VALUE_AXIS} ")).right_aligned())
        .borders(Borders::ALL);
    if shown.len() < results.bars.len() {
        block = block.title_bottom(
            Line::from(format!(
                " {} iterations averaged into {} bars ",
                results.bars.len(),
                shown.len()
            ))
            .right_aligned(),
        );
    }

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(geometry.width)
        .bar_gap(geometry.gap)
        .bar_style(Style::default().fg(style::ACCENT))
        .value_style(Style::default().fg(style::HEADER_FG).bg(style::ACCENT));
    frame.render_widget(chart, area);
}

/// Attribution plus keybinding hints or the last notice.
fn render_footer(frame: &mut Frame, notice: Option<&str>, area: Rect) {
    let hint = notice.map_or_else(
        || " Enter/r:Run  s:Save CSV  q:Quit".to_string(),
        |n| format!(" {n}"),
    );
    let footer = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(" {}  |  {}", FOOTER[0], FOOTER[1]),
            Style::default().fg(style::MUTED),
        )),
        Line::from(Span::styled(hint, Style::default().fg(style::MUTED))),
    ]);
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::view::{DEMO_BADGE, ERROR_HEADING, LOADING_TEXT, ViewState};

    fn draw(state: &ViewState) -> String {
        let mut terminal =
            Terminal::new(TestBackend::new(120, 40)).expect("test terminal should build");
        let model = ViewModel::from(state);
        terminal
            .draw(|frame| render_view(frame, &model, "|", None))
            .expect("draw should succeed");
        let buffer = terminal.backend().buffer();
        let width = usize::from(buffer.area.width);
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Draws only the histogram for `n` equal iterations and returns the
    /// number of full cells in its top bar row plus the bottom border text.
    fn draw_histogram(n: usize, width: u16) -> (usize, String) {
        let mut terminal =
            Terminal::new(TestBackend::new(width, 10)).expect("test terminal should build");
        let model = ViewModel::from(&ViewState::Succeeded(AnalysisResult {
            distribution: Some(vec![10.0; n]),
            ..AnalysisResult::default()
        }));
        let results = model.results.expect("results should render");
        terminal
            .draw(|frame| render_histogram(frame, &results, frame.area()))
            .expect("draw should succeed");
        let buffer = terminal.backend().buffer();
        let full = (0..width)
            .filter(|&x| buffer[(x, 1)].symbol() == "█")
            .count();
        let border = (0..width).map(|x| buffer[(x, 9)].symbol()).collect();
        (full, border)
    }

    #[test]
    fn idle_screen_shows_demo_badge_and_trigger() {
        let screen = draw(&ViewState::Idle);
        assert!(screen.contains(DEMO_BADGE));
        assert!(screen.contains("Run Demo Analysis"));
        assert!(!screen.contains("Mean AEP"));
    }

    #[test]
    fn loading_screen_shows_busy_trigger_and_panel() {
        let screen = draw(&ViewState::Loading);
        assert!(screen.contains("| Processing..."));
        assert!(screen.contains(LOADING_TEXT));
    }

    #[test]
    fn failed_screen_shows_error_panel_only() {
        let screen = draw(&ViewState::Failed("Failed to fetch".to_string()));
        assert!(screen.contains(ERROR_HEADING));
        assert!(screen.contains("Failed to fetch"));
        assert!(!screen.contains("Mean AEP"));
    }

    #[test]
    fn succeeded_screen_shows_cards_and_caption() {
        let screen = draw(&ViewState::Succeeded(AnalysisResult {
            aep_gwh_mean: Some(12.345),
            aep_gwh_p50: Some(12.1),
            aep_gwh_p90: Some(10.8),
            uncertainty_pct: Some(4.567),
            distribution: Some(vec![1.0, 5.0, 9.0, 5.0, 1.0]),
            ..AnalysisResult::default()
        }));
        assert!(screen.contains("Monte Carlo Iterations: 5"));
        for value in ["12.35 GWh", "12.10 GWh", "10.80 GWh", "4.57 %"] {
            assert!(screen.contains(value), "missing {value}");
        }
        assert!(screen.contains("across 5 Monte Carlo simulations"));
        assert!(screen.contains(CHART_TITLE));
        // Bar labels keep one decimal.
        assert!(screen.contains("9.0") && screen.contains("5.0"));
    }

    #[test]
    fn every_iteration_gets_a_bar_up_to_the_chart_width() {
        for n in [1, 5, 50, 100, 118] {
            let (full, border) = draw_histogram(n, 120);
            let expected = n * usize::from(style::bar_layout(118, n).width);
            assert_eq!(full, expected, "n={n}");
            assert!(!border.contains("averaged"), "n={n}");
        }
    }

    #[test]
    fn wide_distributions_are_binned_with_a_note() {
        let (full, border) = draw_histogram(500, 120);
        assert_eq!(full, 100);
        assert!(border.contains("500 iterations averaged into 100 bars"));
    }
}
