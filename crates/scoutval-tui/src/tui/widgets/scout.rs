// Scout widget: real vs. predicted market value.
//
// Banner with the moneyball alert (or why there is none), a comparison table
// coloured by value difference, and an age / market value scatter. Red marks
// underpriced players, blue overpriced; block markers flag high AI estimates.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState,
};
use ratatui::Frame;

use scoutval_core::valuation::service::{
    ComparisonRow, ScoutReport, ScoutStatus, SOLID_PROFESSIONAL_THRESHOLD,
};

use crate::tui::layout::build_scout_layout;
use crate::tui::widgets::compare::{render_message, NO_PLAYERS};
use crate::tui::widgets::{eur_or_dash, num_or_dash};
use crate::tui::{TabId, ViewState};

pub const CAPTION: &str = "Blue/Positive = Overpriced | Red/Negative = Underpriced";

pub const UNDERPRICED: Color = Color::Red;
pub const OVERPRICED: Color = Color::Blue;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(outcome) = &state.scout else {
        render_message(
            frame,
            area,
            "Scout",
            " Press / to compare real market values with the model's estimates.",
            Color::Gray,
        );
        return;
    };

    let title = format!("Scout: \"{}\"", outcome.filter);
    let report = match &outcome.result {
        Err(msg) => {
            render_message(frame, area, &title, &format!(" {msg}"), Color::Red);
            return;
        }
        Ok(report) => report,
    };
    if report.status == ScoutStatus::NoPlayersFound {
        render_message(frame, area, &title, &format!(" {NO_PLAYERS}"), Color::Yellow);
        return;
    }

    let layout = build_scout_layout(area);

    frame.render_widget(
        Paragraph::new(banner_line(report)).block(Block::default().borders(Borders::ALL)),
        layout.banner,
    );

    render_table(
        frame,
        layout.table,
        &format!("{title} ({})", report.rows.len()),
        &report.rows,
        state.scroll(TabId::Scout),
    );
    render_chart(frame, layout.chart, &report.rows);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {CAPTION}"),
            Style::default().fg(Color::Gray),
        ))),
        layout.caption,
    );
}

/// Alert, degraded-model notice, or the all-clear.
pub fn banner_line(report: &ScoutReport) -> Line<'static> {
    if let Some(alert) = &report.alert {
        return Line::from(Span::styled(
            format!(" {}", alert.message()),
            Style::default().fg(UNDERPRICED).add_modifier(Modifier::BOLD),
        ));
    }
    match &report.status {
        ScoutStatus::ModelUnavailable(reason) => Line::from(Span::styled(
            format!(" Valuation unavailable: {reason}"),
            Style::default().fg(Color::Yellow),
        )),
        _ => Line::from(Span::styled(
            " No player is undervalued by more than €5,000,000.",
            Style::default().fg(Color::Gray),
        )),
    }
}

/// Colour for a value difference: negative means the market underprices
/// the player relative to the model.
pub fn difference_color(difference: Option<f64>) -> Color {
    match difference {
        Some(d) if d < 0.0 => UNDERPRICED,
        Some(_) => OVERPRICED,
        None => Color::Gray,
    }
}

fn render_table(frame: &mut Frame, area: Rect, title: &str, rows: &[ComparisonRow], offset: usize) {
    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Age"),
        Cell::from("League"),
        Cell::from("Market Value"),
        Cell::from("AI Predicted"),
        Cell::from("Difference"),
    ])
    .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let body: Vec<Row> = rows
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.record.name.clone()),
                Cell::from(num_or_dash(r.record.age, 0)),
                Cell::from(r.record.competition_id.clone().unwrap_or_else(|| "--".into())),
                Cell::from(eur_or_dash(r.record.market_value_in_eur)),
                Cell::from(eur_or_dash(r.predicted_value)),
                Cell::from(eur_or_dash(r.value_difference))
                    .style(Style::default().fg(difference_color(r.value_difference))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(18),
        Constraint::Length(4),
        Constraint::Length(7),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(14),
    ];

    let table = Table::new(body, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));

    let mut table_state = TableState::default().with_offset(offset);
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Predicted values above this get a heavy marker.
pub const HEAVY_MARKER_THRESHOLD: f64 = SOLID_PROFESSIONAL_THRESHOLD;

/// Scatter points (age, market value in millions of EUR), split by the sign
/// of the value difference and by marker weight.
#[derive(Debug, Default, PartialEq)]
pub struct ScatterSeries {
    pub underpriced: Vec<(f64, f64)>,
    pub underpriced_heavy: Vec<(f64, f64)>,
    pub overpriced: Vec<(f64, f64)>,
    pub overpriced_heavy: Vec<(f64, f64)>,
}

impl ScatterSeries {
    /// Rows missing age, market value or a difference are skipped.
    pub fn from_rows(rows: &[ComparisonRow]) -> Self {
        let mut series = ScatterSeries::default();
        for row in rows {
            let (Some(age), Some(real), Some(predicted), Some(diff)) = (
                row.record.age,
                row.record.market_value_in_eur,
                row.predicted_value,
                row.value_difference,
            ) else {
                continue;
            };
            let point = (age, real / 1e6);
            let heavy = predicted > HEAVY_MARKER_THRESHOLD;
            let bucket = match (diff < 0.0, heavy) {
                (true, false) => &mut series.underpriced,
                (true, true) => &mut series.underpriced_heavy,
                (false, false) => &mut series.overpriced,
                (false, true) => &mut series.overpriced_heavy,
            };
            bucket.push(point);
        }
        series
    }

    fn all(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.underpriced
            .iter()
            .chain(&self.underpriced_heavy)
            .chain(&self.overpriced)
            .chain(&self.overpriced_heavy)
    }
}

/// Axis bounds covering every value, padded so points avoid the frame.
pub fn axis_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return [0.0, 1.0];
    }
    let pad = ((max - min) * 0.05).max(0.5);
    // Non-negative data never gets a negative axis.
    let lo = if min >= 0.0 { (min - pad).max(0.0) } else { min - pad };
    [lo, max + pad]
}

fn render_chart(frame: &mut Frame, area: Rect, rows: &[ComparisonRow]) {
    let series = ScatterSeries::from_rows(rows);

    let x_bounds = axis_bounds(series.all().map(|p| p.0));
    let y_bounds = axis_bounds(series.all().map(|p| p.1));

    let datasets = vec![
        scatter_dataset("Underpriced", Marker::Dot, UNDERPRICED, &series.underpriced),
        scatter_dataset(
            "Underpriced, AI > €10M",
            Marker::Block,
            UNDERPRICED,
            &series.underpriced_heavy,
        ),
        scatter_dataset("Overpriced", Marker::Dot, OVERPRICED, &series.overpriced),
        scatter_dataset(
            "Overpriced, AI > €10M",
            Marker::Block,
            OVERPRICED,
            &series.overpriced_heavy,
        ),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Age vs. market value (€M)"),
        )
        .x_axis(
            Axis::default()
                .title("Age")
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(bound_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title("€M")
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(bound_labels(y_bounds)),
        );

    frame.render_widget(chart, area);
}

fn scatter_dataset<'a>(
    name: &'static str,
    marker: Marker,
    color: Color,
    data: &'a [(f64, f64)],
) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(marker)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(color))
        .data(data)
}

fn bound_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    vec![
        format!("{:.0}", bounds[0]),
        format!("{:.0}", mid),
        format!("{:.0}", bounds[1]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SearchOutcome;
    use crate::tui::widgets::buffer_text;
    use scoutval_core::db::PlayerRecord;
    use scoutval_core::valuation::service::MoneyballAlert;

    fn row(name: &str, real: Option<f64>, predicted: Option<f64>) -> ComparisonRow {
        ComparisonRow {
            record: PlayerRecord {
                age: Some(25.0),
                market_value_in_eur: real,
                ..PlayerRecord::named(name)
            },
            predicted_value: predicted,
            value_difference: real.zip(predicted).map(|(r, p)| r - p),
        }
    }

    fn report(
        rows: Vec<ComparisonRow>,
        status: ScoutStatus,
        alert: Option<MoneyballAlert>,
    ) -> ScoutReport {
        ScoutReport { rows, status, alert }
    }

    fn draw(report: ScoutReport) -> String {
        let backend = ratatui::backend::TestBackend::new(100, 36);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.scout = Some(SearchOutcome {
            filter: "p".into(),
            result: Ok(report),
        });
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn difference_colors() {
        assert_eq!(difference_color(Some(-1.0)), UNDERPRICED);
        assert_eq!(difference_color(Some(0.0)), OVERPRICED);
        assert_eq!(difference_color(Some(3.0)), OVERPRICED);
        assert_eq!(difference_color(None), Color::Gray);
    }

    #[test]
    fn scatter_series_split_by_sign_and_weight() {
        let rows = vec![
            row("Steal", Some(4e6), Some(10e6)),
            row("BigSteal", Some(20e6), Some(40e6)),
            row("Pricey", Some(12e6), Some(10e6)),
            row("BigPricey", Some(90e6), Some(60e6)),
            row("NoValue", None, Some(10e6)),
            row("NoModel", Some(5e6), None),
        ];
        let series = ScatterSeries::from_rows(&rows);
        assert_eq!(series.underpriced, vec![(25.0, 4.0)]);
        assert_eq!(series.underpriced_heavy, vec![(25.0, 20.0)]);
        assert_eq!(series.overpriced, vec![(25.0, 12.0)]);
        assert_eq!(series.overpriced_heavy, vec![(25.0, 90.0)]);
    }

    #[test]
    fn scatter_series_skips_missing_age() {
        let mut r = row("Ageless", Some(4e6), Some(10e6));
        r.record.age = None;
        assert_eq!(ScatterSeries::from_rows(&[r]), ScatterSeries::default());
    }

    #[test]
    fn axis_bounds_cover_values() {
        let [lo, hi] = axis_bounds([2.0, 10.0].into_iter());
        assert!(lo <= 2.0 && hi >= 10.0);
        assert_eq!(axis_bounds(std::iter::empty()), [0.0, 1.0]);
        let [lo, hi] = axis_bounds([3.0].into_iter());
        assert!(lo < 3.0 && hi > 3.0);
    }

    #[test]
    fn banner_prefers_alert() {
        let alert = MoneyballAlert {
            name: "Steal".into(),
            undervalued_by: 6_000_000.0,
        };
        let line = banner_line(&report(Vec::new(), ScoutStatus::Valued, Some(alert)));
        assert_eq!(
            line.spans[0].content.as_ref(),
            " MONEYBALL ALERT: Steal is undervalued by €6,000,000!"
        );
        assert_eq!(line.spans[0].style.fg, Some(UNDERPRICED));
    }

    #[test]
    fn banner_reports_disabled_model() {
        let line = banner_line(&report(
            Vec::new(),
            ScoutStatus::ModelUnavailable("artifact missing".into()),
            None,
        ));
        assert!(line.spans[0].content.contains("artifact missing"));
    }

    #[test]
    fn render_full_report() {
        let rows = vec![
            row("Steal", Some(4e6), Some(10e6)),
            row("Pricey", Some(12e6), Some(10e6)),
        ];
        let alert = MoneyballAlert {
            name: "Steal".into(),
            undervalued_by: 6_000_000.0,
        };
        let out = draw(report(rows, ScoutStatus::Valued, Some(alert)));
        assert!(out.contains("MONEYBALL ALERT"), "{out}");
        assert!(out.contains("-€6,000,000"));
        assert!(out.contains("€2,000,000"));
        assert!(out.contains(CAPTION));
    }

    #[test]
    fn render_no_players() {
        let out = draw(report(Vec::new(), ScoutStatus::NoPlayersFound, None));
        assert!(out.contains(NO_PLAYERS), "{out}");
    }

    #[test]
    fn render_disabled_model_lists_rows() {
        let rows = vec![row("Unvalued", Some(4e6), None)];
        let out = draw(report(
            rows,
            ScoutStatus::ModelUnavailable("artifact missing".into()),
            None,
        ));
        assert!(out.contains("Unvalued"));
        assert!(out.contains("Valuation unavailable: artifact missing"));
    }
}
